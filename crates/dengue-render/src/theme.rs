//! Report theme shared by every chart.

/// Canvas background.
pub const PAPER: &str = "#04293A";
/// Plot-area background.
pub const PANEL: &str = "#041C32";
/// All text.
pub const TEXT: &str = "#FFFFFF";
/// Table headers and highlights.
pub const ACCENT: &str = "#f4511e";
/// Land fill for features without data on the state map.
pub const LAND: &str = "#1C0A00";
/// Land fill on the municipal map.
pub const LAND_MUNICIPAL: &str = "#000000";
/// Open-circle markers, male series.
pub const MALE_MARKER: &str = "#76ff03";
/// Open-diamond markers, female series.
pub const FEMALE_MARKER: &str = "#ea80fc";

pub const FONT_FAMILY: &str = "Quicksand, 'Segoe UI', sans-serif";

pub const TITLE_SIZE: u32 = 26;
pub const SUBTITLE_SIZE: u32 = 18;
pub const FOOTER_SIZE: u32 = 14;
pub const TICK_SIZE: u32 = 13;

/// Standard chart viewport.
pub const WIDTH: u32 = 1280;
pub const HEIGHT: u32 = 720;
