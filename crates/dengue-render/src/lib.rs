//! SVG figures and the markdown report body.
//!
//! Everything renders to plain files: charts go out as hand-assembled
//! SVG documents, the report as a markdown file embedding them. No
//! headless browser, no raster step.

pub mod calendar;
pub mod choropleth;
pub mod donut;
pub mod palette;
pub mod report;
pub mod scatter;
pub mod svg;
pub mod table;
pub mod theme;

pub use calendar::render_calendar;
pub use choropleth::{render_municipal_map, render_state_map};
pub use donut::render_serotypes;
pub use report::{Figures, ReportContext, write_report};
pub use scatter::render_age_sex;
