//! The five report views over a year's case frame.
//!
//! Every view filters to confirmed records first, counts in plain maps
//! over typed columns, then joins the reference populations. The frames
//! stay untouched; all aggregation happens on extracted vectors.

pub mod age_sex;
pub mod calendar;
pub mod filters;
pub mod municipal;
pub mod serotype;
pub mod state;
pub mod stats;

#[cfg(test)]
mod testutil;

pub use age_sex::{AgeSexProfile, AgeSexRow, Measure, age_sex_profile};
pub use calendar::{CalendarDay, CalendarStats, CaseCalendar, case_calendar};
pub use municipal::{
    MunicipalBreakdown, MunicipalOptions, MunicipalRow, RateStats, municipal_breakdown,
};
pub use serotype::{SerotypeCount, SerotypeSplit, serotype_split};
pub use state::{NationalSummary, StateBreakdown, StateRow, state_breakdown};
pub use stats::ColorScale;
