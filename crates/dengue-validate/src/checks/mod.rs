//! Quality checks, one module per concern.

mod age;
mod codes;
mod dates;
mod entity;
mod required;

use dengue_ingest::CaseFrame;
use dengue_model::QualityIssue;

/// Offending values quoted per issue, at most.
pub(crate) const MAX_SAMPLES: usize = 5;

/// Run every check over a raw case frame.
///
/// The required-column check runs first; the remaining checks skip
/// columns that are absent, so a truncated file produces the missing-
/// column errors instead of a cascade of secondary failures.
pub fn run_all(frame: &CaseFrame) -> Vec<QualityIssue> {
    let mut issues = Vec::new();
    issues.extend(required::check(&frame.data));
    issues.extend(codes::check(&frame.data));
    issues.extend(entity::check(&frame.data));
    issues.extend(age::check(&frame.data));
    issues.extend(dates::check(&frame.data, frame.year));
    issues
}
