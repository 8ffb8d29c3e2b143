//! Onset-date parseability and year coverage.

use chrono::Datelike;
use polars::prelude::DataFrame;

use dengue_ingest::{columns, has_column, parse_case_date, string_column};
use dengue_model::{IssueSeverity, QualityIssue};

use super::MAX_SAMPLES;

/// Unparseable onset dates and dates outside the file's year.
///
/// Out-of-year dates are excluded from the case calendar, which would
/// otherwise silently under-count; the warning makes that visible.
pub fn check(df: &DataFrame, year: u16) -> Vec<QualityIssue> {
    if !has_column(df, columns::FECHA_SIGN_SINTOMAS) {
        return vec![];
    }
    let Ok(onsets) = string_column(df, columns::FECHA_SIGN_SINTOMAS) else {
        return vec![];
    };

    let mut unparseable = 0u64;
    let mut bad_samples = Vec::new();
    let mut out_of_year = 0u64;
    let mut stray_samples = Vec::new();
    for raw in onsets {
        if raw.is_empty() {
            continue;
        }
        match parse_case_date(&raw) {
            None => {
                unparseable += 1;
                if bad_samples.len() < MAX_SAMPLES && !bad_samples.contains(&raw) {
                    bad_samples.push(raw);
                }
            }
            Some(date) if date.year() != i32::from(year) => {
                out_of_year += 1;
                if stray_samples.len() < MAX_SAMPLES && !stray_samples.contains(&raw) {
                    stray_samples.push(raw);
                }
            }
            Some(_) => {}
        }
    }

    let mut issues = Vec::new();
    if unparseable > 0 {
        issues.push(QualityIssue {
            code: "DAT001".to_string(),
            message: "unparseable onset dates".to_string(),
            severity: IssueSeverity::Warning,
            column: Some(columns::FECHA_SIGN_SINTOMAS.to_string()),
            count: Some(unparseable),
            samples: bad_samples,
        });
    }
    if out_of_year > 0 {
        issues.push(QualityIssue {
            code: "DAT002".to_string(),
            message: format!("onset dates outside {year}, excluded from the calendar"),
            severity: IssueSeverity::Warning,
            column: Some(columns::FECHA_SIGN_SINTOMAS.to_string()),
            count: Some(out_of_year),
            samples: stray_samples,
        });
    }
    issues
}
