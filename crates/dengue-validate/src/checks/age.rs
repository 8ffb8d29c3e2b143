//! Age plausibility.

use polars::prelude::DataFrame;

use dengue_ingest::{columns, has_column, numeric_column_i64};
use dengue_model::{IssueSeverity, QualityIssue};

use super::MAX_SAMPLES;

/// Ceiling shared with the last quinquennial band.
const MAX_AGE: i64 = 120;

/// Implausible (`> 120` or negative) and missing ages. Affected
/// records are silently skipped by the age/sex view, so the counts
/// matter for reading its totals.
pub fn check(df: &DataFrame) -> Vec<QualityIssue> {
    if !has_column(df, columns::EDAD_ANOS) {
        return vec![];
    }
    let Ok(ages) = numeric_column_i64(df, columns::EDAD_ANOS) else {
        return vec![];
    };

    let mut implausible = 0u64;
    let mut samples = Vec::new();
    let mut missing = 0u64;
    for age in &ages {
        match age {
            Some(age) if (0..=MAX_AGE).contains(age) => {}
            Some(age) => {
                implausible += 1;
                let sample = age.to_string();
                if samples.len() < MAX_SAMPLES && !samples.contains(&sample) {
                    samples.push(sample);
                }
            }
            None => missing += 1,
        }
    }

    let mut issues = Vec::new();
    if implausible > 0 {
        issues.push(QualityIssue {
            code: "AGE001".to_string(),
            message: format!("ages outside 0-{MAX_AGE}"),
            severity: IssueSeverity::Warning,
            column: Some(columns::EDAD_ANOS.to_string()),
            count: Some(implausible),
            samples,
        });
    }
    if missing > 0 {
        issues.push(QualityIssue {
            code: "AGE002".to_string(),
            message: "records without a recorded age".to_string(),
            severity: IssueSeverity::Warning,
            column: Some(columns::EDAD_ANOS.to_string()),
            count: Some(missing),
            samples: vec![],
        });
    }
    issues
}
