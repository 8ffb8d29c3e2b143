//! Residence-entity range check.

use polars::prelude::DataFrame;

use dengue_ingest::{columns, has_column, numeric_column_i64};
use dengue_model::{EntityId, IssueSeverity, QualityIssue};

use super::MAX_SAMPLES;

/// Residence codes outside 1-32. The SSA files use 97-99 for
/// unspecified or foreign residence; those records are excluded from
/// the state table but still count toward national totals, so this is
/// a warning, not an error.
pub fn check(df: &DataFrame) -> Vec<QualityIssue> {
    if !has_column(df, columns::ENTIDAD_RES) {
        return vec![];
    }
    let Ok(entities) = numeric_column_i64(df, columns::ENTIDAD_RES) else {
        return vec![];
    };

    let mut count = 0u64;
    let mut samples = Vec::new();
    for code in entities.into_iter().flatten() {
        let resident = EntityId::from_code(code).is_some_and(EntityId::is_resident);
        if resident {
            continue;
        }
        count += 1;
        let sample = code.to_string();
        if samples.len() < MAX_SAMPLES && !samples.contains(&sample) {
            samples.push(sample);
        }
    }
    if count == 0 {
        return vec![];
    }
    vec![QualityIssue {
        code: "ENT001".to_string(),
        message: "residence codes outside the 32 federal entities".to_string(),
        severity: IssueSeverity::Warning,
        column: Some(columns::ENTIDAD_RES.to_string()),
        count: Some(count),
        samples,
    }]
}
