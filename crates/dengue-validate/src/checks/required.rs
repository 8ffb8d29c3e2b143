//! Required-column presence.

use polars::prelude::DataFrame;

use dengue_ingest::{columns, has_column};
use dengue_model::{IssueSeverity, QualityIssue};

/// One error per missing canonical column. Analysis cannot run without
/// them, so these are the only issues that block the pipeline.
pub fn check(df: &DataFrame) -> Vec<QualityIssue> {
    columns::REQUIRED
        .iter()
        .filter(|name| !has_column(df, name))
        .map(|name| QualityIssue {
            code: "REQ001".to_string(),
            message: format!("missing required column {name}"),
            severity: IssueSeverity::Error,
            column: Some((*name).to_string()),
            count: None,
            samples: vec![],
        })
        .collect()
}
