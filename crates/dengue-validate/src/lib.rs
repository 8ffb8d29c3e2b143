//! Data quality validation for raw case frames.
//!
//! Checks run before analysis and report what the views will skip:
//! unknown codes, non-resident entities, implausible ages, stray onset
//! dates. Only missing required columns abort the pipeline.

mod checks;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use dengue_ingest::CaseFrame;
use dengue_model::QualityReport;

/// Run every quality check over a loaded year file.
pub fn run_checks(frame: &CaseFrame) -> QualityReport {
    let issues = checks::run_all(frame);
    let report = QualityReport {
        year: frame.year,
        source: frame.source_name(),
        rows: frame.record_count(),
        issues,
    };
    info!(
        year = report.year,
        rows = report.rows,
        errors = report.error_count(),
        warnings = report.warning_count(),
        "quality checks finished"
    );
    report
}

/// Write the report as pretty JSON (`calidad_{year}.json`).
pub fn write_quality_json(report: &QualityReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(report).context("serialize quality report")?;
    std::fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
