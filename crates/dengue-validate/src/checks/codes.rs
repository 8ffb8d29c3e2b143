//! Coded-value vocabulary checks.

use polars::prelude::DataFrame;

use dengue_ingest::{columns, has_column, parse_i64, string_column};
use dengue_model::{CaseStatus, DeathVerdict, IssueSeverity, QualityIssue, Serotype, Sex};

use super::MAX_SAMPLES;

/// Count values that fall outside each column's SSA code list.
///
/// Empty cells are not code errors; `RESULTADO_PCR` and `DICTAMEN` are
/// legitimately blank for most records.
pub fn check(df: &DataFrame) -> Vec<QualityIssue> {
    let mut issues = Vec::new();
    check_column(df, columns::SEXO, "COD001", &mut issues, |code| {
        Sex::from_code(code).is_some()
    });
    check_column(df, columns::ESTATUS_CASO, "COD002", &mut issues, |code| {
        CaseStatus::from_code(code).is_some()
    });
    check_column(df, columns::RESULTADO_PCR, "COD003", &mut issues, |code| {
        Serotype::from_code(code).is_some()
    });
    check_column(df, columns::DICTAMEN, "COD004", &mut issues, |code| {
        DeathVerdict::from_code(code).is_some()
    });
    issues
}

fn check_column(
    df: &DataFrame,
    column: &str,
    issue_code: &str,
    issues: &mut Vec<QualityIssue>,
    known: impl Fn(i64) -> bool,
) {
    if !has_column(df, column) {
        return;
    }
    let Ok(values) = string_column(df, column) else {
        return;
    };

    let mut count = 0u64;
    let mut samples = Vec::new();
    for raw in values {
        if raw.is_empty() {
            continue;
        }
        if parse_i64(&raw).is_some_and(&known) {
            continue;
        }
        count += 1;
        if samples.len() < MAX_SAMPLES && !samples.contains(&raw) {
            samples.push(raw);
        }
    }
    if count > 0 {
        issues.push(QualityIssue {
            code: issue_code.to_string(),
            message: format!("unknown {column} codes"),
            severity: IssueSeverity::Warning,
            column: Some(column.to_string()),
            count: Some(count),
            samples,
        });
    }
}
