use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
}

/// A data quality issue found while checking a case file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityIssue {
    /// Short check identifier (e.g., "COD001").
    pub code: String,
    /// Human-readable message describing the issue.
    pub message: String,
    /// Severity level.
    pub severity: IssueSeverity,
    /// Source column (if applicable).
    pub column: Option<String>,
    /// Count of affected records.
    pub count: Option<u64>,
    /// Up to a few offending values for context.
    pub samples: Vec<String>,
}

/// Quality report for a single year's case file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityReport {
    pub year: u16,
    /// Source file the report refers to.
    pub source: String,
    /// Number of records checked.
    pub rows: usize,
    pub issues: Vec<QualityIssue>,
}

impl QualityReport {
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == IssueSeverity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == IssueSeverity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}
