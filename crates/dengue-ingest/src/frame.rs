//! Case frame type wrapping a loaded year file.

use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;

/// A year's case records with provenance.
///
/// The frame keeps the source path and a content fingerprint so reports
/// can state exactly which published file they were generated from.
#[derive(Debug, Clone)]
pub struct CaseFrame {
    /// Reporting year the file covers.
    pub year: u16,
    /// The case records as read, headers normalized to uppercase.
    pub data: DataFrame,
    /// Path the file was read from.
    pub source: PathBuf,
    /// First 16 hex chars of the file's SHA-256.
    pub fingerprint: String,
}

impl CaseFrame {
    pub fn record_count(&self) -> usize {
        self.data.height()
    }

    /// Source filename for logs and report footers.
    pub fn source_name(&self) -> String {
        self.source
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("unknown")
            .to_string()
    }

    pub fn source_path(&self) -> &Path {
        &self.source
    }
}
