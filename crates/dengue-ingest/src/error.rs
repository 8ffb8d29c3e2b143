use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("data directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("failed to read data directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no year files (<year>.csv) found in {path}")]
    NoYearFiles { path: PathBuf },

    #[error("year {year} not present in {path}")]
    YearNotFound { year: u16, path: PathBuf },
}

pub type Result<T> = std::result::Result<T, IngestError>;
