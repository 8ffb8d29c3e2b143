use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetsError {
    /// The asset file is not present. Optional assets (municipal
    /// population, geometry) surface this so callers can skip the
    /// dependent report section instead of aborting.
    #[error("asset not found: {path}")]
    Missing { path: PathBuf },

    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("csv error on {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("toml error on {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("json error on {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid asset {path}: {message}")]
    Invalid { path: PathBuf, message: String },

    #[error("invalid manifest: {message}")]
    InvalidManifest { message: String },

    #[error("year {year} not covered by {path}")]
    YearNotCovered { year: u16, path: PathBuf },
}

impl AssetsError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Invalid {
            path: path.into(),
            message: message.into(),
        }
    }

    /// True for the absent-optional-asset case.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }
}

pub type Result<T> = std::result::Result<T, AssetsError>;
