//! Asset manifest with sha256 pins.
//!
//! The shipped population tables are pinned in `manifest.toml` so a
//! silently edited or truncated table is caught before it skews rates.
//! User-supplied assets (municipal population, GeoJSON) are deliberately
//! unpinned; verification ignores files outside the manifest.

use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::error::{AssetsError, Result};

pub const MANIFEST_SCHEMA: &str = "denguemx.assets-manifest";

/// Roles every assets directory must pin.
const REQUIRED_ROLES: &[&str] = &["state_population", "male_population", "female_population"];

#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub manifest: ManifestMeta,
    pub files: Vec<ManifestFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestMeta {
    pub schema: String,
    pub schema_version: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestFile {
    pub path: String,
    pub role: String,
    pub kind: String,
    pub sha256: String,
}

/// Verification outcome for one pinned file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Verified,
    Missing,
    Mismatch { expected: String, actual: String },
}

#[derive(Debug, Clone)]
pub struct FileCheck {
    pub path: String,
    pub role: String,
    pub status: FileStatus,
}

#[derive(Debug, Clone)]
pub struct VerifyReport {
    pub root: PathBuf,
    pub checks: Vec<FileCheck>,
}

impl VerifyReport {
    pub fn ok(&self) -> bool {
        self.checks
            .iter()
            .all(|check| check.status == FileStatus::Verified)
    }

    pub fn failure_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|check| check.status != FileStatus::Verified)
            .count()
    }
}

pub fn load_manifest(root: &Path) -> Result<Manifest> {
    let path = root.join("manifest.toml");
    if !path.is_file() {
        return Err(AssetsError::Missing { path });
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| AssetsError::io(&path, e))?;
    let manifest: Manifest = toml::from_str(&contents).map_err(|e| AssetsError::Toml {
        path: path.clone(),
        source: e,
    })?;
    validate_manifest(&manifest)?;
    Ok(manifest)
}

/// Recompute digests for every pinned file under `root`.
pub fn verify_assets(root: &Path) -> Result<VerifyReport> {
    let manifest = load_manifest(root)?;
    let mut checks = Vec::with_capacity(manifest.files.len());
    for file in &manifest.files {
        let full_path = root.join(&file.path);
        let status = match std::fs::read(&full_path) {
            Ok(bytes) => {
                let actual = sha256_hex(&bytes);
                let expected = file.sha256.to_ascii_lowercase();
                if actual == expected {
                    FileStatus::Verified
                } else {
                    FileStatus::Mismatch { expected, actual }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileStatus::Missing,
            Err(e) => return Err(AssetsError::io(full_path, e)),
        };
        checks.push(FileCheck {
            path: file.path.clone(),
            role: file.role.clone(),
            status,
        });
    }
    Ok(VerifyReport {
        root: root.to_path_buf(),
        checks,
    })
}

/// Lowercase hex SHA-256 of a byte slice.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn validate_manifest(manifest: &Manifest) -> Result<()> {
    if manifest.manifest.schema != MANIFEST_SCHEMA {
        return Err(AssetsError::InvalidManifest {
            message: format!("unsupported schema: {}", manifest.manifest.schema),
        });
    }
    if manifest.manifest.schema_version != 1 {
        return Err(AssetsError::InvalidManifest {
            message: format!(
                "unsupported schema_version: {}",
                manifest.manifest.schema_version
            ),
        });
    }

    let mut roles = std::collections::BTreeSet::new();
    for file in &manifest.files {
        if !roles.insert(file.role.as_str()) {
            return Err(AssetsError::InvalidManifest {
                message: format!("duplicate role: {}", file.role),
            });
        }
        validate_sha(&file.sha256, &file.path)?;
        validate_path(&file.path)?;
    }
    for role in REQUIRED_ROLES {
        if !roles.contains(role) {
            return Err(AssetsError::InvalidManifest {
                message: format!("missing role: {role}"),
            });
        }
    }
    Ok(())
}

fn validate_sha(sha: &str, path: &str) -> Result<()> {
    if sha.len() != 64 || !sha.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AssetsError::InvalidManifest {
            message: format!("sha256 for {path} must be 64 hex characters"),
        });
    }
    Ok(())
}

fn validate_path(path: &str) -> Result<()> {
    if path.contains('\\') {
        return Err(AssetsError::InvalidManifest {
            message: format!("manifest path {path} must use '/' separators"),
        });
    }
    let p = PathBuf::from(path);
    if p.is_absolute() {
        return Err(AssetsError::InvalidManifest {
            message: format!("manifest path {path} must be relative"),
        });
    }
    for component in p.components() {
        if matches!(component, Component::ParentDir) {
            return Err(AssetsError::InvalidManifest {
                message: format!("manifest path {path} must not traverse out of assets/"),
            });
        }
    }
    Ok(())
}
