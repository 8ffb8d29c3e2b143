//! Reference data for the dengue report.
//!
//! Population tables and boundary geometry live outside the case
//! dataset; this crate resolves the assets directory, loads the tables,
//! and verifies the shipped files against their manifest pins.

pub mod error;
pub mod geo;
pub mod manifest;
pub mod paths;
pub mod population;

pub use error::{AssetsError, Result};
pub use geo::{FeatureSet, GeoFeature, load_features};
pub use manifest::{FileStatus, VerifyReport, load_manifest, sha256_hex, verify_assets};
pub use paths::{ASSETS_ENV_VAR, assets_root};
pub use population::{AgePopulation, MunicipalPopulation, StatePopulation};
