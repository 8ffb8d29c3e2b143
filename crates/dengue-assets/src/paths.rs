//! Assets directory path resolution.

use std::path::{Path, PathBuf};

use dengue_model::Sex;

/// Environment variable for overriding the assets directory.
pub const ASSETS_ENV_VAR: &str = "DENGUE_ASSETS_DIR";

/// Get the assets root directory.
///
/// Resolution order:
/// 1. `DENGUE_ASSETS_DIR` environment variable
/// 2. `assets/` directory relative to the workspace root
pub fn assets_root() -> PathBuf {
    if let Ok(root) = std::env::var(ASSETS_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets")
}

/// CONAPO state population table (shipped, pinned).
pub fn state_population_path(root: &Path) -> PathBuf {
    root.join("poblacion/entidades.csv")
}

/// CONAPO quinquennial population table for one sex (shipped, pinned).
pub fn age_population_path(root: &Path, sex: Sex) -> PathBuf {
    match sex {
        Sex::Male => root.join("poblacion/quinquenal_hombres.csv"),
        Sex::Female => root.join("poblacion/quinquenal_mujeres.csv"),
    }
}

/// Municipal population table (user supplied, optional).
pub fn municipal_population_path(root: &Path) -> PathBuf {
    root.join("poblacion/municipios.csv")
}

/// State boundary GeoJSON (user supplied, optional).
pub fn state_geo_path(root: &Path) -> PathBuf {
    root.join("geo/entidades.geojson")
}

/// Municipal boundary GeoJSON (user supplied, optional).
pub fn municipal_geo_path(root: &Path) -> PathBuf {
    root.join("geo/municipios.geojson")
}
