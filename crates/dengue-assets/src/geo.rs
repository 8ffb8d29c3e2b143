//! GeoJSON boundary loading.
//!
//! The maps only need feature keys and polygon rings, so the loader
//! works on `serde_json::Value` instead of a full GeoJSON type model.
//! State features are keyed by `NOM_ENT`, municipal features by the
//! concatenated `CVEGEO` key.

use std::path::Path;

use serde_json::Value;

use crate::error::{AssetsError, Result};

/// Key property of the state boundary features.
pub const STATE_KEY_PROPERTY: &str = "NOM_ENT";
/// Key property of the municipal boundary features.
pub const MUNICIPAL_KEY_PROPERTY: &str = "CVEGEO";

/// One boundary feature: its key and all its outer/inner rings in
/// lon/lat order.
#[derive(Debug, Clone)]
pub struct GeoFeature {
    pub key: String,
    pub rings: Vec<Vec<(f64, f64)>>,
}

/// A loaded FeatureCollection.
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    pub features: Vec<GeoFeature>,
    /// Features dropped for missing key or unusable geometry.
    pub skipped: usize,
}

impl FeatureSet {
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Bounding box over every ring: (min lon, min lat, max lon, max lat).
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let mut bounds: Option<(f64, f64, f64, f64)> = None;
        for feature in &self.features {
            for ring in &feature.rings {
                for (lon, lat) in ring {
                    bounds = Some(match bounds {
                        None => (*lon, *lat, *lon, *lat),
                        Some((min_lon, min_lat, max_lon, max_lat)) => (
                            min_lon.min(*lon),
                            min_lat.min(*lat),
                            max_lon.max(*lon),
                            max_lat.max(*lat),
                        ),
                    });
                }
            }
        }
        bounds
    }
}

/// Load a FeatureCollection, keying each feature by `key_property`.
///
/// Returns [`AssetsError::Missing`] when the file is not present so the
/// caller can skip map rendering.
pub fn load_features(path: &Path, key_property: &str) -> Result<FeatureSet> {
    if !path.is_file() {
        return Err(AssetsError::Missing {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| AssetsError::io(path, e))?;
    let root: Value = serde_json::from_str(&contents).map_err(|e| AssetsError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;

    let Some(features) = root.get("features").and_then(Value::as_array) else {
        return Err(AssetsError::invalid(path, "not a FeatureCollection"));
    };

    let mut set = FeatureSet::default();
    for feature in features {
        let key = feature
            .get("properties")
            .and_then(|props| props.get(key_property))
            .and_then(property_as_string);
        let rings = feature.get("geometry").and_then(geometry_rings);
        match (key, rings) {
            (Some(key), Some(rings)) if !rings.is_empty() => {
                set.features.push(GeoFeature { key, rings });
            }
            _ => set.skipped += 1,
        }
    }
    Ok(set)
}

fn property_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn geometry_rings(geometry: &Value) -> Option<Vec<Vec<(f64, f64)>>> {
    let kind = geometry.get("type").and_then(Value::as_str)?;
    let coordinates = geometry.get("coordinates")?;
    match kind {
        "Polygon" => polygon_rings(coordinates),
        "MultiPolygon" => {
            let polygons = coordinates.as_array()?;
            let mut rings = Vec::new();
            for polygon in polygons {
                rings.extend(polygon_rings(polygon)?);
            }
            Some(rings)
        }
        _ => None,
    }
}

fn polygon_rings(coordinates: &Value) -> Option<Vec<Vec<(f64, f64)>>> {
    let rings = coordinates.as_array()?;
    let mut result = Vec::with_capacity(rings.len());
    for ring in rings {
        let points = ring.as_array()?;
        let mut parsed = Vec::with_capacity(points.len());
        for point in points {
            let pair = point.as_array()?;
            let lon = pair.first().and_then(Value::as_f64)?;
            let lat = pair.get(1).and_then(Value::as_f64)?;
            parsed.push((lon, lat));
        }
        result.push(parsed);
    }
    Some(result)
}
