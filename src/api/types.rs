use serde::{Deserialize, Serialize};

use crate::layer::LayerName;

/// One server-side layer: a serialized GeoJSON FeatureCollection plus its layer name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapAsset {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub geojson: String,
}

impl MapAsset {
    #[inline] pub fn layer_name(&self) -> LayerName { LayerName::parse(&self.name) }
}

/// A layer to be saved (`GeoJSONInput` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeojsonFile {
    pub name: String,
    pub geojson: String,
}

/// Response of the save mutation. `error_message` is set when the server rejected some files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    #[serde(default)]
    pub updated_assets: Vec<MapAsset>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Fetch key: which layers of which location/job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapQuery {
    pub location_id: String,
    pub job_id: String,
    pub layers: Vec<LayerName>,
}

impl MapQuery {
    pub fn new(location_id: impl Into<String>, job_id: impl Into<String>, layers: Vec<LayerName>) -> Self {
        Self { location_id: location_id.into(), job_id: job_id.into(), layers }
    }
}

/// Parameters of the server-side tessellation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TessellationParams {
    pub target_area_acres: f64,
    pub max_iterations: u32,
}

impl Default for TessellationParams {
    fn default() -> Self { Self { target_area_acres: 0.5, max_iterations: 15 } }
}

/// Parameters of the server-side depot placement run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepotParams {
    /// Meters.
    pub depot_radius: f64,
    /// Candidate points per cell.
    pub grid_density: u32,
}

impl Default for DepotParams {
    fn default() -> Self { Self { depot_radius: 225.0, grid_density: 4 } }
}
