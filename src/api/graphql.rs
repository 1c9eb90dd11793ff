use anyhow::{anyhow, bail, Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};

use super::{DepotParams, GeojsonFile, MapAsset, MapQuery, TessellationParams, UpdateResult};

pub const GET_MAP_ASSETS: &str = "\
query GetMapAssets($locationId: String!, $jobId: String!, $layers: [String!]) {
  mapAssets(locationId: $locationId, jobId: $jobId, layers: $layers) {
    id
    name
    geojson
  }
}";

pub const UPDATE_MAP_ASSETS: &str = "\
mutation updateMapAssets($locationId: String!, $jobId: String!, $geojsonFiles: [GeoJSONInput!]!) {
  updateMapAssets(locationId: $locationId, jobId: $jobId, geojsonFiles: $geojsonFiles) {
    updatedAssets {
      id
      name
      geojson
    }
    errorMessage
  }
}";

pub const GENERATE_TESSELLATION: &str = "\
mutation getTesselation($locationId: String!, $jobId: String!, $targetAreaAcres: Float!, $maxIterations: Int!) {
  generateTesselation(locationId: $locationId, jobId: $jobId, targetAreaAcres: $targetAreaAcres, maxIterations: $maxIterations) {
    id
    name
    type
    geojson
  }
}";

pub const GENERATE_DEPOTS: &str = "\
mutation GenerateDepots($locationId: String!, $jobId: String!, $depotRadius: Float!, $gridDensity: Int!) {
  generateDepots(locationId: $locationId, jobId: $jobId, depotRadius: $depotRadius, gridDensity: $gridDensity) {
    id
    name
    type
    geojson
  }
}";

/// JSON body POSTed to the GraphQL endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphqlRequest {
    pub query: &'static str,
    pub variables: Value,
}

impl GraphqlRequest {
    pub fn map_assets(query: &MapQuery) -> Self {
        Self {
            query: GET_MAP_ASSETS,
            variables: json!({
                "locationId": query.location_id,
                "jobId": query.job_id,
                "layers": query.layers,
            }),
        }
    }

    pub fn update_map_assets(location_id: &str, job_id: &str, files: &[GeojsonFile]) -> Self {
        Self {
            query: UPDATE_MAP_ASSETS,
            variables: json!({
                "locationId": location_id,
                "jobId": job_id,
                "geojsonFiles": files,
            }),
        }
    }

    pub fn generate_tessellation(location_id: &str, job_id: &str, params: &TessellationParams) -> Self {
        Self {
            query: GENERATE_TESSELLATION,
            variables: json!({
                "locationId": location_id,
                "jobId": job_id,
                "targetAreaAcres": params.target_area_acres,
                "maxIterations": params.max_iterations,
            }),
        }
    }

    pub fn generate_depots(location_id: &str, job_id: &str, params: &DepotParams) -> Self {
        Self {
            query: GENERATE_DEPOTS,
            variables: json!({
                "locationId": location_id,
                "jobId": job_id,
                "depotRadius": params.depot_radius,
                "gridDensity": params.grid_density,
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

/// Standard GraphQL response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

impl<T> GraphqlResponse<T> {
    /// The `data` member, or an error when the server reported any `errors`.
    pub fn into_data(self) -> Result<T> {
        if !self.errors.is_empty() {
            let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
            bail!("GraphQL error: {}", messages.join("; "));
        }
        self.data.ok_or_else(|| anyhow!("GraphQL response carried no data"))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapAssetsData {
    #[serde(default)]
    pub map_assets: Vec<MapAsset>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMapAssetsData {
    pub update_map_assets: UpdateResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTessellationData {
    pub generate_tesselation: MapAsset,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDepotsData {
    pub generate_depots: MapAsset,
}

/// Decode a GraphQL response body.
pub fn decode_response<T: DeserializeOwned>(body: &str) -> Result<T> {
    let response: GraphqlResponse<T> = serde_json::from_str(body)
        .context("Failed to parse GraphQL response")?;
    response.into_data()
}

pub fn decode_map_assets(body: &str) -> Result<Vec<MapAsset>> {
    Ok(decode_response::<MapAssetsData>(body)?.map_assets)
}

pub fn decode_update_map_assets(body: &str) -> Result<UpdateResult> {
    Ok(decode_response::<UpdateMapAssetsData>(body)?.update_map_assets)
}

pub fn decode_tessellation(body: &str) -> Result<MapAsset> {
    Ok(decode_response::<GenerateTessellationData>(body)?.generate_tesselation)
}

pub fn decode_depots(body: &str) -> Result<MapAsset> {
    Ok(decode_response::<GenerateDepotsData>(body)?.generate_depots)
}
