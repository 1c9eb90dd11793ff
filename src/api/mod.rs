mod graphql;
#[cfg(feature = "http")]
mod http;
mod types;

use anyhow::Result;

pub use graphql::{
    decode_depots, decode_map_assets, decode_response, decode_tessellation, decode_update_map_assets,
    GraphqlError, GraphqlRequest, GraphqlResponse, GENERATE_DEPOTS, GENERATE_TESSELLATION,
    GET_MAP_ASSETS, UPDATE_MAP_ASSETS,
};
#[cfg(feature = "http")]
pub use http::GraphqlClient;
pub use types::{DepotParams, GeojsonFile, MapAsset, MapQuery, TessellationParams, UpdateResult};

/// Server operations the synchronizer depends on.
/// Any `Err` is a transport failure (network, HTTP status, or GraphQL `errors`).
pub trait AssetClient {
    fn map_assets(&self, query: &MapQuery) -> Result<Vec<MapAsset>>;

    fn update_map_assets(&self, location_id: &str, job_id: &str, files: &[GeojsonFile]) -> Result<UpdateResult>;

    fn generate_tessellation(&self, location_id: &str, job_id: &str, params: &TessellationParams) -> Result<MapAsset>;

    fn generate_depots(&self, location_id: &str, job_id: &str, params: &DepotParams) -> Result<MapAsset>;
}
