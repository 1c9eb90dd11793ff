use anyhow::{Context, Result};
use reqwest::blocking::Client;
use tracing::debug;

use crate::config::ClientConfig;
use super::{
    decode_depots, decode_map_assets, decode_tessellation, decode_update_map_assets, AssetClient,
    DepotParams, GeojsonFile, GraphqlRequest, MapAsset, MapQuery, TessellationParams, UpdateResult,
};

/// Blocking GraphQL client for the map-asset server.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    client: Client,
    endpoint: String,
}

impl GraphqlClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, endpoint: config.endpoint.clone() })
    }

    #[inline] pub fn endpoint(&self) -> &str { &self.endpoint }

    /// POST a request and return the raw response body. Non-2xx statuses are errors.
    fn post(&self, request: &GraphqlRequest) -> Result<String> {
        debug!(endpoint = %self.endpoint, "POST graphql");
        self.client.post(&self.endpoint)
            .json(request)
            .send()
            .with_context(|| format!("POST {}", self.endpoint))?
            .error_for_status()
            .with_context(|| format!("POST {} returned error status", self.endpoint))?
            .text()
            .with_context(|| format!("read response body from {}", self.endpoint))
    }
}

impl AssetClient for GraphqlClient {
    fn map_assets(&self, query: &MapQuery) -> Result<Vec<MapAsset>> {
        decode_map_assets(&self.post(&GraphqlRequest::map_assets(query))?)
    }

    fn update_map_assets(&self, location_id: &str, job_id: &str, files: &[GeojsonFile]) -> Result<UpdateResult> {
        decode_update_map_assets(&self.post(&GraphqlRequest::update_map_assets(location_id, job_id, files))?)
    }

    fn generate_tessellation(&self, location_id: &str, job_id: &str, params: &TessellationParams) -> Result<MapAsset> {
        decode_tessellation(&self.post(&GraphqlRequest::generate_tessellation(location_id, job_id, params))?)
    }

    fn generate_depots(&self, location_id: &str, job_id: &str, params: &DepotParams) -> Result<MapAsset> {
        decode_depots(&self.post(&GraphqlRequest::generate_depots(location_id, job_id, params))?)
    }
}
