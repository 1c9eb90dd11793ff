use anyhow::Result;
use tracing::{error, info, warn};

use crate::api::{AssetClient, DepotParams, GeojsonFile, MapAsset, MapQuery, TessellationParams, UpdateResult};
use crate::layer::LayerName;
use crate::map::MapView;
use crate::registry::{ApplyOutcome, RenderTarget};
use super::{geojson_files, Alert, FetchReport, FetchState, FetchTicket, SaveStatus};

/// Message shown to the user when a save fails in transport.
pub const SAVE_FAILED_ALERT: &str = "An unexpected error occurred while saving.";

/// Drives layer data between the server and a [`MapView`].
///
/// Fetches are keyed on the current [`MapQuery`]; each one gets a ticket. Results are
/// applied in completion order (last write wins), even when a newer fetch is outstanding,
/// but only the newest ticket moves the fetch state out of `Loading`.
/// Saves are independent of fetches and are never serialized against each other.
#[derive(Debug, Clone)]
pub struct MapSync {
    query: MapQuery,
    fetch: FetchState,
    save: SaveStatus,
    latest: u64,
}

impl MapSync {
    pub fn new(query: MapQuery) -> Self {
        Self { query, fetch: FetchState::Idle, save: SaveStatus::Idle, latest: 0 }
    }

    #[inline] pub fn query(&self) -> &MapQuery { &self.query }
    #[inline] pub fn fetch_state(&self) -> &FetchState { &self.fetch }
    #[inline] pub fn save_status(&self) -> &SaveStatus { &self.save }
    #[inline] pub fn is_loading(&self) -> bool { self.fetch == FetchState::Loading }

    /// Re-key the query. Takes effect on the next fetch.
    pub fn set_query(&mut self, query: MapQuery) { self.query = query; }

    /// Idle/any → Loading. Returns the ticket to hand back to [`MapSync::complete_fetch`].
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest += 1;
        self.fetch = FetchState::Loading;
        info!(
            location = %self.query.location_id,
            job = %self.query.job_id,
            layers = self.query.layers.len(),
            "fetching map layers"
        );
        FetchTicket(self.latest)
    }

    /// Loading → Applied (apply every returned asset to its layer) or Loading → Failed.
    pub fn complete_fetch<T: RenderTarget>(
        &mut self,
        view: &mut MapView<T>,
        ticket: FetchTicket,
        result: Result<Vec<MapAsset>>,
    ) -> Result<FetchReport> {
        let superseded = ticket.0 != self.latest;

        let assets = match result {
            Ok(assets) => assets,
            Err(err) => {
                if superseded {
                    warn!(?ticket, "superseded fetch failed: {err:#}");
                } else {
                    error!("map layer fetch failed: {err:#}");
                    self.fetch = FetchState::Failed(format!("{err:#}"));
                }
                return Err(err);
            }
        };

        let mut report = FetchReport { superseded, ..FetchReport::default() };
        for asset in &assets {
            let name = asset.layer_name();
            match view.apply(&name, &asset.geojson) {
                Ok(ApplyOutcome::Replaced { count }) => report.applied.push((name, count)),
                Ok(ApplyOutcome::MissingLayer) => report.skipped.push(name),
                Err(err) => {
                    error!(layer = %name, "failed to apply layer data: {err:#}");
                    report.skipped.push(name);
                }
            }
        }

        if !superseded {
            self.fetch = FetchState::Applied;
        }
        info!(applied = report.applied.len(), skipped = report.skipped.len(), superseded, "map layers updated");
        Ok(report)
    }

    /// Single-attempt fetch through `client`.
    pub fn fetch<T: RenderTarget, C: AssetClient + ?Sized>(
        &mut self,
        view: &mut MapView<T>,
        client: &C,
    ) -> Result<FetchReport> {
        let ticket = self.begin_fetch();
        let result = client.map_assets(&self.query);
        self.complete_fetch(view, ticket, result)
    }

    /// Status → Saving and serialize the layers to send.
    /// Returns `None` (status `NothingToSave`) when no requested layer has features.
    pub fn begin_save<T: RenderTarget>(
        &mut self,
        view: &MapView<T>,
        layers: &[LayerName],
    ) -> Result<Option<Vec<GeojsonFile>>> {
        self.save = SaveStatus::Saving;
        let files = match geojson_files(view.registry(), layers) {
            Ok(files) => files,
            Err(err) => {
                self.save = SaveStatus::Failed(format!("{err:#}"));
                return Err(err);
            }
        };
        if files.is_empty() {
            info!("no layers to save");
            self.save = SaveStatus::NothingToSave;
            return Ok(None);
        }
        Ok(Some(files))
    }

    /// Record the mutation's outcome. Transport failures also alert the user.
    pub fn complete_save<A: Alert + ?Sized>(&mut self, result: Result<UpdateResult>, alert: &A) -> &SaveStatus {
        self.save = match result {
            Ok(UpdateResult { error_message: Some(msg), .. }) if !msg.trim().is_empty() => {
                warn!("save partially failed: {msg}");
                SaveStatus::PartialFailure(msg)
            }
            Ok(result) => {
                info!(updated = result.updated_assets.len(), "layers saved");
                SaveStatus::Saved { updated: result.updated_assets.len() }
            }
            Err(err) => {
                error!("save call failed: {err:#}");
                alert.alert(SAVE_FAILED_ALERT);
                SaveStatus::Failed(format!("{err:#}"))
            }
        };
        &self.save
    }

    /// Export `layers`, push them through the save mutation, and record the outcome.
    pub fn save<T: RenderTarget, C: AssetClient + ?Sized, A: Alert + ?Sized>(
        &mut self,
        view: &MapView<T>,
        client: &C,
        alert: &A,
        location_id: &str,
        job_id: &str,
        layers: &[LayerName],
    ) -> &SaveStatus {
        let files = match self.begin_save(view, layers) {
            Ok(Some(files)) => files,
            Ok(None) => return &self.save,
            Err(err) => {
                error!("failed to export layers: {err:#}");
                return &self.save;
            }
        };
        let result = client.update_map_assets(location_id, job_id, &files);
        self.complete_save(result, alert)
    }

    /// Run server-side tessellation for the current location/job and load the resulting cells.
    pub fn generate_tessellation<T: RenderTarget, C: AssetClient + ?Sized>(
        &mut self,
        view: &mut MapView<T>,
        client: &C,
        params: &TessellationParams,
    ) -> Result<ApplyOutcome> {
        let asset = client.generate_tessellation(&self.query.location_id, &self.query.job_id, params)
            .inspect_err(|err| error!("tessellation request failed: {err:#}"))?;
        apply_generated(view, &asset)
    }

    /// Run server-side depot placement for the current location/job and load the resulting depots.
    pub fn generate_depots<T: RenderTarget, C: AssetClient + ?Sized>(
        &mut self,
        view: &mut MapView<T>,
        client: &C,
        params: &DepotParams,
    ) -> Result<ApplyOutcome> {
        let asset = client.generate_depots(&self.query.location_id, &self.query.job_id, params)
            .inspect_err(|err| error!("depot placement request failed: {err:#}"))?;
        apply_generated(view, &asset)
    }
}

/// Load a generated asset into the layer it names.
pub fn apply_generated<T: RenderTarget>(view: &mut MapView<T>, asset: &MapAsset) -> Result<ApplyOutcome> {
    let outcome = view.apply(&asset.layer_name(), &asset.geojson)?;
    info!(layer = %asset.name, ?outcome, "generated layer loaded");
    Ok(outcome)
}
