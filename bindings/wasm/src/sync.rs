use std::collections::HashMap;

use anyhow::anyhow;
use brushmap_core::{
    decode_depots, decode_map_assets, decode_tessellation, decode_update_map_assets, apply_generated,
    Alert, ApplyOutcome, DepotParams, FetchState, FetchTicket, GraphqlRequest, LogAlert, MapQuery,
    TessellationParams,
};
use serde::Serialize;
use wasm_bindgen::{JsValue, prelude::wasm_bindgen};

use crate::common::*;
use crate::view::WasmMapView;

/// Blocking browser `alert()`, falling back to the log outside a window.
struct WindowAlert;

impl Alert for WindowAlert {
    fn alert(&self, message: &str) {
        match web_sys::window() {
            Some(window) => { let _ = window.alert_with_message(message); }
            None => LogAlert.alert(message),
        }
    }
}

#[derive(Serialize)]
struct FetchStart {
    ticket: u32,
    body: String,
}

/// Fetches still awaiting a response. Older requests the browser never
/// answered are forgotten once this many are pending.
const MAX_PENDING_FETCHES: usize = 16;

/// Drop the oldest pending tickets until at most `keep` remain.
fn prune_tickets(tickets: &mut HashMap<u32, FetchTicket>, keep: usize) {
    if tickets.len() <= keep { return }
    let mut ids: Vec<u32> = tickets.keys().copied().collect();
    ids.sort_unstable();
    for id in &ids[..ids.len() - keep] {
        tickets.remove(id);
    }
}

fn request_body(request: &GraphqlRequest) -> Result<String, JsValue> {
    serde_json::to_string(request).map_err(js_err)
}

/// The browser performs the HTTP calls. Each server operation is split into a
/// `*_request` that returns the JSON body to POST and a `complete_*` that takes the response text.
#[wasm_bindgen]
impl WasmMapView {
    /// Re-key the layer query. Takes effect on the next fetch.
    pub fn set_query(&mut self, location_id: String, job_id: String, layers: Vec<String>) {
        let layers = layers.iter().map(|s| layer(s)).collect();
        self.sync.set_query(MapQuery::new(location_id, job_id, layers));
    }

    /// Start a fetch: `{ ticket, body }`.
    pub fn begin_fetch(&mut self) -> Result<JsValue, JsValue> {
        let body = request_body(&GraphqlRequest::map_assets(self.sync.query()))?;
        self.next_ticket += 1;
        self.tickets.insert(self.next_ticket, self.sync.begin_fetch());
        prune_tickets(&mut self.tickets, MAX_PENDING_FETCHES);
        serde_wasm_bindgen::to_value(&FetchStart { ticket: self.next_ticket, body }).map_err(|e| e.into())
    }

    /// Apply a fetch response. Returns `{ applied, skipped, superseded }`.
    pub fn complete_fetch(&mut self, ticket: u32, response: &str) -> Result<JsValue, JsValue> {
        let ticket = self.tickets.remove(&ticket).ok_or_else(|| js_err(format!("unknown fetch ticket {ticket}")))?;
        let report = self.sync.complete_fetch(&mut self.inner, ticket, decode_map_assets(response))
            .map_err(|e| js_err(format!("{e:#}")))?;
        serde_wasm_bindgen::to_value(&report).map_err(|e| e.into())
    }

    /// Record a transport failure for a fetch.
    pub fn fail_fetch(&mut self, ticket: u32, message: &str) {
        let Some(ticket) = self.tickets.remove(&ticket) else { return };
        let _ = self.sync.complete_fetch(&mut self.inner, ticket, Err(anyhow!(message.to_string())));
    }

    /// "idle", "loading", "applied", or the failure message.
    pub fn fetch_state(&self) -> String {
        match self.sync.fetch_state() {
            FetchState::Idle => "idle".into(),
            FetchState::Loading => "loading".into(),
            FetchState::Applied => "applied".into(),
            FetchState::Failed(msg) => msg.clone(),
        }
    }

    pub fn is_loading(&self) -> bool { self.sync.is_loading() }

    /// Body of the save mutation, or `undefined` when there is nothing to save.
    pub fn begin_save(&mut self, location_id: &str, job_id: &str, layers: Vec<String>) -> Result<Option<String>, JsValue> {
        let layers: Vec<_> = layers.iter().map(|s| layer(s)).collect();
        let files = self.sync.begin_save(&self.inner, &layers).map_err(|e| js_err(format!("{e:#}")))?;
        files.map(|files| request_body(&GraphqlRequest::update_map_assets(location_id, job_id, &files)))
            .transpose()
    }

    /// Record the save response and return the status line.
    pub fn complete_save(&mut self, response: &str) -> Option<String> {
        self.sync.complete_save(decode_update_map_assets(response), &WindowAlert).message()
    }

    /// Record a transport failure for a save; alerts the user.
    pub fn fail_save(&mut self, message: &str) -> Option<String> {
        self.sync.complete_save(Err(anyhow!(message.to_string())), &WindowAlert).message()
    }

    pub fn save_status(&self) -> Option<String> { self.sync.save_status().message() }

    /// Body of the tessellation mutation for the current query.
    pub fn tessellation_request(&self, target_area_acres: Option<f64>, max_iterations: Option<u32>) -> Result<String, JsValue> {
        let defaults = TessellationParams::default();
        let params = TessellationParams {
            target_area_acres: target_area_acres.unwrap_or(defaults.target_area_acres),
            max_iterations: max_iterations.unwrap_or(defaults.max_iterations),
        };
        let query = self.sync.query();
        request_body(&GraphqlRequest::generate_tessellation(&query.location_id, &query.job_id, &params))
    }

    /// Body of the depot placement mutation for the current query.
    pub fn depots_request(&self, depot_radius: Option<f64>, grid_density: Option<u32>) -> Result<String, JsValue> {
        let defaults = DepotParams::default();
        let params = DepotParams {
            depot_radius: depot_radius.unwrap_or(defaults.depot_radius),
            grid_density: grid_density.unwrap_or(defaults.grid_density),
        };
        let query = self.sync.query();
        request_body(&GraphqlRequest::generate_depots(&query.location_id, &query.job_id, &params))
    }

    /// Load the cells returned by the tessellation mutation. Returns the feature count.
    pub fn complete_tessellation(&mut self, response: &str) -> Result<Option<u32>, JsValue> {
        let asset = decode_tessellation(response).map_err(|e| js_err(format!("{e:#}")))?;
        applied_count(apply_generated(&mut self.inner, &asset))
    }

    /// Load the depots returned by the placement mutation. Returns the feature count.
    pub fn complete_depots(&mut self, response: &str) -> Result<Option<u32>, JsValue> {
        let asset = decode_depots(response).map_err(|e| js_err(format!("{e:#}")))?;
        applied_count(apply_generated(&mut self.inner, &asset))
    }
}

fn applied_count(outcome: anyhow::Result<ApplyOutcome>) -> Result<Option<u32>, JsValue> {
    match outcome.map_err(|e| js_err(format!("{e:#}")))? {
        ApplyOutcome::Replaced { count } => Ok(Some(count as u32)),
        ApplyOutcome::MissingLayer => Ok(None),
    }
}
