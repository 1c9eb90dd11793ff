use std::collections::HashMap;

use brushmap_core::{
    CommandOutcome, Feature, FeatureHandle, FetchTicket, LayerName, MapEvent, MapQuery, MapSync, MapView,
    MoveOutcome, Overlay, PathStyle,
};
use js_sys::Function;
use serde::Serialize;
use wasm_bindgen::{JsValue, prelude::wasm_bindgen};

use crate::common::*;
use crate::surface::JsSurface;

/// One rendered feature, as the JS map layer needs it.
#[derive(Serialize)]
struct EntryView<'a> {
    handle: u64,
    feature: &'a Feature,
    hovered: bool,
    style: Option<PathStyle>,
    popup: Option<String>,
    /// Depot coverage circle: `[lng, lat]` center and radius in meters.
    circle: Option<([f64; 2], f64)>,
}

impl<'a> EntryView<'a> {
    fn collect(overlay: &'a Overlay) -> Vec<Self> {
        overlay.entries().iter().map(|entry| {
            let handle = entry.handle();
            Self {
                handle: handle.0,
                feature: entry.feature(),
                hovered: entry.is_hovered(),
                style: overlay.path_style(handle),
                popup: overlay.popup(handle),
                circle: entry.depot()
                    .and_then(|depot| depot.display_circle())
                    .map(|c| ([c.center.x(), c.center.y()], c.radius_m)),
            }
        }).collect()
    }
}

fn outcome_label(outcome: Option<CommandOutcome>) -> &'static str {
    match outcome {
        Some(CommandOutcome::Moved(MoveOutcome::Moved { .. })) => "moved",
        Some(CommandOutcome::DepotRepositioned { committed: true }) => "committed",
        Some(CommandOutcome::DepotRepositioned { committed: false }) => "dragging",
        Some(CommandOutcome::HoverChanged) => "hover",
        Some(CommandOutcome::Moved(_)) | Some(CommandOutcome::Ignored) => "ignored",
        None => "none",
    }
}

#[wasm_bindgen]
pub struct WasmMapView {
    pub(crate) inner: MapView<JsSurface>,
    pub(crate) sync: MapSync,
    pub(crate) tickets: HashMap<u32, FetchTicket>,
    pub(crate) next_ticket: u32,
}

#[wasm_bindgen]
impl WasmMapView {
    /// Create a map with every known layer registered and attached.
    /// `on_change(op, layerName)` is called on "attach", "detach" and "refresh".
    #[wasm_bindgen(constructor)]
    pub fn new(on_change: Option<Function>, location_id: String, job_id: String, layers: Vec<String>) -> WasmMapView {
        let layers = layers.iter().map(|s| layer(s)).collect();
        WasmMapView {
            inner: MapView::new(JsSurface::new(on_change)),
            sync: MapSync::new(MapQuery::new(location_id, job_id, layers)),
            tickets: HashMap::new(),
            next_ticket: 0,
        }
    }

    /// Registered layer names.
    pub fn layer_names(&self) -> Vec<String> {
        self.inner.registry().names().map(|n| n.to_string()).collect()
    }

    /// Styling and interaction rule of a layer, or `null` if it is not registered.
    pub fn rule(&self, name: &str) -> Result<JsValue, JsValue> {
        match self.inner.layer(&layer(name)) {
            Some(overlay) => serde_wasm_bindgen::to_value(overlay.rule()).map_err(|e| e.into()),
            None => Ok(JsValue::NULL),
        }
    }

    /// Add a layer outside the known set.
    pub fn register(&mut self, name: &str) {
        self.inner.register(layer(name));
    }

    /// Replace a layer's features with a GeoJSON string.
    /// Returns the new feature count, or `undefined` if the layer is not registered.
    pub fn apply(&mut self, name: &str, geojson: &str) -> Result<Option<u32>, JsValue> {
        match self.inner.apply(&layer(name), geojson).map_err(|e| js_err(format!("{e:#}")))? {
            brushmap_core::ApplyOutcome::Replaced { count } => Ok(Some(count as u32)),
            brushmap_core::ApplyOutcome::MissingLayer => Ok(None),
        }
    }

    /// Render snapshot of a layer: `[{ handle, feature, hovered, style, popup, circle }]`.
    pub fn entries(&self, name: &str) -> Result<JsValue, JsValue> {
        match self.inner.layer(&layer(name)) {
            Some(overlay) => to_js(&EntryView::collect(overlay)),
            None => Ok(JsValue::NULL),
        }
    }

    /// Handle of the feature whose `id` property is `id`.
    pub fn find(&self, name: &str, id: &str) -> Option<f64> {
        self.inner.layer(&layer(name))?.find_by_id(id).map(|h: FeatureHandle| h.0 as f64)
    }

    pub fn popup(&self, name: &str, handle_id: f64) -> Option<String> {
        self.inner.layer(&layer(name))?.popup(handle(handle_id)?)
    }

    /// Current edit affordances of a layer (`{ editable, draggable, removable }`), or `null`.
    pub fn edit_options(&self, name: &str) -> Result<JsValue, JsValue> {
        match self.inner.layer(&layer(name)) {
            Some(overlay) => serde_wasm_bindgen::to_value(&overlay.edit_options()).map_err(|e| e.into()),
            None => Ok(JsValue::NULL),
        }
    }

    pub fn click(&mut self, name: &str, handle_id: f64) -> String {
        self.dispatch(name, handle_id, |layer, handle| MapEvent::Click { layer, handle })
    }

    pub fn drag(&mut self, name: &str, handle_id: f64, lng: f64, lat: f64) -> String {
        let position = (lng, lat).into();
        self.dispatch(name, handle_id, |layer, handle| MapEvent::Drag { layer, handle, position })
    }

    pub fn drag_end(&mut self, name: &str, handle_id: f64, lng: f64, lat: f64) -> String {
        let position = (lng, lat).into();
        self.dispatch(name, handle_id, |layer, handle| MapEvent::DragEnd { layer, handle, position })
    }

    pub fn hover(&mut self, name: &str, handle_id: f64, hovered: bool) -> String {
        self.dispatch(name, handle_id, |layer, handle| {
            if hovered { MapEvent::MouseOver { layer, handle } } else { MapEvent::MouseOut { layer, handle } }
        })
    }

    /// A layer as a GeoJSON FeatureCollection object, or `null`.
    pub fn export(&self, name: &str) -> Result<JsValue, JsValue> {
        match self.inner.registry().export_layer(&layer(name)) {
            Some(collection) => to_js(&collection),
            None => Ok(JsValue::NULL),
        }
    }

    /// `{ layerName: FeatureCollection }` for every registered layer.
    pub fn export_all(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.registry().export_all())
    }

    /// Detach and clear every layer (component unmount).
    pub fn teardown(&mut self) {
        self.inner.teardown();
    }
}

impl WasmMapView {
    /// Build and run an event; a malformed handle is ignored without touching any layer.
    fn dispatch(&mut self, name: &str, handle_id: f64, event: impl FnOnce(LayerName, FeatureHandle) -> MapEvent) -> String {
        let Some(handle) = handle(handle_id) else {
            return outcome_label(Some(CommandOutcome::Ignored)).to_string();
        };
        outcome_label(self.inner.handle(&event(layer(name), handle))).to_string()
    }
}
