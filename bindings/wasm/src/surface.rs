use brushmap_core::{LayerName, Overlay, RenderTarget};
use js_sys::Function;
use wasm_bindgen::JsValue;

use crate::common::console_warn;

/// Forwards layer-control changes to a JS callback `(op, layerName) => void`,
/// where `op` is one of "attach", "detach", "refresh".
#[derive(Debug, Default)]
pub struct JsSurface {
    callback: Option<Function>,
}

impl JsSurface {
    pub fn new(callback: Option<Function>) -> Self { Self { callback } }

    fn notify(&self, op: &str, name: &LayerName) {
        let Some(callback) = &self.callback else { return };
        if let Err(err) = callback.call2(&JsValue::NULL, &JsValue::from_str(op), &JsValue::from_str(name.as_str())) {
            console_warn(&format!("map surface callback failed on {op} {name}: {err:?}"));
        }
    }
}

impl RenderTarget for JsSurface {
    fn attach(&mut self, overlay: &Overlay) { self.notify("attach", overlay.name()); }

    fn detach(&mut self, name: &LayerName) { self.notify("detach", name); }

    fn refresh(&mut self, overlay: &Overlay) { self.notify("refresh", overlay.name()); }
}
