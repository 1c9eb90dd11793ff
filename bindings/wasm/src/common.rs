use brushmap_core::{FeatureHandle, LayerName};
use serde::Serialize;
use wasm_bindgen::JsValue;

pub(crate) fn js_err(e: impl ToString) -> JsValue {
    JsValue::from_str(&e.to_string())
}

pub(crate) fn layer(name: &str) -> LayerName {
    LayerName::parse(name)
}

/// Largest integer a JS number holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Handles cross the boundary as plain numbers. NaN, negative, fractional
/// or out-of-range values name no feature.
pub(crate) fn handle(raw: f64) -> Option<FeatureHandle> {
    (raw.is_finite() && raw >= 0.0 && raw.fract() == 0.0 && raw <= MAX_SAFE_INTEGER)
        .then(|| FeatureHandle(raw as u64))
}

/// Serialize through a JSON string and parse on the JS side, so GeoJSON maps stay plain objects.
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(value)
        .map_err(|e| js_err(format!("Failed to serialize value: {e}")))?;
    js_sys::JSON::parse(&json)
}

pub(crate) fn console_warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_whole_non_negative_numbers_are_handles() {
        assert_eq!(handle(0.0), Some(FeatureHandle(0)));
        assert_eq!(handle(42.0), Some(FeatureHandle(42)));
        for bad in [f64::NAN, -1.0, 1.5, f64::INFINITY, MAX_SAFE_INTEGER + 2.0] {
            assert_eq!(handle(bad), None, "{bad}");
        }
    }
}
