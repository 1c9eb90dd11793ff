use std::borrow::Cow;

use serde::Serialize;

use crate::feature::Feature;
use super::LayerName;

/// Radius (meters) used for depots whose feature carries no `depot_radius`.
pub const DEFAULT_DEPOT_RADIUS_M: f64 = 500.0;

/// Stroke/fill style for line and polygon features (and depot radius circles).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathStyle {
    pub color: Cow<'static, str>,
    pub weight: f32,
    pub opacity: f32,
    pub fill: bool,
    pub fill_opacity: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_array: Option<&'static str>,
}

impl PathStyle {
    pub const fn outline(color: &'static str, weight: f32, fill_opacity: f32) -> Self {
        Self {
            color: Cow::Borrowed(color),
            weight,
            opacity: 1.0,
            fill: false,
            fill_opacity,
            dash_array: None,
        }
    }
}

/// Overrides applied while the pointer hovers a feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HoverStyle {
    pub weight: f32,
    pub dash_array: Option<&'static str>,
}

/// How point geometries are drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointRender {
    /// Plain marker pin.
    Marker,
    CircleMarker { color: &'static str, radius: f32 },
    /// Draggable center marker plus a radius circle derived from it.
    DepotComposite { circle: PathStyle, default_radius_m: f64 },
}

/// Popup text bound to every feature of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PopupTemplate {
    None,
    /// `<b>{title}</b><br>ID: {id}`
    Titled { title: &'static str },
    /// Titled popup that falls back to `N/A` when the feature has no id.
    TitledOrMissing { title: &'static str },
    /// Titled popup followed by the depot radius.
    Depot { title: &'static str },
}

impl PopupTemplate {
    pub fn render(&self, feature: &Feature) -> Option<String> {
        let id = feature.feature_id();
        match *self {
            PopupTemplate::None => None,
            PopupTemplate::Titled { title } => Some(format!("<b>{title}</b><br>ID: {}", id.unwrap_or_default())),
            PopupTemplate::TitledOrMissing { title } => {
                Some(format!("<b>{title}</b><br>ID: {}", id.as_deref().unwrap_or("N/A")))
            }
            PopupTemplate::Depot { title } => Some(format!(
                "<b>{title}</b><br>ID: {}<br>Radius: {}m",
                id.unwrap_or_default(),
                depot_radius(feature),
            )),
        }
    }
}

/// What a click on a feature does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "to", rename_all = "snake_case")]
pub enum ClickAction {
    None,
    MoveTo(LayerName),
}

/// Per-layer rendering and interaction rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerRule {
    pub name: LayerName,
    /// Style for non-point geometries.
    pub path: Option<PathStyle>,
    pub point: PointRender,
    pub popup: PopupTemplate,
    pub on_click: ClickAction,
    pub hover: Option<HoverStyle>,
    /// Give each feature its own random path color.
    pub color_per_feature: bool,
    pub draggable: bool,
    pub editable: bool,
}

impl LayerRule {
    #[inline] pub fn is_composite(&self) -> bool {
        matches!(self.point, PointRender::DepotComposite { .. })
    }
}

/// `properties.depot_radius` in meters (a number or numeric string),
/// or the default when absent, non-numeric or zero.
pub fn depot_radius(feature: &Feature) -> f64 {
    feature.property("depot_radius")
        .and_then(|value| match value {
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            other => other.as_f64(),
        })
        .filter(|r| r.is_finite() && *r != 0.0)
        .unwrap_or(DEFAULT_DEPOT_RADIUS_M)
}
