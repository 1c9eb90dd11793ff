use std::borrow::Cow;

use super::{
    ClickAction, HoverStyle, LayerName, LayerRule, Overlay, PathStyle, PointRender, PopupTemplate,
    DEFAULT_DEPOT_RADIUS_M,
};

const ROUTE_DASH: &str = "3,4";

/// Builds empty overlays configured with the rule for their layer name.
/// Names without a dedicated rule get the generic default rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayerFactory;

impl LayerFactory {
    /// Rendering and interaction rule for `name`.
    pub fn rule(&self, name: &LayerName) -> LayerRule {
        let name = &name.canonical();
        let base = LayerRule {
            name: name.clone(),
            path: None,
            point: PointRender::Marker,
            popup: PopupTemplate::None,
            on_click: ClickAction::None,
            hover: None,
            color_per_feature: false,
            draggable: false,
            editable: false,
        };

        match name {
            LayerName::RegionContour => LayerRule {
                path: Some(PathStyle::outline("blue", 2.0, 0.05)),
                ..base
            },
            LayerName::Targets => LayerRule {
                point: PointRender::CircleMarker { color: "blue", radius: 5.0 },
                popup: PopupTemplate::Titled { title: "Detected Target" },
                ..base
            },
            LayerName::ApprovedTargets => LayerRule {
                point: PointRender::CircleMarker { color: "blue", radius: 5.0 },
                popup: PopupTemplate::Titled { title: "Approved Target" },
                on_click: ClickAction::MoveTo(LayerName::RemovedTargets),
                editable: true,
                ..base
            },
            LayerName::RemovedTargets => LayerRule {
                point: PointRender::CircleMarker { color: "red", radius: 5.0 },
                popup: PopupTemplate::Titled { title: "Removed Target" },
                on_click: ClickAction::MoveTo(LayerName::ApprovedTargets),
                editable: true,
                ..base
            },
            LayerName::VoronoiCells => LayerRule {
                path: Some(PathStyle::outline("purple", 1.0, 0.1)),
                ..base
            },
            LayerName::DepotPoints => LayerRule {
                point: PointRender::DepotComposite {
                    circle: PathStyle::outline("green", 1.0, 0.0),
                    default_radius_m: DEFAULT_DEPOT_RADIUS_M,
                },
                popup: PopupTemplate::Depot { title: "Depot" },
                draggable: true,
                editable: true,
                ..base
            },
            LayerName::MicroRoutes => LayerRule {
                path: Some(PathStyle {
                    color: Cow::Borrowed("gray"), // replaced per feature
                    weight: 2.0,
                    opacity: 1.0,
                    fill: false,
                    fill_opacity: 0.0,
                    dash_array: Some(ROUTE_DASH),
                }),
                hover: Some(HoverStyle { weight: 5.0, dash_array: None }),
                color_per_feature: true,
                ..base
            },
            LayerName::Default | LayerName::Other(_) => LayerRule {
                point: PointRender::CircleMarker { color: "gray", radius: 5.0 },
                popup: PopupTemplate::TitledOrMissing { title: "Unknown Layer" },
                ..base
            },
        }
    }

    /// A new, empty overlay for `name`.
    pub fn create(&self, name: &LayerName) -> Overlay {
        Overlay::new(self.rule(name))
    }
}
