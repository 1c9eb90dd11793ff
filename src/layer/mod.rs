mod depot;
mod factory;
mod name;
mod overlay;
mod rule;

pub use depot::{DepotEntry, DisplayCircle, SubObject};
pub use factory::LayerFactory;
pub use name::LayerName;
pub use overlay::{EditOptions, FeatureHandle, Overlay, OverlayEntry};
pub use rule::{
    depot_radius, ClickAction, HoverStyle, LayerRule, PathStyle, PointRender, PopupTemplate,
    DEFAULT_DEPOT_RADIUS_M,
};
