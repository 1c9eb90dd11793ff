#![doc = "Brushmap public API"]
mod api;
mod config;
mod feature;
mod layer;
mod map;
mod registry;
mod sync;

#[doc(inline)]
pub use feature::{parse_features, Feature, FeatureCollection, Geometry, GeometryKind};

#[doc(inline)]
pub use layer::{
    depot_radius, ClickAction, DepotEntry, DisplayCircle, EditOptions, FeatureHandle, HoverStyle, LayerFactory,
    LayerName, LayerRule, Overlay, OverlayEntry, PathStyle, PointRender, PopupTemplate, SubObject,
    DEFAULT_DEPOT_RADIUS_M,
};

#[doc(inline)]
pub use registry::{ApplyOutcome, LayerRegistry, MoveOutcome, RenderTarget};

#[doc(inline)]
pub use map::{command_for, CommandOutcome, LayerCommand, MapEvent, MapView, SurfaceLog};

#[doc(inline)]
pub use api::*;

#[doc(inline)]
pub use config::{ClientConfig, DEFAULT_ENDPOINT, ENDPOINT_ENV, TIMEOUT_ENV};

#[doc(inline)]
pub use sync::{
    apply_generated, geojson_files, Alert, FetchReport, FetchState, FetchTicket, LogAlert, MapSync,
    SaveStatus, SAVE_FAILED_ALERT,
};
