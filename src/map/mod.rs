mod event;
mod surface;
mod view;

pub use event::{command_for, LayerCommand, MapEvent};
pub use surface::SurfaceLog;
pub use view::{CommandOutcome, MapView};
