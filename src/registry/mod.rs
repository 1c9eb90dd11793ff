mod export;
mod mover;
mod registry;
mod update;

pub use mover::MoveOutcome;
pub use registry::{LayerRegistry, RenderTarget};
pub use update::ApplyOutcome;
