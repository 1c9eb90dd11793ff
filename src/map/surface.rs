use std::collections::{BTreeMap, BTreeSet};

use crate::layer::{LayerName, Overlay};
use crate::registry::RenderTarget;

/// Headless render target that records what is attached.
/// Used by the CLI and by tests in place of a real map.
#[derive(Debug, Clone, Default)]
pub struct SurfaceLog {
    attached: BTreeSet<LayerName>,
    refreshes: BTreeMap<LayerName, usize>,
}

impl SurfaceLog {
    #[inline] pub fn is_attached(&self, name: &LayerName) -> bool { self.attached.contains(name) }

    pub fn attached(&self) -> impl Iterator<Item = &LayerName> + '_ { self.attached.iter() }

    /// How many times `name` was attached or refreshed.
    pub fn refresh_count(&self, name: &LayerName) -> usize {
        self.refreshes.get(name).copied().unwrap_or(0)
    }

    fn bump(&mut self, name: &LayerName) {
        *self.refreshes.entry(name.clone()).or_default() += 1;
    }
}

impl RenderTarget for SurfaceLog {
    fn attach(&mut self, overlay: &Overlay) {
        self.attached.insert(overlay.name().clone());
        self.bump(overlay.name());
    }

    fn detach(&mut self, name: &LayerName) {
        self.attached.remove(name);
    }

    fn refresh(&mut self, overlay: &Overlay) {
        self.bump(overlay.name());
    }
}
