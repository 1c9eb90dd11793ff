use tracing::{debug, warn};

use crate::layer::{FeatureHandle, LayerName};
use super::LayerRegistry;

/// Result of moving a feature between overlays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The feature now lives in the destination overlay under `handle`.
    Moved { handle: FeatureHandle },
    MissingLayer(LayerName),
    MissingFeature,
    SameLayer,
}

impl LayerRegistry {
    /// Move one feature from `from` to `to`. The destination renders it with its own rule.
    /// Everything is checked before anything changes, so a failed move leaves both overlays as they were.
    pub fn move_feature(&mut self, handle: FeatureHandle, from: &LayerName, to: &LayerName) -> MoveOutcome {
        if from == to {
            return MoveOutcome::SameLayer;
        }
        for name in [from, to] {
            if !self.contains(name) {
                warn!(layer = %name, "layer not found, move skipped");
                return MoveOutcome::MissingLayer(name.clone());
            }
        }

        let Some(feature) = self.get(from)
            .and_then(|o| o.entry(handle))
            .map(|e| e.feature().clone())
        else {
            warn!(layer = %from, ?handle, "feature not found, move skipped");
            return MoveOutcome::MissingFeature;
        };

        let Some(dest) = self.get_mut(to) else {
            return MoveOutcome::MissingLayer(to.clone());
        };
        let moved = dest.add_feature(feature);
        if let Some(source) = self.get_mut(from) {
            source.remove(handle);
        }

        debug!(from = %from, to = %to, ?handle, ?moved, "feature moved");
        MoveOutcome::Moved { handle: moved }
    }
}
