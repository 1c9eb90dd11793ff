use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::feature::parse_features;
use crate::layer::LayerName;
use super::LayerRegistry;

/// Result of replacing a layer's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The overlay now holds exactly `count` features.
    Replaced { count: usize },
    /// No overlay is registered under the name; nothing changed.
    MissingLayer,
}

impl LayerRegistry {
    /// Replace the contents of the overlay `name` with the features in `geojson`.
    /// The overlay object (and its rule) is kept. Unknown names are a logged no-op:
    /// overlays are only ever created by the factory.
    /// On a parse error the overlay is left untouched.
    pub fn apply(&mut self, name: &LayerName, geojson: &str) -> Result<ApplyOutcome> {
        let Some(overlay) = self.get_mut(name) else {
            warn!(layer = %name, "layer not found, update skipped");
            return Ok(ApplyOutcome::MissingLayer);
        };

        let features = parse_features(geojson)
            .with_context(|| format!("Failed to read GeoJSON for layer {name}"))?;

        overlay.clear();
        overlay.add_features(features);
        debug!(layer = %name, count = overlay.len(), "layer data replaced");
        Ok(ApplyOutcome::Replaced { count: overlay.len() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::SurfaceLog;

    fn targets(ids: &[&str]) -> String {
        let features: Vec<String> = ids.iter().enumerate()
            .map(|(i, id)| format!(
                r#"{{"type":"Feature","properties":{{"id":"{id}"}},"geometry":{{"type":"Point","coordinates":[{i},{i}]}}}}"#
            ))
            .collect();
        format!(r#"{{"type":"FeatureCollection","features":[{}]}}"#, features.join(","))
    }

    #[test]
    fn apply_replaces_previous_contents() {
        let mut registry = LayerRegistry::initialize(&mut SurfaceLog::default());
        let name = LayerName::ApprovedTargets;

        registry.apply(&name, &targets(&["a", "b", "c"])).unwrap();
        let outcome = registry.apply(&name, &targets(&["d", "e"])).unwrap();

        assert_eq!(outcome, ApplyOutcome::Replaced { count: 2 });
        let overlay = registry.get(&name).unwrap();
        assert_eq!(overlay.to_feature_collection().feature_ids(), vec!["d", "e"]);
    }

    #[test]
    fn apply_on_unregistered_name_changes_nothing() {
        let mut registry = LayerRegistry::initialize(&mut SurfaceLog::default());
        let before: Vec<usize> = registry.overlays().map(|o| o.len()).collect();

        let outcome = registry.apply(&LayerName::parse("unknown_layer"), &targets(&["x"])).unwrap();

        assert_eq!(outcome, ApplyOutcome::MissingLayer);
        assert!(!registry.contains(&LayerName::parse("unknown_layer")));
        let after: Vec<usize> = registry.overlays().map(|o| o.len()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn parse_errors_leave_the_overlay_untouched() {
        let mut registry = LayerRegistry::initialize(&mut SurfaceLog::default());
        let name = LayerName::Targets;
        registry.apply(&name, &targets(&["a"])).unwrap();

        assert!(registry.apply(&name, "{broken").is_err());
        assert_eq!(registry.get(&name).unwrap().len(), 1);
    }

    #[test]
    fn depot_features_are_rendered_as_composites() {
        let mut registry = LayerRegistry::initialize(&mut SurfaceLog::default());
        registry.apply(&LayerName::DepotPoints, &targets(&["d1", "d2"])).unwrap();

        let overlay = registry.get(&LayerName::DepotPoints).unwrap();
        assert!(overlay.entries().iter().all(|e| e.depot().is_some()));
    }
}
