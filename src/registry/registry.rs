use std::collections::{btree_map::Entry, BTreeMap};

use crate::layer::{EditOptions, LayerFactory, LayerName, Overlay};

/// Whatever displays overlays (a browser map, a test log).
/// The target only references overlays by name; the registry owns them.
pub trait RenderTarget {
    /// Start displaying `overlay` (also used to re-add it to the layer control).
    fn attach(&mut self, overlay: &Overlay);

    /// Stop displaying the overlay named `name`.
    fn detach(&mut self, name: &LayerName);

    /// Contents of an attached overlay changed in place.
    fn refresh(&mut self, _overlay: &Overlay) {}
}

/// The live set of named overlays, one per layer name.
/// Owned by a map view; nothing here is global.
#[derive(Debug, Clone, Default)]
pub struct LayerRegistry {
    factory: LayerFactory,
    overlays: BTreeMap<LayerName, Overlay>,
}

impl LayerRegistry {
    /// Empty registry with no overlays.
    pub fn new() -> Self { Self::default() }

    /// Create one empty overlay per known layer name and attach each to `target` right away.
    /// Overlays whose rule is not editable get every edit affordance switched off.
    pub fn initialize<T: RenderTarget + ?Sized>(target: &mut T) -> Self {
        let mut registry = Self::new();
        for name in LayerName::KNOWN {
            registry.register(name, target);
        }
        registry
    }

    /// Create (or replace) the overlay for `name` through the factory and attach it.
    pub fn register<T: RenderTarget + ?Sized>(&mut self, name: LayerName, target: &mut T) -> &mut Overlay {
        let name = name.canonical();
        let mut overlay = self.factory.create(&name);
        if !overlay.rule().editable {
            overlay.set_edit_options(EditOptions::LOCKED);
        }
        match self.overlays.entry(name) {
            Entry::Occupied(mut slot) => {
                target.detach(slot.key());
                target.attach(&overlay);
                slot.insert(overlay);
                slot.into_mut()
            }
            Entry::Vacant(slot) => {
                target.attach(&overlay);
                slot.insert(overlay)
            }
        }
    }

    /// Detach every overlay from `target` and drop them.
    pub fn teardown<T: RenderTarget + ?Sized>(&mut self, target: &mut T) {
        for name in self.overlays.keys() {
            target.detach(name);
        }
        self.overlays.clear();
    }

    #[inline] pub fn get(&self, name: &LayerName) -> Option<&Overlay> { self.overlays.get(name) }
    #[inline] pub fn get_mut(&mut self, name: &LayerName) -> Option<&mut Overlay> { self.overlays.get_mut(name) }
    #[inline] pub fn contains(&self, name: &LayerName) -> bool { self.overlays.contains_key(name) }
    #[inline] pub fn len(&self) -> usize { self.overlays.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.overlays.is_empty() }

    pub fn names(&self) -> impl Iterator<Item = &LayerName> + '_ { self.overlays.keys() }

    pub fn overlays(&self) -> impl Iterator<Item = &Overlay> + '_ { self.overlays.values() }

    pub fn factory(&self) -> &LayerFactory { &self.factory }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::SurfaceLog;

    #[test]
    fn initialize_attaches_one_empty_overlay_per_known_name() {
        let mut surface = SurfaceLog::default();
        let registry = LayerRegistry::initialize(&mut surface);

        assert_eq!(registry.len(), LayerName::KNOWN.len());
        for name in LayerName::KNOWN {
            let overlay = registry.get(&name).unwrap();
            assert!(overlay.is_empty(), "{name}");
            assert!(surface.is_attached(&name), "{name}");
        }
    }

    #[test]
    fn non_editable_overlays_are_locked() {
        let mut surface = SurfaceLog::default();
        let registry = LayerRegistry::initialize(&mut surface);

        for name in [LayerName::RegionContour, LayerName::VoronoiCells, LayerName::Targets] {
            assert_eq!(registry.get(&name).unwrap().edit_options(), EditOptions::LOCKED);
        }
        let depots = registry.get(&LayerName::DepotPoints).unwrap().edit_options();
        assert!(depots.editable && depots.draggable && depots.removable);
    }

    #[test]
    fn get_reports_missing_layers_without_panicking() {
        let registry = LayerRegistry::new();
        assert!(registry.get(&LayerName::parse("nope")).is_none());
    }

    #[test]
    fn register_replaces_existing_overlay() {
        let mut surface = SurfaceLog::default();
        let mut registry = LayerRegistry::initialize(&mut surface);
        registry.get_mut(&LayerName::Targets).unwrap()
            .add_feature(crate::feature::Feature::point("t1", geo::Point::new(0.0, 0.0)));

        registry.register(LayerName::Targets, &mut surface);
        assert!(registry.get(&LayerName::Targets).unwrap().is_empty());
        assert_eq!(registry.len(), LayerName::KNOWN.len());
        assert!(surface.is_attached(&LayerName::Targets));
    }

    #[test]
    fn spelled_out_known_name_reuses_the_known_overlay() {
        let mut surface = SurfaceLog::default();
        let mut registry = LayerRegistry::initialize(&mut surface);

        let overlay = registry.register(LayerName::Other("approved_targets".to_string()), &mut surface);
        assert!(matches!(overlay.name(), LayerName::ApprovedTargets));
        assert!(overlay.rule().editable);

        assert_eq!(registry.len(), LayerName::KNOWN.len());
        let same_wire_name = registry.names().filter(|n| n.as_str() == "approved_targets").count();
        assert_eq!(same_wire_name, 1);
    }

    #[test]
    fn teardown_detaches_everything() {
        let mut surface = SurfaceLog::default();
        let mut registry = LayerRegistry::initialize(&mut surface);
        registry.teardown(&mut surface);
        assert!(registry.is_empty());
        assert_eq!(surface.attached().count(), 0);
    }
}
