use std::{borrow::Cow, collections::HashSet};

use anyhow::{anyhow, bail, Result};
use geo::Point;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::feature::{Feature, FeatureCollection, GeometryKind};
use super::{DepotEntry, LayerName, LayerRule, PathStyle, SubObject};

/// Overlay-local identifier of one rendered entry. Never reused within an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeatureHandle(pub u64);

/// Edit affordances offered by the map's editing toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EditOptions {
    pub editable: bool,
    pub draggable: bool,
    pub removable: bool,
}

impl EditOptions {
    pub const LOCKED: EditOptions = EditOptions { editable: false, draggable: false, removable: false };
}

#[derive(Debug, Clone, PartialEq)]
enum Rendered {
    Plain(Feature),
    Depot(DepotEntry),
}

/// One feature as rendered by its overlay's rule.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayEntry {
    handle: FeatureHandle,
    rendered: Rendered,
    color: Option<String>, // per-feature color, micro-routes only
    hovered: bool,
}

impl OverlayEntry {
    #[inline] pub fn handle(&self) -> FeatureHandle { self.handle }

    #[inline] pub fn is_hovered(&self) -> bool { self.hovered }

    pub fn feature(&self) -> &Feature {
        match &self.rendered {
            Rendered::Plain(feature) => feature,
            Rendered::Depot(depot) => depot.feature(),
        }
    }

    pub fn depot(&self) -> Option<&DepotEntry> {
        match &self.rendered {
            Rendered::Depot(depot) => Some(depot),
            Rendered::Plain(_) => None,
        }
    }

    /// Visual parts of this entry. Plain features have a single feature-bearing part.
    pub fn sub_objects(&self) -> Vec<SubObject<'_>> {
        match &self.rendered {
            Rendered::Plain(feature) => vec![SubObject::Marker { feature, position: feature.position() }],
            Rendered::Depot(depot) => depot.sub_objects(),
        }
    }

    fn into_feature(self) -> Feature {
        match self.rendered {
            Rendered::Plain(feature) => feature,
            Rendered::Depot(depot) => depot.into_feature(),
        }
    }
}

/// A named, live collection of rendered features.
#[derive(Debug, Clone)]
pub struct Overlay {
    rule: LayerRule,
    entries: Vec<OverlayEntry>,
    next_handle: u64,
    edit: EditOptions,
}

impl Overlay {
    pub fn new(rule: LayerRule) -> Self {
        let edit = EditOptions {
            editable: rule.editable,
            draggable: rule.draggable,
            removable: rule.editable,
        };
        Self { rule, entries: Vec::new(), next_handle: 0, edit }
    }

    #[inline] pub fn name(&self) -> &LayerName { &self.rule.name }
    #[inline] pub fn rule(&self) -> &LayerRule { &self.rule }
    #[inline] pub fn len(&self) -> usize { self.entries.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    #[inline] pub fn entries(&self) -> &[OverlayEntry] { &self.entries }
    #[inline] pub fn edit_options(&self) -> EditOptions { self.edit }

    pub fn set_edit_options(&mut self, edit: EditOptions) { self.edit = edit; }

    pub fn entry(&self, handle: FeatureHandle) -> Option<&OverlayEntry> {
        self.entries.iter().find(|e| e.handle == handle)
    }

    pub fn features(&self) -> impl Iterator<Item = &Feature> + '_ {
        self.entries.iter().map(OverlayEntry::feature)
    }

    /// First entry whose `properties.id` equals `id`.
    pub fn find_by_id(&self, id: &str) -> Option<FeatureHandle> {
        self.entries.iter()
            .find(|e| e.feature().feature_id().as_deref() == Some(id))
            .map(|e| e.handle)
    }

    pub fn clear(&mut self) { self.entries.clear(); }

    /// Render `feature` with this overlay's rule and add it.
    pub fn add_feature(&mut self, feature: Feature) -> FeatureHandle {
        let handle = FeatureHandle(self.next_handle);
        self.next_handle += 1;

        let single_point = feature.geometry.as_ref().is_some_and(|g| g.kind == GeometryKind::Point);
        let rendered = if self.rule.is_composite() && single_point {
            Rendered::Depot(DepotEntry::new(feature))
        } else {
            Rendered::Plain(feature)
        };
        let color = self.rule.color_per_feature.then(|| self.pick_color());

        self.entries.push(OverlayEntry { handle, rendered, color, hovered: false });
        handle
    }

    pub fn add_features(&mut self, features: impl IntoIterator<Item = Feature>) -> Vec<FeatureHandle> {
        features.into_iter().map(|f| self.add_feature(f)).collect()
    }

    /// Remove an entry, returning its feature data.
    pub fn remove(&mut self, handle: FeatureHandle) -> Option<Feature> {
        let idx = self.entries.iter().position(|e| e.handle == handle)?;
        Some(self.entries.remove(idx).into_feature())
    }

    pub fn popup(&self, handle: FeatureHandle) -> Option<String> {
        self.rule.popup.render(self.entry(handle)?.feature())
    }

    /// Current path style of an entry, with per-feature color and hover overrides applied.
    pub fn path_style(&self, handle: FeatureHandle) -> Option<PathStyle> {
        let entry = self.entry(handle)?;
        let mut style = self.rule.path.clone()?;
        if let Some(color) = &entry.color {
            style.color = Cow::Owned(color.clone());
        }
        if let (true, Some(hover)) = (entry.hovered, self.rule.hover) {
            style.weight = hover.weight;
            style.dash_array = hover.dash_array;
        }
        Some(style)
    }

    /// Set hover state; returns false when the handle is unknown or the layer has no hover style.
    pub fn set_hovered(&mut self, handle: FeatureHandle, hovered: bool) -> bool {
        if self.rule.hover.is_none() { return false; }
        match self.entries.iter_mut().find(|e| e.handle == handle) {
            Some(entry) => { entry.hovered = hovered; true }
            None => false,
        }
    }

    /// Move a depot marker while dragging (circle follows), or commit the final position.
    pub fn reposition_depot(&mut self, handle: FeatureHandle, position: Point<f64>, commit: bool) -> Result<()> {
        if !self.edit.draggable {
            bail!("Layer {} does not allow dragging", self.rule.name);
        }
        let entry = self.entries.iter_mut().find(|e| e.handle == handle)
            .ok_or_else(|| anyhow!("No feature {:?} in layer {}", handle, self.rule.name))?;
        let Rendered::Depot(depot) = &mut entry.rendered else {
            bail!("Feature {:?} in layer {} is not a depot", handle, self.rule.name);
        };
        if commit {
            depot.commit(position)
        } else {
            depot.drag_to(position);
            Ok(())
        }
    }

    /// Feature data of every entry, reading only feature-bearing sub-objects.
    pub fn to_feature_collection(&self) -> FeatureCollection {
        self.entries.iter()
            .flat_map(|e| e.sub_objects())
            .filter_map(|part| part.feature())
            .cloned()
            .collect()
    }

    /// Random hex color not yet used by another entry of this overlay.
    fn pick_color(&self) -> String {
        let used: HashSet<&str> = self.entries.iter().filter_map(|e| e.color.as_deref()).collect();
        let mut rng = rand::rng();
        loop {
            let color = format!("#{:06x}", rng.random_range(0..=0xFF_FFFFu32));
            if !used.contains(color.as_str()) {
                return color;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::LayerFactory;
    use serde_json::json;

    fn route(id: &str) -> Feature {
        serde_json::from_value(json!({
            "type": "Feature",
            "properties": { "id": id },
            "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]] },
        })).unwrap()
    }

    #[test]
    fn handles_are_not_reused_after_removal() {
        let mut overlay = LayerFactory.create(&LayerName::Targets);
        let a = overlay.add_feature(Feature::point("a", Point::new(0.0, 0.0)));
        overlay.remove(a).unwrap();
        let b = overlay.add_feature(Feature::point("b", Point::new(0.0, 0.0)));
        assert_ne!(a, b);
        assert_eq!(overlay.find_by_id("b"), Some(b));
        assert_eq!(overlay.find_by_id("a"), None);
    }

    #[test]
    fn routes_get_distinct_colors_and_hover_styles() {
        let mut overlay = LayerFactory.create(&LayerName::MicroRoutes);
        let handles = overlay.add_features((0..50).map(|i| route(&format!("r{i}"))));

        let colors: HashSet<String> = handles.iter()
            .map(|h| overlay.path_style(*h).unwrap().color.into_owned())
            .collect();
        assert_eq!(colors.len(), 50);
        assert!(colors.iter().all(|c| c.len() == 7 && c.starts_with('#')));

        let first = handles[0];
        let resting = overlay.path_style(first).unwrap();
        assert!(overlay.set_hovered(first, true));
        let hovered = overlay.path_style(first).unwrap();
        assert_eq!(hovered.weight, 5.0);
        assert_eq!(hovered.dash_array, None);
        assert_eq!(hovered.color, resting.color);

        overlay.set_hovered(first, false);
        assert_eq!(overlay.path_style(first).unwrap(), resting);
    }

    #[test]
    fn layers_without_hover_ignore_hover_requests() {
        let mut overlay = LayerFactory.create(&LayerName::VoronoiCells);
        let cell = overlay.add_feature(route("c1"));
        assert!(!overlay.set_hovered(cell, true));
    }

    #[test]
    fn multi_point_depots_stay_plain_features() {
        let mut overlay = LayerFactory.create(&LayerName::DepotPoints);
        let cluster: Feature = serde_json::from_value(json!({
            "type": "Feature",
            "properties": { "id": "cluster" },
            "geometry": { "type": "MultiPoint", "coordinates": [[0.0, 0.0], [1.0, 1.0]] },
        })).unwrap();
        let handle = overlay.add_feature(cluster.clone());

        assert!(overlay.entry(handle).unwrap().depot().is_none());
        assert!(overlay.reposition_depot(handle, Point::new(2.0, 2.0), true).is_err());
        assert_eq!(overlay.to_feature_collection().features, vec![cluster]);
    }

    #[test]
    fn depot_overlay_exports_one_feature_per_depot() {
        let mut overlay = LayerFactory.create(&LayerName::DepotPoints);
        let d1 = overlay.add_feature(Feature::point("d1", Point::new(1.0, 1.0)));
        overlay.add_feature(Feature::point("d2", Point::new(2.0, 2.0)));

        assert_eq!(overlay.entry(d1).unwrap().sub_objects().len(), 2);
        let exported = overlay.to_feature_collection();
        assert_eq!(exported.feature_ids(), vec!["d1", "d2"]);
    }

    #[test]
    fn dragging_requires_a_draggable_depot_layer() {
        let mut targets = LayerFactory.create(&LayerName::ApprovedTargets);
        let t1 = targets.add_feature(Feature::point("t1", Point::new(0.0, 0.0)));
        assert!(targets.reposition_depot(t1, Point::new(1.0, 1.0), true).is_err());

        let mut depots = LayerFactory.create(&LayerName::DepotPoints);
        let d1 = depots.add_feature(Feature::point("d1", Point::new(0.0, 0.0)));
        depots.reposition_depot(d1, Point::new(3.0, 4.0), true).unwrap();
        assert_eq!(depots.entry(d1).unwrap().feature().position(), Some(Point::new(3.0, 4.0)));

        depots.set_edit_options(EditOptions::LOCKED);
        assert!(depots.reposition_depot(d1, Point::new(5.0, 6.0), true).is_err());
    }
}
