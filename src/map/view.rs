use anyhow::Result;
use tracing::{debug, warn};

use crate::layer::{LayerName, Overlay};
use crate::registry::{ApplyOutcome, LayerRegistry, MoveOutcome, RenderTarget};
use super::{command_for, LayerCommand, MapEvent};

/// What executing a command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Moved(MoveOutcome),
    DepotRepositioned { committed: bool },
    HoverChanged,
    /// The command referenced something that no longer exists or is not allowed; nothing changed.
    Ignored,
}

/// A map instance: owns the layer registry and the render target it draws into.
/// Interaction handlers only emit commands; this is the single place that applies them.
#[derive(Debug)]
pub struct MapView<T: RenderTarget> {
    registry: LayerRegistry,
    target: T,
}

impl<T: RenderTarget> MapView<T> {
    /// Initialize every known overlay and attach it to `target`.
    pub fn new(mut target: T) -> Self {
        let registry = LayerRegistry::initialize(&mut target);
        Self { registry, target }
    }

    #[inline] pub fn registry(&self) -> &LayerRegistry { &self.registry }
    #[inline] pub fn target(&self) -> &T { &self.target }
    #[inline] pub fn target_mut(&mut self) -> &mut T { &mut self.target }

    #[inline] pub fn layer(&self, name: &LayerName) -> Option<&Overlay> { self.registry.get(name) }

    /// Add an overlay for a name outside the known vocabulary (or reset an existing one).
    pub fn register(&mut self, name: LayerName) -> &Overlay {
        self.registry.register(name, &mut self.target)
    }

    /// Replace a layer's data: the overlay leaves the layer control, is refilled, then re-added.
    pub fn apply(&mut self, name: &LayerName, geojson: &str) -> Result<ApplyOutcome> {
        if !self.registry.contains(name) {
            return self.registry.apply(name, geojson);
        }
        self.target.detach(name);
        let outcome = self.registry.apply(name, geojson);
        if let Some(overlay) = self.registry.get(name) {
            self.target.attach(overlay);
        }
        outcome
    }

    /// Run the layer's interaction handler for `event` and apply whatever it emits.
    pub fn handle(&mut self, event: &MapEvent) -> Option<CommandOutcome> {
        let Some(overlay) = self.registry.get(event.layer()) else {
            warn!(layer = %event.layer(), "event on unknown layer ignored");
            return None;
        };
        let command = command_for(overlay.rule(), event)?;
        Some(self.execute(&command))
    }

    /// Apply a layer command and refresh the overlays it touched.
    pub fn execute(&mut self, command: &LayerCommand) -> CommandOutcome {
        debug!(?command, "executing layer command");
        match command {
            LayerCommand::MoveFeature { handle, from, to } => {
                let outcome = self.registry.move_feature(*handle, from, to);
                if matches!(outcome, MoveOutcome::Moved { .. }) {
                    self.refresh(from);
                    self.refresh(to);
                }
                CommandOutcome::Moved(outcome)
            }
            LayerCommand::RepositionDepot { layer, handle, position, commit } => {
                let Some(overlay) = self.registry.get_mut(layer) else {
                    warn!(layer = %layer, "layer not found, reposition skipped");
                    return CommandOutcome::Ignored;
                };
                if let Err(err) = overlay.reposition_depot(*handle, *position, *commit) {
                    warn!(layer = %layer, ?handle, "reposition rejected: {err:#}");
                    return CommandOutcome::Ignored;
                }
                self.refresh(layer);
                CommandOutcome::DepotRepositioned { committed: *commit }
            }
            LayerCommand::SetHover { layer, handle, hovered } => {
                let changed = self.registry.get_mut(layer)
                    .is_some_and(|overlay| overlay.set_hovered(*handle, *hovered));
                if !changed {
                    return CommandOutcome::Ignored;
                }
                self.refresh(layer);
                CommandOutcome::HoverChanged
            }
        }
    }

    /// Detach every overlay and drop the registry contents.
    pub fn teardown(&mut self) {
        self.registry.teardown(&mut self.target);
    }

    pub fn into_target(self) -> T { self.target }

    fn refresh(&mut self, name: &LayerName) {
        if let Some(overlay) = self.registry.get(name) {
            self.target.refresh(overlay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::FeatureHandle;
    use crate::map::SurfaceLog;
    use geo::Point;

    const APPROVED: &str = r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"id":"t1"},"geometry":{"type":"Point","coordinates":[1,2]}}]}"#;
    const DEPOTS: &str = r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"id":"d1"},"geometry":{"type":"Point","coordinates":[0,0]}}]}"#;

    #[test]
    fn clicking_an_approved_target_moves_it_to_removed() {
        let mut view = MapView::new(SurfaceLog::default());
        view.apply(&LayerName::ApprovedTargets, APPROVED).unwrap();

        let approved = view.layer(&LayerName::ApprovedTargets).unwrap();
        assert_eq!(approved.len(), 1);
        let handle = approved.find_by_id("t1").unwrap();

        let outcome = view.handle(&MapEvent::Click { layer: LayerName::ApprovedTargets, handle });
        assert!(matches!(outcome, Some(CommandOutcome::Moved(MoveOutcome::Moved { .. }))));

        assert!(view.layer(&LayerName::ApprovedTargets).unwrap().is_empty());
        let removed = view.layer(&LayerName::RemovedTargets).unwrap();
        assert_eq!(removed.to_feature_collection().feature_ids(), vec!["t1"]);

        // And back again.
        let handle = removed.find_by_id("t1").unwrap();
        view.handle(&MapEvent::Click { layer: LayerName::RemovedTargets, handle });
        assert_eq!(view.layer(&LayerName::ApprovedTargets).unwrap().len(), 1);
        assert!(view.layer(&LayerName::RemovedTargets).unwrap().is_empty());
    }

    #[test]
    fn dragging_a_depot_commits_on_drag_end() {
        let mut view = MapView::new(SurfaceLog::default());
        view.apply(&LayerName::DepotPoints, DEPOTS).unwrap();
        let layer = LayerName::DepotPoints;
        let handle = view.layer(&layer).unwrap().find_by_id("d1").unwrap();

        view.handle(&MapEvent::Drag { layer: layer.clone(), handle, position: Point::new(1.0, 1.0) });
        let entry = view.layer(&layer).unwrap().entry(handle).unwrap();
        assert_eq!(entry.depot().unwrap().display_circle().unwrap().center, Point::new(1.0, 1.0));
        assert_eq!(entry.feature().position(), Some(Point::new(0.0, 0.0)));

        let outcome = view.handle(&MapEvent::DragEnd { layer: layer.clone(), handle, position: Point::new(2.0, 3.0) });
        assert_eq!(outcome, Some(CommandOutcome::DepotRepositioned { committed: true }));
        let exported = view.registry().export_layer(&layer).unwrap();
        assert_eq!(exported.features[0].position(), Some(Point::new(2.0, 3.0)));
    }

    #[test]
    fn apply_reattaches_the_overlay() {
        let mut view = MapView::new(SurfaceLog::default());
        let before = view.target().refresh_count(&LayerName::Targets);
        view.apply(&LayerName::Targets, APPROVED).unwrap();
        assert!(view.target().is_attached(&LayerName::Targets));
        assert_eq!(view.target().refresh_count(&LayerName::Targets), before + 1);
    }

    #[test]
    fn events_on_unknown_layers_or_handles_are_ignored() {
        let mut view = MapView::new(SurfaceLog::default());
        let stray = MapEvent::Click { layer: LayerName::parse("ghost"), handle: FeatureHandle(0) };
        assert_eq!(view.handle(&stray), None);

        let stale = MapEvent::Click { layer: LayerName::ApprovedTargets, handle: FeatureHandle(99) };
        assert_eq!(view.handle(&stale), Some(CommandOutcome::Moved(MoveOutcome::MissingFeature)));
    }

    #[test]
    fn registering_a_custom_layer_uses_the_default_rule() {
        let mut view = MapView::new(SurfaceLog::default());
        let name = LayerName::parse("flight_paths");
        view.register(name.clone());
        view.apply(&name, APPROVED).unwrap();

        let overlay = view.layer(&name).unwrap();
        let handle = overlay.find_by_id("t1").unwrap();
        assert_eq!(overlay.popup(handle).as_deref(), Some("<b>Unknown Layer</b><br>ID: t1"));
        assert!(view.target().is_attached(&name));
    }
}
