use geo::Point;

use crate::layer::{ClickAction, FeatureHandle, LayerName, LayerRule};

/// A user interaction with one rendered feature.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    Click { layer: LayerName, handle: FeatureHandle },
    /// Marker dragged to `position` (lon, lat); fired repeatedly while dragging.
    Drag { layer: LayerName, handle: FeatureHandle, position: Point<f64> },
    DragEnd { layer: LayerName, handle: FeatureHandle, position: Point<f64> },
    MouseOver { layer: LayerName, handle: FeatureHandle },
    MouseOut { layer: LayerName, handle: FeatureHandle },
}

impl MapEvent {
    pub fn layer(&self) -> &LayerName {
        match self {
            MapEvent::Click { layer, .. }
            | MapEvent::Drag { layer, .. }
            | MapEvent::DragEnd { layer, .. }
            | MapEvent::MouseOver { layer, .. }
            | MapEvent::MouseOut { layer, .. } => layer,
        }
    }

    pub fn handle(&self) -> FeatureHandle {
        match *self {
            MapEvent::Click { handle, .. }
            | MapEvent::Drag { handle, .. }
            | MapEvent::DragEnd { handle, .. }
            | MapEvent::MouseOver { handle, .. }
            | MapEvent::MouseOut { handle, .. } => handle,
        }
    }
}

/// A state change requested by a layer's interaction handler.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerCommand {
    MoveFeature { handle: FeatureHandle, from: LayerName, to: LayerName },
    /// `commit: false` moves the marker only; `commit: true` writes the coordinates into the feature.
    RepositionDepot { layer: LayerName, handle: FeatureHandle, position: Point<f64>, commit: bool },
    SetHover { layer: LayerName, handle: FeatureHandle, hovered: bool },
}

/// Translate an event into the command the layer's rule asks for, if any.
pub fn command_for(rule: &LayerRule, event: &MapEvent) -> Option<LayerCommand> {
    let layer = event.layer().clone();
    let handle = event.handle();
    match event {
        MapEvent::Click { .. } => match &rule.on_click {
            ClickAction::MoveTo(to) => Some(LayerCommand::MoveFeature { handle, from: layer, to: to.clone() }),
            ClickAction::None => None,
        },
        MapEvent::Drag { position, .. } if rule.draggable => {
            Some(LayerCommand::RepositionDepot { layer, handle, position: *position, commit: false })
        }
        MapEvent::DragEnd { position, .. } if rule.draggable => {
            Some(LayerCommand::RepositionDepot { layer, handle, position: *position, commit: true })
        }
        MapEvent::MouseOver { .. } if rule.hover.is_some() => {
            Some(LayerCommand::SetHover { layer, handle, hovered: true })
        }
        MapEvent::MouseOut { .. } if rule.hover.is_some() => {
            Some(LayerCommand::SetHover { layer, handle, hovered: false })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::LayerFactory;

    #[test]
    fn clicks_follow_the_move_rule() {
        let rule = LayerFactory.rule(&LayerName::RemovedTargets);
        let event = MapEvent::Click { layer: LayerName::RemovedTargets, handle: FeatureHandle(3) };
        assert_eq!(
            command_for(&rule, &event),
            Some(LayerCommand::MoveFeature {
                handle: FeatureHandle(3),
                from: LayerName::RemovedTargets,
                to: LayerName::ApprovedTargets,
            }),
        );
    }

    #[test]
    fn non_interactive_layers_emit_nothing() {
        let rule = LayerFactory.rule(&LayerName::VoronoiCells);
        let handle = FeatureHandle(0);
        let layer = LayerName::VoronoiCells;
        let position = Point::new(0.0, 0.0);
        for event in [
            MapEvent::Click { layer: layer.clone(), handle },
            MapEvent::Drag { layer: layer.clone(), handle, position },
            MapEvent::DragEnd { layer: layer.clone(), handle, position },
            MapEvent::MouseOver { layer: layer.clone(), handle },
        ] {
            assert_eq!(command_for(&rule, &event), None);
        }
    }

    #[test]
    fn drag_end_commits_depot_positions() {
        let rule = LayerFactory.rule(&LayerName::DepotPoints);
        let position = Point::new(5.0, 6.0);
        let event = MapEvent::DragEnd { layer: LayerName::DepotPoints, handle: FeatureHandle(1), position };
        assert!(matches!(
            command_for(&rule, &event),
            Some(LayerCommand::RepositionDepot { commit: true, .. }),
        ));
    }
}
