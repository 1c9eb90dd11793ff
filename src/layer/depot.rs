use anyhow::{anyhow, Result};
use geo::Point;

use crate::feature::Feature;
use super::depot_radius;

/// Presentation-only radius circle of a depot. Never exported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayCircle {
    pub center: Point<f64>,
    pub radius_m: f64,
}

/// One visual part of a rendered entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SubObject<'a> {
    /// Feature-bearing marker (or the plain rendering of a non-composite feature).
    Marker { feature: &'a Feature, position: Option<Point<f64>> },
    Circle(DisplayCircle),
}

impl<'a> SubObject<'a> {
    /// The feature carried by this sub-object, if any.
    pub fn feature(&self) -> Option<&'a Feature> {
        match *self {
            SubObject::Marker { feature, .. } => Some(feature),
            SubObject::Circle(_) => None,
        }
    }
}

/// A depot rendered as a draggable marker plus a radius circle.
/// Only the marker holds feature data; the circle is derived from the marker on every read.
#[derive(Debug, Clone, PartialEq)]
pub struct DepotEntry {
    data_marker: Feature,
    drag_position: Option<Point<f64>>, // set while a drag is in flight
}

impl DepotEntry {
    pub fn new(data_marker: Feature) -> Self {
        Self { data_marker, drag_position: None }
    }

    #[inline] pub fn feature(&self) -> &Feature { &self.data_marker }

    pub fn into_feature(self) -> Feature { self.data_marker }

    /// Where the marker is drawn: the in-flight drag position, else the feature's coordinates.
    pub fn marker_position(&self) -> Option<Point<f64>> {
        self.drag_position.or_else(|| self.data_marker.position())
    }

    pub fn display_circle(&self) -> Option<DisplayCircle> {
        self.marker_position().map(|center| DisplayCircle {
            center,
            radius_m: depot_radius(&self.data_marker),
        })
    }

    #[inline] pub fn is_dragging(&self) -> bool { self.drag_position.is_some() }

    /// Move the marker without touching the feature.
    pub fn drag_to(&mut self, position: Point<f64>) {
        self.drag_position = Some(position);
    }

    /// Finish a drag: write the position into the feature's coordinates.
    pub fn commit(&mut self, position: Point<f64>) -> Result<()> {
        let geometry = self.data_marker.geometry.as_mut()
            .ok_or_else(|| anyhow!("Depot feature has no geometry to move"))?;
        geometry.set_point(position)?;
        self.drag_position = None;
        Ok(())
    }

    /// Marker first, then the circle (if the depot has a position).
    pub fn sub_objects(&self) -> Vec<SubObject<'_>> {
        let mut parts = vec![SubObject::Marker {
            feature: &self.data_marker,
            position: self.marker_position(),
        }];
        parts.extend(self.display_circle().map(SubObject::Circle));
        parts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn depot(radius: Option<f64>) -> DepotEntry {
        let mut feature = Feature::point("d1", Point::new(10.0, 20.0));
        if let Some(r) = radius {
            feature.properties.insert("depot_radius".into(), json!(r));
        }
        DepotEntry::new(feature)
    }

    #[test]
    fn circle_follows_marker_during_drag() {
        let mut entry = depot(Some(225.0));
        entry.drag_to(Point::new(11.0, 21.0));

        let circle = entry.display_circle().unwrap();
        assert_eq!(circle.center, Point::new(11.0, 21.0));
        assert_eq!(circle.radius_m, 225.0);
        // Feature is untouched until the drag ends.
        assert_eq!(entry.feature().position(), Some(Point::new(10.0, 20.0)));
    }

    #[test]
    fn commit_writes_coordinates_into_feature() {
        let mut entry = depot(None);
        entry.drag_to(Point::new(11.0, 21.0));
        entry.commit(Point::new(12.0, 22.0)).unwrap();

        assert!(!entry.is_dragging());
        assert_eq!(entry.feature().position(), Some(Point::new(12.0, 22.0)));
        assert_eq!(entry.display_circle().unwrap().center, Point::new(12.0, 22.0));
        assert_eq!(entry.display_circle().unwrap().radius_m, 500.0);
    }

    #[test]
    fn only_the_marker_carries_a_feature() {
        let entry = depot(None);
        let parts = entry.sub_objects();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts.iter().filter(|p| p.feature().is_some()).count(), 1);
        assert!(matches!(parts[1], SubObject::Circle(_)));
    }
}
