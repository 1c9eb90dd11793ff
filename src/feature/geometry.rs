use anyhow::{anyhow, Result};
use geo::Point;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// GeoJSON geometry type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryKind {
    /// Point-like geometries are rendered through a layer's point rule, the rest through its path style.
    #[inline] pub fn is_point(&self) -> bool { matches!(self, Self::Point | Self::MultiPoint) }
}

/// A GeoJSON geometry. Coordinates are kept as raw JSON so any geometry round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: GeometryKind,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub coordinates: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometries: Option<Vec<Geometry>>,
}

impl Geometry {
    /// Build a `Point` geometry from a (lon, lat) position.
    pub fn from_point(point: Point<f64>) -> Self {
        Self {
            kind: GeometryKind::Point,
            coordinates: json!([point.x(), point.y()]),
            geometries: None,
        }
    }

    /// Position of a `Point` geometry as (lon, lat), `None` for every other kind.
    pub fn point(&self) -> Option<Point<f64>> {
        if self.kind != GeometryKind::Point { return None; }
        parse_position(&self.coordinates).ok()
    }

    /// Overwrite the position of a `Point` geometry, keeping any extra ordinates (altitude).
    pub fn set_point(&mut self, point: Point<f64>) -> Result<()> {
        if self.kind != GeometryKind::Point {
            return Err(anyhow!("Cannot set a position on a {:?} geometry", self.kind));
        }
        match self.coordinates.as_array_mut() {
            Some(coords) if coords.len() >= 2 => {
                coords[0] = json!(point.x());
                coords[1] = json!(point.y());
            }
            _ => self.coordinates = json!([point.x(), point.y()]),
        }
        Ok(())
    }
}

/// Parse a GeoJSON position `[x, y, ...]`.
fn parse_position(value: &Value) -> Result<Point<f64>> {
    let coords = value.as_array()
        .ok_or_else(|| anyhow!("Invalid position: expected an array"))?;
    if coords.len() < 2 {
        return Err(anyhow!("Invalid position: expected at least two ordinates, got {}", coords.len()));
    }
    let x = coords[0].as_f64()
        .ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
    let y = coords[1].as_f64()
        .ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;
    Ok(Point::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_accessors_read_and_write_lon_lat() {
        let mut geom = Geometry::from_point(Point::new(1.0, 2.0));
        assert_eq!(geom.point(), Some(Point::new(1.0, 2.0)));

        geom.set_point(Point::new(-3.5, 4.25)).unwrap();
        assert_eq!(geom.coordinates, json!([-3.5, 4.25]));
    }

    #[test]
    fn set_point_keeps_altitude() {
        let mut geom: Geometry = serde_json::from_value(json!({
            "type": "Point", "coordinates": [1.0, 2.0, 30.0]
        })).unwrap();
        geom.set_point(Point::new(5.0, 6.0)).unwrap();
        assert_eq!(geom.coordinates, json!([5.0, 6.0, 30.0]));
    }

    #[test]
    fn non_point_geometries_have_no_position() {
        let mut line: Geometry = serde_json::from_value(json!({
            "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]
        })).unwrap();
        assert_eq!(line.point(), None);
        assert!(line.set_point(Point::new(0.0, 0.0)).is_err());
        assert!(!line.kind.is_point());
    }
}
