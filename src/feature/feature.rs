use geo::Point;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::Geometry;

/// The only value GeoJSON allows in a Feature's `type` member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureTag {
    #[default]
    Feature,
}

/// A single GeoJSON Feature: geometry plus a property bag.
/// Identity is `properties.id`; uniqueness inside a layer is assumed, not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default)]
    pub tag: FeatureTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Map<String, Value>,
    /// Foreign members (e.g. `bbox`), carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: Option<Geometry>, properties: Map<String, Value>) -> Self {
        Self { tag: FeatureTag::Feature, id: None, geometry, properties, extra: Map::new() }
    }

    /// Point feature with the given `properties.id`.
    pub fn point(id: &str, point: Point<f64>) -> Self {
        let mut properties = Map::new();
        properties.insert("id".to_string(), Value::from(id));
        Self::new(Some(Geometry::from_point(point)), properties)
    }

    /// `properties.id` rendered as text. Numeric ids are accepted as well as strings.
    pub fn feature_id(&self) -> Option<String> {
        match self.properties.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    #[inline] pub fn property(&self, key: &str) -> Option<&Value> { self.properties.get(key) }

    /// Position of a point feature as (lon, lat).
    pub fn position(&self) -> Option<Point<f64>> {
        self.geometry.as_ref().and_then(|g| g.point())
    }

    #[inline] pub fn is_point(&self) -> bool {
        self.geometry.as_ref().is_some_and(|g| g.kind.is_point())
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Map<String, Value>, D::Error> {
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_properties_read_as_empty() {
        let feature: Feature = serde_json::from_value(json!({
            "type": "Feature",
            "geometry": null,
            "properties": null,
        })).unwrap();
        assert!(feature.properties.is_empty());
        assert!(feature.geometry.is_none());
        assert_eq!(feature.feature_id(), None);
    }

    #[test]
    fn foreign_members_survive_a_round_trip() {
        let input = json!({
            "type": "Feature",
            "id": 7,
            "bbox": [0.0, 0.0, 1.0, 1.0],
            "geometry": { "type": "Point", "coordinates": [1.0, 2.0] },
            "properties": { "id": "t1", "score": 0.9 },
        });
        let feature: Feature = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(feature.feature_id().as_deref(), Some("t1"));
        assert_eq!(feature.extra.get("bbox"), Some(&json!([0.0, 0.0, 1.0, 1.0])));
        assert_eq!(serde_json::to_value(&feature).unwrap(), input);
    }

    #[test]
    fn numeric_ids_are_rendered_as_text() {
        let feature: Feature = serde_json::from_value(json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [1.0, 2.0] },
            "properties": { "id": 42 },
        })).unwrap();
        assert_eq!(feature.feature_id().as_deref(), Some("42"));
    }

    #[test]
    fn wrong_type_tag_is_rejected() {
        let parsed = serde_json::from_value::<Feature>(json!({
            "type": "FeatureCollection",
            "features": [],
        }));
        assert!(parsed.is_err());
    }
}
