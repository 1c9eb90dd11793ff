use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Feature;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionTag {
    #[default]
    FeatureCollection,
}

/// A GeoJSON FeatureCollection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default)]
    pub tag: CollectionTag,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { tag: CollectionTag::FeatureCollection, features }
    }

    #[inline] pub fn len(&self) -> usize { self.features.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }

    /// Serialize to GeoJSON text.
    pub fn to_geojson_string(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize FeatureCollection to GeoJSON")
    }

    /// Ids of all features that carry one, in layer order.
    pub fn feature_ids(&self) -> Vec<String> {
        self.features.iter().filter_map(Feature::feature_id).collect()
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Parse GeoJSON text into a list of features.
/// Accepts a FeatureCollection, a single Feature, a JSON array of Features, or `null` (no features).
pub fn parse_features(text: &str) -> Result<Vec<Feature>> {
    let value: Value = serde_json::from_str(text).context("Failed to parse GeoJSON text")?;
    features_from_value(value)
}

fn features_from_value(value: Value) -> Result<Vec<Feature>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items.into_iter()
            .enumerate()
            .map(|(i, item)| serde_json::from_value(item)
                .with_context(|| format!("Invalid feature at index {i}")))
            .collect(),
        Value::Object(obj) => {
            let ty = obj.get("type").and_then(Value::as_str).map(str::to_owned);
            let value = Value::Object(obj);
            match ty.as_deref() {
                Some("FeatureCollection") => {
                    let collection: FeatureCollection = serde_json::from_value(value)
                        .context("Invalid FeatureCollection")?;
                    Ok(collection.features)
                }
                Some("Feature") => Ok(vec![serde_json::from_value(value).context("Invalid Feature")?]),
                Some(other) => bail!("Unsupported GeoJSON object type: {other}"),
                None => Err(anyhow!("GeoJSON object is missing its \"type\" member")),
            }
        }
        other => bail!("Expected a GeoJSON object or array, got {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_TARGETS: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"id":"t1"},"geometry":{"type":"Point","coordinates":[1,2]}},
        {"type":"Feature","properties":{"id":"t2"},"geometry":{"type":"Point","coordinates":[3,4]}}
    ]}"#;

    #[test]
    fn parses_collections_single_features_and_arrays() {
        assert_eq!(parse_features(TWO_TARGETS).unwrap().len(), 2);

        let single = r#"{"type":"Feature","properties":{"id":"d1"},"geometry":{"type":"Point","coordinates":[0,0]}}"#;
        assert_eq!(parse_features(single).unwrap()[0].feature_id().as_deref(), Some("d1"));

        let array = format!("[{single},{single}]");
        assert_eq!(parse_features(&array).unwrap().len(), 2);

        assert!(parse_features("null").unwrap().is_empty());
    }

    #[test]
    fn rejects_bare_geometries_and_garbage() {
        assert!(parse_features(r#"{"type":"Point","coordinates":[0,0]}"#).is_err());
        assert!(parse_features(r#"{"features":[]}"#).is_err());
        assert!(parse_features("42").is_err());
        assert!(parse_features("{not json").is_err());
    }

    #[test]
    fn serialized_collection_parses_back_to_the_same_features() {
        let features = parse_features(TWO_TARGETS).unwrap();
        let text = FeatureCollection::new(features.clone()).to_geojson_string().unwrap();
        assert_eq!(parse_features(&text).unwrap(), features);
    }
}
