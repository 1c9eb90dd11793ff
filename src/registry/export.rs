use std::collections::BTreeMap;

use crate::feature::FeatureCollection;
use crate::layer::LayerName;
use super::LayerRegistry;

impl LayerRegistry {
    /// Current contents of every overlay, keyed by layer name.
    /// Composite entries contribute only their feature-bearing sub-object, so depot radius circles never appear.
    pub fn export_all(&self) -> BTreeMap<LayerName, FeatureCollection> {
        self.overlays()
            .map(|overlay| (overlay.name().clone(), overlay.to_feature_collection()))
            .collect()
    }

    /// Current contents of one overlay.
    pub fn export_layer(&self, name: &LayerName) -> Option<FeatureCollection> {
        self.get(name).map(|overlay| overlay.to_feature_collection())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::parse_features;
    use crate::layer::SubObject;
    use crate::map::SurfaceLog;

    const CELLS: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"id":"c1","area":4.5},
         "geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}},
        {"type":"Feature","properties":{"id":"c2","area":2.0},
         "geometry":{"type":"Polygon","coordinates":[[[1,1],[2,1],[2,2],[1,1]]]}}
    ]}"#;

    const DEPOTS: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"id":"d1","depot_radius":225},
         "geometry":{"type":"Point","coordinates":[10,20]}}
    ]}"#;

    #[test]
    fn export_covers_every_registered_layer() {
        let registry = LayerRegistry::initialize(&mut SurfaceLog::default());
        let exported = registry.export_all();
        assert_eq!(exported.len(), LayerName::KNOWN.len());
        assert!(exported.values().all(FeatureCollection::is_empty));
    }

    #[test]
    fn apply_then_export_round_trips_plain_layers() {
        let mut registry = LayerRegistry::initialize(&mut SurfaceLog::default());
        registry.apply(&LayerName::VoronoiCells, CELLS).unwrap();

        let exported = registry.export_all().remove(&LayerName::VoronoiCells).unwrap();
        let text = exported.to_geojson_string().unwrap();
        assert_eq!(parse_features(&text).unwrap(), parse_features(CELLS).unwrap());
    }

    #[test]
    fn depot_export_keeps_only_the_marker() {
        let mut registry = LayerRegistry::initialize(&mut SurfaceLog::default());
        registry.apply(&LayerName::DepotPoints, DEPOTS).unwrap();

        let overlay = registry.get(&LayerName::DepotPoints).unwrap();
        let parts = overlay.entries()[0].sub_objects();
        assert!(parts.iter().any(|p| matches!(p, SubObject::Circle(c) if c.radius_m == 225.0)));

        let exported = registry.export_layer(&LayerName::DepotPoints).unwrap();
        assert_eq!(exported.len(), 1);
        assert_eq!(exported.features[0], parse_features(DEPOTS).unwrap()[0]);
    }
}
