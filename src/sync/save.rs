use std::collections::HashSet;

use anyhow::{Context, Result};

use crate::api::GeojsonFile;
use crate::layer::LayerName;
use crate::registry::LayerRegistry;

/// Serialize the requested layers for the save mutation.
/// Names that are not registered or hold no features are left out; repeated names are sent once.
pub fn geojson_files(registry: &LayerRegistry, layers: &[LayerName]) -> Result<Vec<GeojsonFile>> {
    let exports = registry.export_all();
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for name in layers {
        if !seen.insert(name) { continue; }
        let Some(collection) = exports.get(name).filter(|c| !c.is_empty()) else { continue; };
        files.push(GeojsonFile {
            name: name.to_string(),
            geojson: collection.to_geojson_string()
                .with_context(|| format!("Failed to serialize layer {name}"))?,
        });
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{parse_features, Feature};
    use crate::map::SurfaceLog;
    use geo::Point;

    #[test]
    fn only_requested_non_empty_layers_are_serialized() {
        let mut registry = LayerRegistry::initialize(&mut SurfaceLog::default());
        registry.get_mut(&LayerName::DepotPoints).unwrap()
            .add_feature(Feature::point("d1", Point::new(1.0, 2.0)));
        registry.get_mut(&LayerName::Targets).unwrap()
            .add_feature(Feature::point("t1", Point::new(1.0, 2.0)));

        let files = geojson_files(&registry, &[
            LayerName::DepotPoints,
            LayerName::ApprovedTargets, // empty
            LayerName::parse("ghost"),  // unregistered
            LayerName::DepotPoints,     // repeated
            LayerName::Other("depot_points".into()), // repeated, spelled out
        ]).unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "depot_points");
        let features = parse_features(&files[0].geojson).unwrap();
        assert_eq!(features, vec![Feature::point("d1", Point::new(1.0, 2.0))]);
    }
}
