mod collection;
mod feature;
mod geometry;

pub use collection::{parse_features, CollectionTag, FeatureCollection};
pub use feature::{Feature, FeatureTag};
pub use geometry::{Geometry, GeometryKind};
