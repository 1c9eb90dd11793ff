use std::{cmp::Ordering, fmt, hash::{Hash, Hasher}, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Logical key of a map overlay.
/// The vocabulary is open: names outside the known set are kept verbatim as `Other`.
/// Equality, ordering and hashing go by the wire name, so `Other("targets")` and
/// `Targets` are the same key.
#[derive(Debug, Clone)]
pub enum LayerName {
    RegionContour,   // Work-region outline
    Targets,         // Raw detections
    ApprovedTargets,
    RemovedTargets,
    VoronoiCells,    // Tessellation cells
    DepotPoints,
    MicroRoutes,
    Default,         // Catch-all overlay created at initialization
    Other(String),
}

impl LayerName {
    /// Every name with a dedicated factory rule, in initialization order.
    pub const KNOWN: [LayerName; 8] = [
        LayerName::RegionContour,
        LayerName::Targets,
        LayerName::ApprovedTargets,
        LayerName::RemovedTargets,
        LayerName::VoronoiCells,
        LayerName::DepotPoints,
        LayerName::MicroRoutes,
        LayerName::Default,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            LayerName::RegionContour => "region_contour",
            LayerName::Targets => "targets",
            LayerName::ApprovedTargets => "approved_targets",
            LayerName::RemovedTargets => "removed_targets",
            LayerName::VoronoiCells => "voronoi_cells",
            LayerName::DepotPoints => "depot_points",
            LayerName::MicroRoutes => "micro_routes",
            LayerName::Default => "default",
            LayerName::Other(name) => name,
        }
    }

    /// Map a wire name onto the vocabulary. Never fails.
    pub fn parse(name: &str) -> Self {
        match name {
            "region_contour" => LayerName::RegionContour,
            "targets" => LayerName::Targets,
            "approved_targets" => LayerName::ApprovedTargets,
            "removed_targets" => LayerName::RemovedTargets,
            "voronoi_cells" => LayerName::VoronoiCells,
            "depot_points" => LayerName::DepotPoints,
            "micro_routes" => LayerName::MicroRoutes,
            "default" => LayerName::Default,
            other => LayerName::Other(other.to_string()),
        }
    }

    #[inline] pub fn is_known(&self) -> bool { !matches!(self.canonical(), LayerName::Other(_)) }

    /// The known variant when an `Other` carries a known wire name; otherwise `self`.
    pub fn canonical(&self) -> LayerName {
        match self {
            LayerName::Other(name) => LayerName::parse(name),
            known => known.clone(),
        }
    }
}

impl PartialEq for LayerName {
    fn eq(&self, other: &Self) -> bool { self.as_str() == other.as_str() }
}

impl Eq for LayerName {}

impl PartialOrd for LayerName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for LayerName {
    fn cmp(&self, other: &Self) -> Ordering { self.as_str().cmp(other.as_str()) }
}

impl Hash for LayerName {
    fn hash<H: Hasher>(&self, state: &mut H) { self.as_str().hash(state) }
}

impl fmt::Display for LayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for LayerName {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(Self::parse(s)) }
}

impl From<&str> for LayerName {
    fn from(name: &str) -> Self { Self::parse(name) }
}

impl Serialize for LayerName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LayerName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::parse(&name))
    }
}
