//! Input street geometry as delivered by an external source

use geo::LineString;
use serde::{Deserialize, Serialize};

/// One source street polyline, already parsed by the acquiring side.
///
/// Coordinates follow the geo convention: x is longitude, y is latitude.
/// A way with fewer than two vertices contributes no segments and is
/// skipped during decomposition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreetWay {
    /// Source identifier (OSM way id or equivalent)
    pub id: i64,
    /// Ordered vertices of the street centerline
    pub geometry: LineString<f64>,
    /// Road category tag, e.g. "primary" or "footway"
    pub road_type: Option<String>,
}

/// Geographic bounding box for street queries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Deterministic cache key: the four coordinates rounded to four
    /// decimal places (roughly 11 m resolution), comma-joined.
    pub fn cache_key(&self) -> String {
        format!(
            "{:.4},{:.4},{:.4},{:.4}",
            self.south, self.west, self.north, self.east
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_is_deterministic_and_rounded() {
        let bounds = BoundingBox {
            south: 51.50001,
            west: -0.13004,
            north: 51.52,
            east: -0.11,
        };
        assert_eq!(bounds.cache_key(), "51.5000,-0.1300,51.5200,-0.1100");
        // Sub-resolution jitter maps to the same key
        let jittered = BoundingBox {
            south: 51.50003,
            ..bounds
        };
        assert_eq!(jittered.cache_key(), bounds.cache_key());
    }
}
