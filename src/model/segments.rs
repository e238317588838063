//! Unit and batched street segments

use geo::Point;
use serde::{Deserialize, Serialize};

/// Atomic directed edge between two consecutive vertices of a street
/// polyline. Created once during decomposition, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSegment {
    pub start: Point<f64>,
    pub end: Point<f64>,
    /// Forward azimuth start→end in degrees `[0, 360)`
    pub bearing: f64,
    pub way_id: i64,
    /// Position within the parent polyline
    pub segment_index: usize,
    pub road_type: Option<String>,
}

/// A merged run of similar-bearing unit segments treated as one straight
/// street section. This is the unit the scorer and search operate on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepresentativeSegment {
    /// Start of the first constituent
    pub start: Point<f64>,
    /// End of the last constituent
    pub end: Point<f64>,
    /// Length-weighted mean of constituent bearings, degrees `[0, 360)`
    pub bearing: f64,
    pub way_id: i64,
    pub road_type: Option<String>,
    /// Number of merged unit segments
    pub segment_count: usize,
    /// Great-circle chord from `start` to `end` in meters. Deliberately
    /// not the sum of constituent lengths: a curved batch that drifts
    /// sideways scores a shorter chord and gets filtered sooner.
    pub total_length: f64,
    /// Original unit-segment indices within the parent polyline
    pub constituents: Vec<usize>,
}

/// A representative segment enriched with its alignment against one sun
/// azimuth. Built as a new record rather than mutating the segment, so
/// the same batched geometry can be scored against many azimuths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredSegment {
    pub segment: RepresentativeSegment,
    /// Alignment in `[0, 1]`; 1 = parallel/antiparallel to the sun
    pub alignment_score: f64,
    /// The azimuth this segment was scored against, degrees
    pub sun_azimuth: f64,
}
