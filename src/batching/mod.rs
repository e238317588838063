//! Segment batcher: merges runs of similar-bearing unit segments into
//! straight street sections.
//!
//! Each way is decomposed into unit segments, then grown into batches
//! around unclaimed seed segments. Growth compares every candidate
//! against the seed's bearing rather than a running average, so a road
//! curving slowly step-by-step cannot creep past the tolerance; the
//! cumulative drift cap is the actual curvature guard. Forward and
//! backward drift are tracked independently, each starting at zero at
//! the seed.

use hashbrown::HashSet;
use log::warn;

use crate::cache::LruCache;
use crate::geometry::{bearing, bearing_difference, distance, signed_bearing_offset};
use crate::loading::AlignmentConfig;
use crate::model::{RepresentativeSegment, StreetWay, UnitSegment};

/// Decomposes a way into unit segments between consecutive vertices.
///
/// A way with fewer than two vertices yields no segments; this is not
/// an error, just noted and skipped.
pub fn decompose_way(way: &StreetWay) -> Vec<UnitSegment> {
    let points: Vec<_> = way.geometry.points().collect();
    if points.len() < 2 {
        warn!("Way {} has fewer than 2 vertices, skipping", way.id);
        return Vec::new();
    }

    points
        .windows(2)
        .enumerate()
        .map(|(index, pair)| UnitSegment {
            start: pair[0],
            end: pair[1],
            bearing: bearing(pair[0], pair[1]),
            way_id: way.id,
            segment_index: index,
            road_type: way.road_type.clone(),
        })
        .collect()
}

/// Batches unit segments into representative segments, caching results
/// per way so repeated passes over the same geometry skip the work.
pub struct SegmentBatcher {
    bearing_tolerance: f64,
    min_batch_length: f64,
    max_bearing_drift: f64,
    require_batching: bool,
    cache: LruCache<Vec<RepresentativeSegment>>,
}

impl SegmentBatcher {
    pub fn new(config: &AlignmentConfig) -> Self {
        Self {
            bearing_tolerance: config.bearing_tolerance,
            min_batch_length: config.min_batch_length,
            max_bearing_drift: config.max_bearing_drift,
            require_batching: config.require_batching,
            cache: LruCache::new(config.batch_cache_size),
        }
    }

    /// Batches every way in order, concatenating the per-way results.
    pub fn batch_ways(&mut self, ways: &[StreetWay]) -> Vec<RepresentativeSegment> {
        let mut out = Vec::new();
        for way in ways {
            out.extend(self.batch_way(way));
        }
        out
    }

    /// Batches a single way, consulting the per-way cache first.
    pub fn batch_way(&mut self, way: &StreetWay) -> Vec<RepresentativeSegment> {
        let key = self.way_cache_key(way.id);
        if let Some(cached) = self.cache.get(&key) {
            return cached.clone();
        }

        let segments = decompose_way(way);
        let batched = self.batch_segments(&segments);
        self.cache.insert(key, batched.clone());
        batched
    }

    /// Core merge pass over the ordered unit segments of one polyline.
    pub fn batch_segments(&self, segments: &[UnitSegment]) -> Vec<RepresentativeSegment> {
        let mut claimed: HashSet<(i64, usize)> = HashSet::new();
        let mut out = Vec::new();

        for (i, seed) in segments.iter().enumerate() {
            if claimed.contains(&(seed.way_id, seed.segment_index)) {
                continue;
            }

            let mut first = i;
            let mut last = i;

            // Grow forward from the seed
            let mut drift = 0.0;
            for (j, candidate) in segments.iter().enumerate().skip(i + 1) {
                if claimed.contains(&(candidate.way_id, candidate.segment_index)) {
                    break;
                }
                let diff = bearing_difference(seed.bearing, candidate.bearing);
                if diff > self.bearing_tolerance || drift + diff > self.max_bearing_drift {
                    break;
                }
                drift += diff;
                last = j;
            }

            // Grow backward, with its own drift counter
            let mut drift = 0.0;
            for j in (0..i).rev() {
                let candidate = &segments[j];
                if claimed.contains(&(candidate.way_id, candidate.segment_index)) {
                    break;
                }
                let diff = bearing_difference(seed.bearing, candidate.bearing);
                if diff > self.bearing_tolerance || drift + diff > self.max_bearing_drift {
                    break;
                }
                drift += diff;
                first = j;
            }

            let parts = &segments[first..=last];
            for part in parts {
                claimed.insert((part.way_id, part.segment_index));
            }

            if let Some(segment) = self.representative(seed, parts) {
                out.push(segment);
            }
        }

        out
    }

    /// Builds the representative segment for one batch, applying the
    /// emission filters. Claimed indices stay claimed even when the
    /// batch is filtered out.
    fn representative(
        &self,
        seed: &UnitSegment,
        parts: &[UnitSegment],
    ) -> Option<RepresentativeSegment> {
        let segment_count = parts.len();
        if segment_count < 2 && self.require_batching {
            return None;
        }

        // Length-weighted mean bearing, unwrapped about the seed so the
        // 0/360 seam cannot skew the average
        let mut weighted_offset = 0.0;
        let mut total_weight = 0.0;
        for part in parts {
            let weight = distance(part.start, part.end);
            weighted_offset += weight * signed_bearing_offset(seed.bearing, part.bearing);
            total_weight += weight;
        }
        let mean_bearing = if total_weight > 0.0 {
            (seed.bearing + weighted_offset / total_weight).rem_euclid(360.0)
        } else {
            seed.bearing
        };

        let start = parts[0].start;
        let end = parts[segment_count - 1].end;
        let total_length = distance(start, end);
        if total_length < self.min_batch_length {
            return None;
        }

        Some(RepresentativeSegment {
            start,
            end,
            bearing: mean_bearing,
            way_id: seed.way_id,
            road_type: seed.road_type.clone(),
            segment_count,
            total_length,
            constituents: parts.iter().map(|p| p.segment_index).collect(),
        })
    }

    fn way_cache_key(&self, way_id: i64) -> String {
        format!(
            "{way_id}_{:.1}_{:.1}_{:.1}_{}",
            self.bearing_tolerance, self.min_batch_length, self.max_bearing_drift,
            self.require_batching
        )
    }
}
