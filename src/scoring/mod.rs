//! Alignment scorer: applies the geometry kernel's alignment function
//! across batched segments for one sun azimuth, with memoized results.

use std::collections::HashMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::cache::LruCache;
use crate::geometry::alignment_score;
use crate::loading::AlignmentConfig;
use crate::model::{RepresentativeSegment, ScoredSegment};

/// Score bands used by the grouping helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreBand {
    /// `>= 0.9`
    Excellent,
    /// `0.6..0.9`
    Good,
    /// `0.3..0.6`
    Fair,
    /// `< 0.3`
    Poor,
}

impl ScoreBand {
    pub fn of(score: f64) -> Self {
        if score >= 0.9 {
            Self::Excellent
        } else if score >= 0.6 {
            Self::Good
        } else if score >= 0.3 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

/// Aggregate view over a scored segment set. Zeroed for empty input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignmentStats {
    pub total: usize,
    pub average_score: f64,
    /// Segments scoring `>= 0.9`
    pub excellent: usize,
    /// Segments scoring `0.6..0.9`
    pub good: usize,
    /// Segments scoring `< 0.3`
    pub poor: usize,
    pub excellent_pct: f64,
    pub good_pct: f64,
    pub poor_pct: f64,
}

/// Scores representative segments against a sun azimuth, memoizing by
/// (azimuth, bearing) rounded to one decimal place.
pub struct AlignmentScorer {
    cache: LruCache<f64>,
}

impl AlignmentScorer {
    pub fn new(config: &AlignmentConfig) -> Self {
        Self {
            cache: LruCache::new(config.score_cache_size),
        }
    }

    /// Pure enrichment: returns a new scored record per input segment,
    /// leaving the batched geometry untouched.
    pub fn score(
        &mut self,
        segments: &[RepresentativeSegment],
        sun_azimuth: f64,
    ) -> Vec<ScoredSegment> {
        segments
            .iter()
            .map(|segment| ScoredSegment {
                segment: segment.clone(),
                alignment_score: self.score_bearing(segment.bearing, sun_azimuth),
                sun_azimuth,
            })
            .collect()
    }

    fn score_bearing(&mut self, street_bearing: f64, sun_azimuth: f64) -> f64 {
        let key = format!("{sun_azimuth:.1}_{street_bearing:.1}");
        if let Some(&cached) = self.cache.get(&key) {
            return cached;
        }
        let score = alignment_score(street_bearing, sun_azimuth);
        self.cache.insert(key, score);
        score
    }
}

/// Aggregates scored segments into band counts and percentages.
pub fn stats(scored: &[ScoredSegment]) -> AlignmentStats {
    if scored.is_empty() {
        return AlignmentStats::default();
    }

    let total = scored.len();
    let sum: f64 = scored.iter().map(|s| s.alignment_score).sum();
    let excellent = scored.iter().filter(|s| s.alignment_score >= 0.9).count();
    let good = scored
        .iter()
        .filter(|s| s.alignment_score >= 0.6 && s.alignment_score < 0.9)
        .count();
    let poor = scored.iter().filter(|s| s.alignment_score < 0.3).count();

    let pct = |n: usize| (n as f64 / total as f64) * 100.0;
    AlignmentStats {
        total,
        average_score: sum / total as f64,
        excellent,
        good,
        poor,
        excellent_pct: pct(excellent),
        good_pct: pct(good),
        poor_pct: pct(poor),
    }
}

/// Non-mutating view: segments scoring at least `min_score`.
pub fn filter_by_min_score(scored: &[ScoredSegment], min_score: f64) -> Vec<&ScoredSegment> {
    scored
        .iter()
        .filter(|s| s.alignment_score >= min_score)
        .collect()
}

/// Non-mutating view: segments falling in `band`.
pub fn in_band(scored: &[ScoredSegment], band: ScoreBand) -> Vec<&ScoredSegment> {
    scored
        .iter()
        .filter(|s| ScoreBand::of(s.alignment_score) == band)
        .collect()
}

/// Non-mutating view: all segments grouped by score band.
pub fn group_by_band(scored: &[ScoredSegment]) -> HashMap<ScoreBand, Vec<&ScoredSegment>> {
    scored
        .iter()
        .map(|s| (ScoreBand::of(s.alignment_score), s))
        .into_group_map()
}
