//! Optimal-day search: scans a year of sunrise/sunset azimuths for a
//! fixed street bearing and extracts the locally-maximal alignment
//! days.
//!
//! The scan runs synchronously; hosts that need to stay responsive
//! pass a progress callback and get control back through it every
//! `progress_interval` days instead of relying on timer scheduling.

use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::cache::LruCache;
use crate::geometry::alignment_score;
use crate::loading::AlignmentConfig;
use crate::solar::{SunAzimuthProvider, SunEvent};

/// Standard Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// One sun event's alignment on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayAlignment {
    pub event: SunEvent,
    pub sun_azimuth: f64,
    pub alignment_score: f64,
}

/// All successfully computed alignments for one calendar day, plus the
/// better of the two. Days where every event failed are never recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayResult {
    pub date: NaiveDate,
    pub day_of_year: u32,
    pub alignments: Vec<DayAlignment>,
    pub best: DayAlignment,
}

/// Histogram of best-of-day scores across the scanned year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreHistogram {
    /// `>= 0.9`
    pub excellent: usize,
    /// `0.7..0.9`
    pub good: usize,
    /// `0.5..0.7`
    pub fair: usize,
    /// `< 0.5`
    pub poor: usize,
}

impl ScoreHistogram {
    fn record(&mut self, score: f64) {
        if score >= 0.9 {
            self.excellent += 1;
        } else if score >= 0.7 {
            self.good += 1;
        } else if score >= 0.5 {
            self.fair += 1;
        } else {
            self.poor += 1;
        }
    }
}

/// Query parameters for one year scan.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySearchParams {
    /// Fixed street bearing in degrees `[0, 360)`
    pub street_bearing: f64,
    pub lat: f64,
    pub lon: f64,
    pub year: i32,
    pub include_sunrise: bool,
    pub include_sunset: bool,
}

impl DaySearchParams {
    /// Deterministic cache key: bearing, rounded location, year and the
    /// event inclusion flags, underscore-joined.
    fn cache_key(&self) -> String {
        format!(
            "{:.1}_{:.4}_{:.4}_{}_{}_{}",
            self.street_bearing,
            self.lat,
            self.lon,
            self.year,
            self.include_sunrise,
            self.include_sunset
        )
    }
}

/// Ranked result of one year scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySearchOutcome {
    /// Highest-scoring local maximum, `None` when no day produced data
    pub best_day: Option<DayResult>,
    /// Up to five local maxima, descending by score
    pub top_days: Vec<DayResult>,
    /// Full count of local maxima found (may exceed `top_days.len()`)
    pub total_local_maxima: usize,
    /// Mean best-of-day score across all collected days
    pub average_alignment: f64,
    pub histogram: ScoreHistogram,
    /// Days that produced at least one alignment
    pub days_collected: usize,
}

/// Year scanner. Owns its result cache; construct one per provider.
pub struct OptimalDaySearch<P> {
    provider: P,
    cache: LruCache<DaySearchOutcome>,
    progress_interval: u32,
}

impl<P: SunAzimuthProvider> OptimalDaySearch<P> {
    pub fn new(provider: P, config: &AlignmentConfig) -> Self {
        Self {
            provider,
            cache: LruCache::new(config.day_cache_size),
            progress_interval: config.progress_interval.max(1),
        }
    }

    /// Runs the scan, returning a cached outcome for repeat queries
    /// with identical parameters.
    pub fn run(&mut self, params: &DaySearchParams) -> DaySearchOutcome {
        self.run_with_progress(params, |_| {})
    }

    /// Like [`run`](Self::run), reporting percent complete to
    /// `progress` every `progress_interval` processed days.
    pub fn run_with_progress(
        &mut self,
        params: &DaySearchParams,
        mut progress: impl FnMut(f64),
    ) -> DaySearchOutcome {
        let key = params.cache_key();
        if let Some(cached) = self.cache.get(&key) {
            debug!("Day-search cache hit for {key}");
            return cached.clone();
        }

        let days = self.collect_days(params, &mut progress);
        let outcome = rank_days(days);
        self.cache.insert(key, outcome.clone());
        outcome
    }

    fn collect_days(
        &mut self,
        params: &DaySearchParams,
        progress: &mut impl FnMut(f64),
    ) -> Vec<DayResult> {
        if !params.include_sunrise && !params.include_sunset {
            warn!("Day search with no sun events enabled yields nothing");
            return Vec::new();
        }

        let total_days = days_in_year(params.year);
        let mut results = Vec::with_capacity(total_days as usize);

        for day_of_year in 1..=total_days {
            let Some(date) = NaiveDate::from_yo_opt(params.year, day_of_year) else {
                continue;
            };

            let mut alignments = Vec::with_capacity(2);
            let events = [
                (params.include_sunrise, SunEvent::Sunrise),
                (params.include_sunset, SunEvent::Sunset),
            ];
            for (enabled, event) in events {
                if !enabled {
                    continue;
                }
                match self
                    .provider
                    .sun_azimuth(date, params.lat, params.lon, event)
                {
                    Ok(sun_azimuth) => alignments.push(DayAlignment {
                        event,
                        sun_azimuth,
                        alignment_score: alignment_score(params.street_bearing, sun_azimuth),
                    }),
                    Err(err) => debug!("No {} data for {date}: {err}", event.as_str()),
                }
            }

            // A day with no data is omitted entirely, not scored zero
            if let Some(best) = alignments
                .iter()
                .max_by(|a, b| a.alignment_score.total_cmp(&b.alignment_score))
                .cloned()
            {
                results.push(DayResult {
                    date,
                    day_of_year,
                    alignments,
                    best,
                });
            }

            if day_of_year % self.progress_interval == 0 {
                progress(f64::from(day_of_year) / f64::from(total_days) * 100.0);
            }
        }

        results
    }
}

/// Extracts local maxima and aggregates the collected days into the
/// ranked outcome.
fn rank_days(days: Vec<DayResult>) -> DaySearchOutcome {
    let days_collected = days.len();
    let mut histogram = ScoreHistogram::default();
    let mut sum = 0.0;
    for day in &days {
        histogram.record(day.best.alignment_score);
        sum += day.best.alignment_score;
    }
    let average_alignment = if days_collected > 0 {
        sum / days_collected as f64
    } else {
        0.0
    };

    let mut maxima = local_maxima(&days);
    maxima.sort_by(|a, b| {
        b.best
            .alignment_score
            .total_cmp(&a.best.alignment_score)
            .then(a.day_of_year.cmp(&b.day_of_year))
    });

    let total_local_maxima = maxima.len();
    let best_day = maxima.first().cloned();
    let top_days: Vec<DayResult> = maxima.into_iter().take(5).collect();

    DaySearchOutcome {
        best_day,
        top_days,
        total_local_maxima,
        average_alignment,
        histogram,
        days_collected,
    }
}

/// A day is a local maximum when its best score strictly exceeds both
/// chronological neighbors in the collected sequence; the endpoints
/// compare against their single neighbor. With fewer than three
/// collected days no interior maximum is defined, so every collected
/// day is ranked by raw score instead.
fn local_maxima(days: &[DayResult]) -> Vec<DayResult> {
    if days.len() < 3 {
        return days.to_vec();
    }

    let score = |i: usize| days[i].best.alignment_score;
    let last = days.len() - 1;
    days.iter()
        .enumerate()
        .filter(|&(i, _)| {
            if i == 0 {
                score(0) > score(1)
            } else if i == last {
                score(last) > score(last - 1)
            } else {
                score(i) > score(i - 1) && score(i) > score(i + 1)
            }
        })
        .map(|(_, day)| day.clone())
        .collect()
}
