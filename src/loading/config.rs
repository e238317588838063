//! Configuration surface consumed by the core pipeline

use std::time::Duration;

/// Tuning knobs for batching, scoring and caching.
///
/// Validation of host-supplied values happens at the host boundary;
/// the core assumes the config it receives is sane.
#[derive(Debug, Clone)]
pub struct AlignmentConfig {
    /// Max per-step bearing delta (degrees) to extend a batch
    pub bearing_tolerance: f64,
    /// Minimum chord length (meters) for a batch to be emitted
    pub min_batch_length: f64,
    /// Cap on cumulative per-direction bearing drift (degrees)
    pub max_bearing_drift: f64,
    /// Drop single-segment batches when true
    pub require_batching: bool,
    /// Road-type allow list; `None` admits every type
    pub included_types: Option<Vec<String>>,
    /// Road-type deny list, applied after the allow list
    pub excluded_types: Vec<String>,
    /// Entries in the per-way batching cache
    pub batch_cache_size: usize,
    /// Entries in the (azimuth, bearing) score memo cache
    pub score_cache_size: usize,
    /// Entries in the optimal-day result cache
    pub day_cache_size: usize,
    /// Entries in the per-day sun azimuth cache
    pub azimuth_cache_size: usize,
    /// Entries in the street geometry cache
    pub geometry_cache_size: usize,
    /// Validity window for cached street geometry
    pub geometry_cache_max_age: Duration,
    /// Days between progress reports during a year scan
    pub progress_interval: u32,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            bearing_tolerance: 30.0,
            min_batch_length: 50.0,
            max_bearing_drift: 45.0,
            require_batching: true,
            included_types: None,
            excluded_types: Vec::new(),
            batch_cache_size: 500,
            score_cache_size: 2048,
            day_cache_size: 64,
            azimuth_cache_size: 1024,
            geometry_cache_size: 32,
            geometry_cache_max_age: Duration::from_secs(300),
            progress_interval: 30,
        }
    }
}
