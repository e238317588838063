//! Input boundary: street geometry acquisition and filtering
//!
//! The actual network fetch lives outside the crate behind the
//! [`StreetSource`] trait. [`StreetLoader`] wraps a source with the
//! caching and fallback semantics the pipeline expects: cancelled
//! fetches resolve to an empty result, timeouts fall back to any
//! previously cached geometry for the same bounds.

pub mod config;

pub use config::AlignmentConfig;

use log::{info, warn};

use crate::Error;
use crate::cache::LruCache;
use crate::model::{BoundingBox, StreetWay};

/// Failure modes of an external street-geometry source.
#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    /// The request was superseded and cancelled mid-flight
    #[error("fetch cancelled")]
    Cancelled,
    #[error("fetch timed out")]
    TimedOut,
    #[error("fetch failed: {0}")]
    Failed(String),
}

/// External provider of street polylines for a bounding box.
pub trait StreetSource {
    fn fetch(&mut self, bounds: &BoundingBox) -> Result<Vec<StreetWay>, SourceError>;
}

/// Caching wrapper around a [`StreetSource`].
pub struct StreetLoader {
    cache: LruCache<Vec<StreetWay>>,
}

impl StreetLoader {
    pub fn new(config: &AlignmentConfig) -> Self {
        Self {
            cache: LruCache::with_max_age(
                config.geometry_cache_size,
                config.geometry_cache_max_age,
            ),
        }
    }

    /// Loads street geometry for `bounds`, consulting the cache first.
    ///
    /// A cancelled fetch yields `Ok(vec![])` and leaves the cache
    /// untouched. A timed-out or failed fetch falls back to a stale
    /// cached result when one exists for the same spatial key.
    ///
    /// # Errors
    ///
    /// Returns an error when the source fails and no cached result
    /// exists to fall back to.
    pub fn load(
        &mut self,
        source: &mut dyn StreetSource,
        bounds: &BoundingBox,
    ) -> Result<Vec<StreetWay>, Error> {
        let key = bounds.cache_key();

        if let Some(ways) = self.cache.get(&key) {
            log::debug!("Street cache hit for {key}");
            return Ok(ways.clone());
        }

        match source.fetch(bounds) {
            Ok(ways) => {
                info!("Fetched {} ways for {key}", ways.len());
                self.cache.insert(key, ways.clone());
                Ok(ways)
            }
            Err(SourceError::Cancelled) => {
                info!("Street fetch for {key} cancelled, returning empty result");
                Ok(Vec::new())
            }
            Err(err @ (SourceError::TimedOut | SourceError::Failed(_))) => {
                if let Some(ways) = self.cache.get_stale(&key) {
                    warn!("Street fetch for {key} failed ({err}), using stale cache");
                    Ok(ways.clone())
                } else {
                    Err(Error::SourceUnavailable(key))
                }
            }
        }
    }
}

/// Applies the road-type allow/deny filter to a set of ways.
///
/// Ways without a road type pass the allow list only when no allow list
/// is configured; the deny list never matches them.
pub fn filter_ways(ways: Vec<StreetWay>, config: &AlignmentConfig) -> Vec<StreetWay> {
    let before = ways.len();
    let filtered: Vec<StreetWay> = ways
        .into_iter()
        .filter(|way| {
            let road_type = way.road_type.as_deref();
            if let Some(included) = &config.included_types {
                match road_type {
                    Some(t) if included.iter().any(|i| i == t) => {}
                    _ => return false,
                }
            }
            if let Some(t) = road_type
                && config.excluded_types.iter().any(|e| e == t)
            {
                return false;
            }
            true
        })
        .collect();

    if filtered.len() < before {
        info!(
            "Road-type filter kept {} of {} ways",
            filtered.len(),
            before
        );
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_string;

    fn way(id: i64, road_type: Option<&str>) -> StreetWay {
        StreetWay {
            id,
            geometry: line_string![(x: 0.0, y: 0.0), (x: 0.001, y: 0.001)],
            road_type: road_type.map(String::from),
        }
    }

    fn bounds() -> BoundingBox {
        BoundingBox {
            south: 51.5,
            west: -0.13,
            north: 51.52,
            east: -0.11,
        }
    }

    enum Script {
        Ok(Vec<StreetWay>),
        Cancelled,
        TimedOut,
        Failed,
    }

    struct ScriptedSource {
        script: Vec<Script>,
        calls: usize,
    }

    impl StreetSource for ScriptedSource {
        fn fetch(&mut self, _bounds: &BoundingBox) -> Result<Vec<StreetWay>, SourceError> {
            let step = self.script.remove(0);
            self.calls += 1;
            match step {
                Script::Ok(ways) => Ok(ways),
                Script::Cancelled => Err(SourceError::Cancelled),
                Script::TimedOut => Err(SourceError::TimedOut),
                Script::Failed => Err(SourceError::Failed("boom".into())),
            }
        }
    }

    #[test]
    fn successful_fetch_is_cached() {
        let config = AlignmentConfig::default();
        let mut loader = StreetLoader::new(&config);
        let mut source = ScriptedSource {
            script: vec![Script::Ok(vec![way(1, Some("primary"))])],
            calls: 0,
        };

        let first = loader.load(&mut source, &bounds()).unwrap();
        assert_eq!(first.len(), 1);
        // Second load must come from cache; the script is exhausted
        let second = loader.load(&mut source, &bounds()).unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(source.calls, 1);
    }

    #[test]
    fn cancelled_fetch_is_empty_and_does_not_poison_cache() {
        let config = AlignmentConfig::default();
        let mut loader = StreetLoader::new(&config);
        let mut source = ScriptedSource {
            script: vec![
                Script::Cancelled,
                Script::Ok(vec![way(1, None), way(2, None)]),
            ],
            calls: 0,
        };

        let cancelled = loader.load(&mut source, &bounds()).unwrap();
        assert!(cancelled.is_empty());

        let retried = loader.load(&mut source, &bounds()).unwrap();
        assert_eq!(retried.len(), 2);
    }

    #[test]
    fn timeout_falls_back_to_stale_cache() {
        let mut config = AlignmentConfig::default();
        config.geometry_cache_max_age = std::time::Duration::ZERO;
        let mut loader = StreetLoader::new(&config);
        let mut source = ScriptedSource {
            script: vec![Script::Ok(vec![way(7, None)]), Script::TimedOut],
            calls: 0,
        };

        loader.load(&mut source, &bounds()).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        // Entry has aged out, so the loader refetches, times out, and
        // falls back to the stale entry
        let fallback = loader.load(&mut source, &bounds()).unwrap();
        assert_eq!(fallback.len(), 1);
        assert_eq!(fallback[0].id, 7);
    }

    #[test]
    fn failure_without_fallback_propagates() {
        let config = AlignmentConfig::default();
        let mut loader = StreetLoader::new(&config);
        let mut source = ScriptedSource {
            script: vec![Script::Failed],
            calls: 0,
        };

        assert!(loader.load(&mut source, &bounds()).is_err());
    }

    #[test]
    fn road_type_filters() {
        let config = AlignmentConfig {
            included_types: Some(vec!["primary".into(), "secondary".into()]),
            excluded_types: vec!["secondary".into()],
            ..AlignmentConfig::default()
        };
        let ways = vec![
            way(1, Some("primary")),
            way(2, Some("secondary")),
            way(3, Some("footway")),
            way(4, None),
        ];
        let kept = filter_ways(ways, &config);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, 1);
    }

    #[test]
    fn no_allow_list_admits_untagged_ways() {
        let config = AlignmentConfig {
            excluded_types: vec!["footway".into()],
            ..AlignmentConfig::default()
        };
        let kept = filter_ways(vec![way(1, None), way(2, Some("footway"))], &config);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, 1);
    }
}
