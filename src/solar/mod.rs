//! Sun azimuth at sunrise and sunset.
//!
//! The pipeline only needs one number per (date, location, event):
//! the sun's azimuth in degrees. Hosts with their own ephemeris can
//! implement [`SunAzimuthProvider`]; [`SolarCalculator`] is a built-in
//! provider using the standard declination / hour-angle formulation,
//! accurate to well under a degree, which is plenty for street-width
//! alignment scoring.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::LruCache;
use crate::loading::AlignmentConfig;

/// Which sun event an azimuth refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SunEvent {
    Sunrise,
    Sunset,
}

impl SunEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sunrise => "sunrise",
            Self::Sunset => "sunset",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolarError {
    /// Polar day or night: the sun never crosses the horizon that day
    #[error("no {event} at latitude {latitude} on {date}", event = .event.as_str())]
    NoSunEvent {
        event: SunEvent,
        latitude: f64,
        date: NaiveDate,
    },
    #[error("latitude {0} out of range")]
    InvalidLatitude(f64),
}

/// Source of sun azimuths, pure given its inputs. Implementations may
/// cache internally; failure for a degenerate date/latitude must come
/// back as an error, not a panic.
pub trait SunAzimuthProvider {
    /// Sun azimuth in degrees `[0, 360)` at the given event.
    ///
    /// # Errors
    ///
    /// Returns an error when the event does not occur on that date at
    /// that latitude.
    fn sun_azimuth(
        &mut self,
        date: NaiveDate,
        lat: f64,
        lon: f64,
        event: SunEvent,
    ) -> Result<f64, SolarError>;
}

/// Built-in azimuth provider.
///
/// Declination from day of year, sunrise hour angle from
/// `cos H = -tan φ · tan δ`, azimuth from the spherical azimuth
/// formula. At this approximation the event azimuth depends on
/// latitude and date only, not longitude.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolarCalculator;

const EARTH_AXIAL_TILT: f64 = 23.45;

impl SolarCalculator {
    fn declination(day_of_year: u32) -> f64 {
        EARTH_AXIAL_TILT * (360.0 * (284 + day_of_year) as f64 / 365.0).to_radians().sin()
    }

    fn azimuth(lat: f64, declination: f64, hour_angle: f64) -> f64 {
        let lat_rad = lat.to_radians();
        let dec_rad = declination.to_radians();
        let ha_rad = hour_angle.to_radians();
        let sin_az = -dec_rad.cos() * ha_rad.sin();
        let cos_az = dec_rad.sin() * lat_rad.cos() - dec_rad.cos() * lat_rad.sin() * ha_rad.cos();
        sin_az.atan2(cos_az).to_degrees().rem_euclid(360.0)
    }
}

impl SunAzimuthProvider for SolarCalculator {
    fn sun_azimuth(
        &mut self,
        date: NaiveDate,
        lat: f64,
        _lon: f64,
        event: SunEvent,
    ) -> Result<f64, SolarError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(SolarError::InvalidLatitude(lat));
        }

        let declination = Self::declination(date.ordinal());
        let cos_h = -lat.to_radians().tan() * declination.to_radians().tan();
        if !(-1.0..=1.0).contains(&cos_h) {
            // Midnight sun or polar night
            return Err(SolarError::NoSunEvent {
                event,
                latitude: lat,
                date,
            });
        }

        let half_day = cos_h.acos().to_degrees();
        let hour_angle = match event {
            SunEvent::Sunrise => -half_day,
            SunEvent::Sunset => half_day,
        };
        Ok(Self::azimuth(lat, declination, hour_angle))
    }
}

/// Per-day azimuth cache in front of any provider, keyed by date,
/// rounded location and event.
pub struct CachedSunProvider<P> {
    inner: P,
    cache: LruCache<f64>,
}

impl<P: SunAzimuthProvider> CachedSunProvider<P> {
    pub fn new(inner: P, config: &AlignmentConfig) -> Self {
        Self {
            inner,
            cache: LruCache::new(config.azimuth_cache_size),
        }
    }
}

impl<P: SunAzimuthProvider> SunAzimuthProvider for CachedSunProvider<P> {
    fn sun_azimuth(
        &mut self,
        date: NaiveDate,
        lat: f64,
        lon: f64,
        event: SunEvent,
    ) -> Result<f64, SolarError> {
        let key = format!("{date}_{lat:.4}_{lon:.4}_{}", event.as_str());
        if let Some(&azimuth) = self.cache.get(&key) {
            return Ok(azimuth);
        }
        let azimuth = self.inner.sun_azimuth(date, lat, lon, event)?;
        self.cache.insert(key, azimuth);
        Ok(azimuth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn equinox_sun_rises_near_east_and_sets_near_west() {
        let mut calc = SolarCalculator;
        let equinox = date(2024, 3, 20);
        let sunrise = calc.sun_azimuth(equinox, 48.0, 2.0, SunEvent::Sunrise).unwrap();
        let sunset = calc.sun_azimuth(equinox, 48.0, 2.0, SunEvent::Sunset).unwrap();
        assert!((sunrise - 90.0).abs() < 3.0, "sunrise azimuth {sunrise}");
        assert!((sunset - 270.0).abs() < 3.0, "sunset azimuth {sunset}");
    }

    #[test]
    fn summer_sunrise_is_north_of_east_in_northern_hemisphere() {
        let mut calc = SolarCalculator;
        let solstice = date(2024, 6, 20);
        let sunrise = calc.sun_azimuth(solstice, 48.0, 2.0, SunEvent::Sunrise).unwrap();
        assert!(sunrise < 70.0, "sunrise azimuth {sunrise}");
        let winter = calc
            .sun_azimuth(date(2024, 12, 21), 48.0, 2.0, SunEvent::Sunrise)
            .unwrap();
        assert!(winter > 110.0, "winter sunrise azimuth {winter}");
    }

    #[test]
    fn polar_night_reports_no_event() {
        let mut calc = SolarCalculator;
        let result = calc.sun_azimuth(date(2024, 12, 21), 80.0, 15.0, SunEvent::Sunrise);
        assert!(matches!(result, Err(SolarError::NoSunEvent { .. })));
    }

    #[test]
    fn azimuth_is_longitude_independent_at_this_approximation() {
        let mut calc = SolarCalculator;
        let d = date(2024, 5, 1);
        let a = calc.sun_azimuth(d, 40.0, 0.0, SunEvent::Sunset).unwrap();
        let b = calc.sun_azimuth(d, 40.0, 120.0, SunEvent::Sunset).unwrap();
        assert_eq!(a, b);
    }

    struct CountingProvider {
        calls: usize,
    }

    impl SunAzimuthProvider for CountingProvider {
        fn sun_azimuth(
            &mut self,
            _date: NaiveDate,
            _lat: f64,
            _lon: f64,
            _event: SunEvent,
        ) -> Result<f64, SolarError> {
            self.calls += 1;
            Ok(90.0)
        }
    }

    #[test]
    fn cached_provider_memoizes_per_day() {
        let mut cached =
            CachedSunProvider::new(CountingProvider { calls: 0 }, &AlignmentConfig::default());
        let d = date(2024, 7, 1);
        let first = cached.sun_azimuth(d, 51.5, -0.12, SunEvent::Sunrise).unwrap();
        let second = cached.sun_azimuth(d, 51.5, -0.12, SunEvent::Sunrise).unwrap();
        assert_eq!(first, second);
        assert_eq!(cached.inner.calls, 1);

        // Different event misses the cache
        cached.sun_azimuth(d, 51.5, -0.12, SunEvent::Sunset).unwrap();
        assert_eq!(cached.inner.calls, 2);
    }
}
