//! Geometry kernel: bearings, great-circle distances and the
//! street/sun alignment score.
//!
//! Streets are bidirectional, so a segment at bearing θ is treated the
//! same as one at θ+180° when scoring against a sun azimuth.

use geo::{Bearing, Distance, Haversine, Point};

/// Forward azimuth from `a` to `b` in degrees, normalized to `[0, 360)`.
/// North is 0°, East is 90°.
pub fn bearing(a: Point<f64>, b: Point<f64>) -> f64 {
    Haversine.bearing(a, b).rem_euclid(360.0)
}

/// Great-circle distance between two points in meters.
pub fn distance(a: Point<f64>, b: Point<f64>) -> f64 {
    Haversine.distance(a, b)
}

/// Absolute circular difference between two bearings, in `[0, 180]`.
pub fn bearing_difference(b1: f64, b2: f64) -> f64 {
    let d = (b1 - b2).abs().rem_euclid(360.0);
    d.min(360.0 - d)
}

/// Signed circular offset of `bearing` relative to `reference`,
/// in `[-180, 180)`.
pub fn signed_bearing_offset(reference: f64, bearing: f64) -> f64 {
    let d = (bearing - reference).rem_euclid(360.0);
    if d >= 180.0 { d - 360.0 } else { d }
}

/// How well a street bearing aligns with a sun azimuth, in `[0, 1]`.
///
/// 1.0 for parallel or antiparallel orientation, 0.0 for perpendicular,
/// linear in between. The raw difference is reduced to the circular
/// range, then folded about 90° so both near-0° and near-180°
/// differences score high.
pub fn alignment_score(street_bearing: f64, sun_azimuth: f64) -> f64 {
    let d = bearing_difference(street_bearing, sun_azimuth);
    let axial = d.min(180.0 - d);
    (1.0 - axial / 90.0).clamp(0.0, 1.0)
}
