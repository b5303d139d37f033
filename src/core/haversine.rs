//! Great-circle distance on a spherical Earth.
//!
//! Uses the haversine formula with a fixed mean radius. The spherical model
//! is within about 0.5% of the ellipsoidal distance.

use crate::domain::model::GeoCoordinate;
use crate::utils::error::Result;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Distance in meters between two validated coordinates.
///
/// Identical points give exactly `0.0`; antipodal points give `π × EARTH_RADIUS_M`.
pub fn haversine_meters(from: &GeoCoordinate, to: &GeoCoordinate) -> f64 {
    central_angle(
        from.latitude(),
        from.longitude(),
        to.latitude(),
        to.longitude(),
    ) * EARTH_RADIUS_M
}

/// Distance in meters between two raw degree pairs.
///
/// Every argument is range-checked first; an out-of-range or non-finite value
/// fails with [`GeoError::InvalidArgument`](crate::GeoError::InvalidArgument)
/// before anything is computed.
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<f64> {
    let from = GeoCoordinate::new(lat1, lon1)?;
    let to = GeoCoordinate::new(lat2, lon2)?;
    Ok(haversine_meters(&from, &to))
}

fn central_angle(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Rounding can push `a` just outside [0, 1] near identical or antipodal points.
    let a = a.clamp(0.0, 1.0);

    2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}
