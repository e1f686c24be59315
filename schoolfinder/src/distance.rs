//! Great-circle distance on a spherical Earth.
//!
//! Distances are computed with the haversine formula, which stays numerically
//! stable for small separations.

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two points given in degrees.
///
/// No range validation is performed; non-finite input yields `NaN`.
///
/// # Examples
///
/// ```
/// use schoolfinder::distance::haversine_km;
///
/// assert_eq!(haversine_km(40.0, -75.0, 40.0, -75.0), 0.0);
///
/// // One degree of longitude along the equator
/// let d = haversine_km(0.0, 0.0, 0.0, 1.0);
/// assert!((d - 111.19).abs() < 0.01);
/// ```
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
