//! Spherical Web Mercator (EPSG:3857).

use std::f64::consts::PI;

/// Sphere radius used by Web Mercator (meters).
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude limit where the projected world becomes square.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

/// Geographic (lon/lat degrees) to Web Mercator meters.
pub fn forward(lon_deg: f64, lat_deg: f64) -> (f64, f64) {
    let lat = lat_deg.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = EARTH_RADIUS * lon_deg.to_radians();
    let y = EARTH_RADIUS * (PI / 4.0 + lat / 2.0).tan().ln();
    (x, y)
}

/// Web Mercator meters to geographic (lon/lat degrees).
pub fn inverse(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
    (lon, lat)
}
