//! Swiss oblique Mercator (CH1903 / LV03 and CH1903+ / LV95).
//!
//! The projection is a conformal double projection: the Bessel ellipsoid is
//! mapped onto a sphere, the sphere is rotated so that the projection
//! centre (old observatory of Bern) lies on its equator, and the rotated
//! sphere is projected with an ordinary Mercator.
//!
//! Input and output geographic coordinates are WGS84; a three parameter
//! geocentric shift moves between WGS84 and the CH1903 datum.

use std::f64::consts::FRAC_PI_4;

use crate::ellipsoid::Ellipsoid;

const CENTER_LAT_DEG: f64 = 46.952_405_555_555_6;
const CENTER_LON_DEG: f64 = 7.439_583_333_333_33;

/// Geocentric translation from CH1903+ to WGS84 (meters).
const LV95_TO_WGS84: [f64; 3] = [674.374, 15.056, 405.346];
/// Geocentric translation from CH1903 to WGS84 (meters).
const LV03_TO_WGS84: [f64; 3] = [674.4, 15.1, 405.3];

/// A Swiss grid: oblique Mercator on Bessel 1841 plus datum shift.
#[derive(Debug, Clone)]
pub struct SwissGrid {
    false_easting: f64,
    false_northing: f64,
    to_wgs84: [f64; 3],
    ellipsoid: Ellipsoid,
    lon0: f64,
    e: f64,
    /// Radius of the projection sphere
    radius: f64,
    alpha: f64,
    b0: f64,
    k: f64,
}

impl SwissGrid {
    /// CH1903+ / LV95 (EPSG:2056).
    pub fn lv95() -> Self {
        Self::new(2_600_000.0, 1_200_000.0, LV95_TO_WGS84)
    }

    /// CH1903 / LV03 (EPSG:21781).
    pub fn lv03() -> Self {
        Self::new(600_000.0, 200_000.0, LV03_TO_WGS84)
    }

    fn new(false_easting: f64, false_northing: f64, to_wgs84: [f64; 3]) -> Self {
        let ellipsoid = Ellipsoid::BESSEL_1841;
        let es = ellipsoid.es();
        let e = ellipsoid.e();
        let phi0 = CENTER_LAT_DEG.to_radians();
        let sin_phi0 = phi0.sin();

        let radius = ellipsoid.a * (1.0 - es).sqrt() / (1.0 - es * sin_phi0 * sin_phi0);
        let alpha = (1.0 + es / (1.0 - es) * phi0.cos().powi(4)).sqrt();
        let b0 = (sin_phi0 / alpha).asin();
        let k1 = (FRAC_PI_4 + b0 / 2.0).tan().ln();
        let k2 = (FRAC_PI_4 + phi0 / 2.0).tan().ln();
        let k3 = ((1.0 + e * sin_phi0) / (1.0 - e * sin_phi0)).ln();
        let k = k1 - alpha * k2 + alpha * e / 2.0 * k3;

        Self {
            false_easting,
            false_northing,
            to_wgs84,
            ellipsoid,
            lon0: CENTER_LON_DEG.to_radians(),
            e,
            radius,
            alpha,
            b0,
            k,
        }
    }

    /// WGS84 lon/lat degrees to grid easting/northing.
    pub fn from_wgs84(&self, lon_deg: f64, lat_deg: f64) -> Option<(f64, f64)> {
        let (x, y, z) = Ellipsoid::WGS84.geodetic_to_geocentric(
            lon_deg.to_radians(),
            lat_deg.to_radians(),
            0.0,
        );
        let [dx, dy, dz] = self.to_wgs84;
        let (lon, lat, _) = self
            .ellipsoid
            .geocentric_to_geodetic(x - dx, y - dy, z - dz)?;
        Some(self.project(lon, lat))
    }

    /// Grid easting/northing to WGS84 lon/lat degrees.
    pub fn to_wgs84(&self, easting: f64, northing: f64) -> Option<(f64, f64)> {
        let (lon, lat) = self.unproject(easting, northing)?;
        let (x, y, z) = self.ellipsoid.geodetic_to_geocentric(lon, lat, 0.0);
        let [dx, dy, dz] = self.to_wgs84;
        let (lon, lat, _) = Ellipsoid::WGS84.geocentric_to_geodetic(x + dx, y + dy, z + dz)?;
        Some((lon.to_degrees(), lat.to_degrees()))
    }

    /// Bessel geodetic (radians) to grid coordinates.
    fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let e = self.e;
        let sin_lat = lat.sin();
        let sa1 = (FRAC_PI_4 - lat / 2.0).tan().ln();
        let sa2 = e / 2.0 * ((1.0 + e * sin_lat) / (1.0 - e * sin_lat)).ln();
        let s = -self.alpha * (sa1 + sa2) + self.k;

        // Sphere latitude/longitude relative to the centre meridian
        let b = 2.0 * (s.exp().atan() - FRAC_PI_4);
        let i = self.alpha * (lon - self.lon0);

        // Rotate onto the oblique equator
        let rot_i = (i.sin() / (self.b0.sin() * b.tan() + self.b0.cos() * i.cos())).atan();
        let rot_b = (self.b0.cos() * b.sin() - self.b0.sin() * b.cos() * i.cos()).asin();

        let easting = self.radius * rot_i + self.false_easting;
        let northing = self.radius / 2.0 * ((1.0 + rot_b.sin()) / (1.0 - rot_b.sin())).ln()
            + self.false_northing;
        (easting, northing)
    }

    /// Grid coordinates to Bessel geodetic (radians).
    fn unproject(&self, easting: f64, northing: f64) -> Option<(f64, f64)> {
        const TOLERANCE: f64 = 1.0e-12;
        const MAX_ITERATIONS: usize = 30;

        let e = self.e;
        let rot_i = (easting - self.false_easting) / self.radius;
        let rot_b = 2.0 * (((northing - self.false_northing) / self.radius).exp().atan() - FRAC_PI_4);

        let b = (self.b0.cos() * rot_b.sin() + self.b0.sin() * rot_b.cos() * rot_i.cos()).asin();
        let i = (rot_i.sin() / (self.b0.cos() * rot_i.cos() - self.b0.sin() * rot_b.tan())).atan();
        let lon = self.lon0 + i / self.alpha;

        let iso_b = (FRAC_PI_4 + b / 2.0).tan().ln();
        let mut phi = b;
        for _ in 0..MAX_ITERATIONS {
            let s = 1.0 / self.alpha * (iso_b - self.k)
                + e * (FRAC_PI_4 + (e * phi.sin()).asin() / 2.0).tan().ln();
            let next = 2.0 * s.exp().atan() - std::f64::consts::FRAC_PI_2;
            if (next - phi).abs() <= TOLERANCE {
                return Some((lon, next));
            }
            phi = next;
        }
        None
    }
}
