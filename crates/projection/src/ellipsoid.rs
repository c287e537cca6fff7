//! Reference ellipsoids and geocentric conversions.

/// An ellipsoid of revolution given by semi-major axis and inverse flattening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis (meters)
    pub a: f64,
    /// Inverse flattening
    pub inv_f: f64,
}

impl Ellipsoid {
    pub const WGS84: Ellipsoid = Ellipsoid {
        a: 6_378_137.0,
        inv_f: 298.257_223_563,
    };

    pub const BESSEL_1841: Ellipsoid = Ellipsoid {
        a: 6_377_397.155,
        inv_f: 299.152_812_8,
    };

    /// Flattening.
    pub fn f(&self) -> f64 {
        1.0 / self.inv_f
    }

    /// First eccentricity squared.
    pub fn es(&self) -> f64 {
        let f = self.f();
        2.0 * f - f * f
    }

    /// First eccentricity.
    pub fn e(&self) -> f64 {
        self.es().sqrt()
    }

    /// Geodetic (radians, meters) to earth-centered cartesian coordinates.
    pub fn geodetic_to_geocentric(&self, lon: f64, lat: f64, h: f64) -> (f64, f64, f64) {
        let es = self.es();
        let (sin_lat, cos_lat) = lat.sin_cos();
        let rn = self.a / (1.0 - es * sin_lat * sin_lat).sqrt();
        (
            (rn + h) * cos_lat * lon.cos(),
            (rn + h) * cos_lat * lon.sin(),
            (rn * (1.0 - es) + h) * sin_lat,
        )
    }

    /// Earth-centered cartesian to geodetic (radians, meters).
    ///
    /// Iterative solution; returns `None` at the earth's center or when the
    /// iteration does not settle.
    pub fn geocentric_to_geodetic(&self, x: f64, y: f64, z: f64) -> Option<(f64, f64, f64)> {
        const TOLERANCE: f64 = 1.0e-12;
        const MAX_ITERATIONS: usize = 30;

        let es = self.es();
        let p = (x * x + y * y).sqrt();
        let rr = (x * x + y * y + z * z).sqrt();
        if rr < TOLERANCE {
            return None;
        }
        let lon = y.atan2(x);

        let ct = z / rr;
        let st = p / rr;
        let mut rx = 1.0 / (1.0 - es * (2.0 - es) * st * st).sqrt();
        let mut cphi0 = st * (1.0 - es) * rx;
        let mut sphi0 = ct * rx;

        for _ in 0..MAX_ITERATIONS {
            let rn = self.a / (1.0 - es * sphi0 * sphi0).sqrt();
            let height = p * cphi0 + z * sphi0 - rn * (1.0 - es * sphi0 * sphi0);
            let rk = es * rn / (rn + height);
            rx = 1.0 / (1.0 - rk * (2.0 - rk) * st * st).sqrt();
            let cphi = st * (1.0 - rk) * rx;
            let sphi = ct * rx;
            let sdphi = sphi * cphi0 - cphi * sphi0;
            cphi0 = cphi;
            sphi0 = sphi;
            if sdphi * sdphi <= TOLERANCE * TOLERANCE {
                let lat = (sphi / cphi.abs()).atan();
                return Some((lon, lat, height));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocentric_roundtrip() {
        let ell = Ellipsoid::BESSEL_1841;
        let (lon, lat, h) = (0.13_f64, 0.82_f64, 412.0);
        let (x, y, z) = ell.geodetic_to_geocentric(lon, lat, h);
        let (lon2, lat2, h2) = ell.geocentric_to_geodetic(x, y, z).unwrap();
        assert!((lon - lon2).abs() < 1e-12);
        assert!((lat - lat2).abs() < 1e-12);
        assert!((h - h2).abs() < 1e-6);
    }

    #[test]
    fn test_earth_center_is_rejected() {
        assert!(Ellipsoid::WGS84.geocentric_to_geodetic(0.0, 0.0, 0.0).is_none());
    }

    #[test]
    fn test_wgs84_eccentricity() {
        assert!((Ellipsoid::WGS84.es() - 0.006_694_379_990_14).abs() < 1e-12);
    }
}
