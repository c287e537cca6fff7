//! Common test fixtures for capabilities tests.
//!
//! Reference values used across the test suite, mostly around Switzerland
//! since its national grid (LV95) exercises a real reprojection.

/// Origin URLs a document is "fetched" from.
pub mod origin {
    /// WMS origin with a query string that must not leak into base URLs
    pub const WMS: &str = "https://wms.example.com/?SERVICE=WMS&REQUEST=GetCapabilities&VERSION=1.3.0";

    /// Host name of [`WMS`]
    pub const WMS_HOST: &str = "wms.example.com";

    /// WMTS origin pointing at a static capabilities file
    pub const WMTS: &str = "https://tiles.example.com/1.0.0/WMTSCapabilities.xml";

    /// Host name of [`WMTS`]
    pub const WMTS_HOST: &str = "tiles.example.com";
}

/// Common bounding box definitions for testing, as (min_x, min_y, max_x, max_y).
pub mod bbox {
    /// Switzerland in WGS84 degrees
    pub const SWITZERLAND_WGS84: (f64, f64, f64, f64) = (5.96, 45.82, 10.49, 47.81);

    /// [`SWITZERLAND_WGS84`] corners projected to LV95 (EPSG:2056)
    pub const SWITZERLAND_LV95: (f64, f64, f64, f64) =
        (2485071.58, 1075346.31, 2828515.82, 1299941.79);

    /// [`SWITZERLAND_WGS84`] corners projected to Web Mercator (EPSG:3857)
    pub const SWITZERLAND_WEB_MERCATOR: (f64, f64, f64, f64) =
        (663464.17, 5751550.87, 1167741.46, 6075303.61);

    /// A server-declared LV95 box, used verbatim when LV95 is requested
    pub const DECLARED_LV95: (f64, f64, f64, f64) = (2100000.0, 1030000.0, 2900000.0, 1400000.0);

    /// Global bounding box (-180 to 180, -90 to 90)
    pub const GLOBAL: (f64, f64, f64, f64) = (-180.0, -90.0, 180.0, 90.0);
}

/// Time dimension values seen on real servers.
pub mod time {
    /// Compact, ISO date and ISO date-time spellings of the same day
    pub const DATED: [&str; 3] = ["20110805", "2011-08-05", "2011-08-05T01:20:34.345Z"];

    /// "All data" placeholders
    pub const ALL_SENTINELS: [&str; 3] = ["9999", "99990101", "99991231"];

    /// Tokens that are neither dates nor keywords
    pub const OPAQUE: [&str; 2] = ["Time A", "Time B"];
}
