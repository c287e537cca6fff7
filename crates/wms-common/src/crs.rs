//! Coordinate Reference System catalog.
//!
//! Capabilities documents name coordinate systems in several spellings
//! (`EPSG:2056`, `urn:ogc:def:crs:EPSG::2056`, OGC HTTP URIs, `CRS:84`).
//! [`CrsCode::resolve`] folds all of them onto one code.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Well-known CRS codes the engine can interpret and reproject between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CrsCode {
    /// WGS84 Geographic (lon/lat in degrees)
    Epsg4326,
    /// Web Mercator (meters)
    Epsg3857,
    /// CH1903+ / LV95 (meters)
    Epsg2056,
    /// CH1903 / LV03 (meters)
    Epsg21781,
}

const OGC_EPSG_URN: &str = "URN:OGC:DEF:CRS:EPSG:";
const OGC_EPSG_URIS: [&str; 2] = [
    "HTTP://WWW.OPENGIS.NET/DEF/CRS/EPSG/",
    "HTTPS://WWW.OPENGIS.NET/DEF/CRS/EPSG/",
];

impl CrsCode {
    /// WGS84, the CRS of every geographic bounding box.
    pub const WGS84: CrsCode = CrsCode::Epsg4326;

    /// Look up a CRS identifier as found in a capabilities document.
    ///
    /// Accepts formats like:
    /// - "EPSG:4326", "epsg:3857"
    /// - "CRS:84" (equivalent to EPSG:4326 with lon/lat axis order)
    /// - "urn:ogc:def:crs:EPSG::2056", "urn:ogc:def:crs:EPSG:6.18:3:3857"
    /// - "http://www.opengis.net/def/crs/EPSG/0/21781"
    /// - "urn:ogc:def:crs:OGC:1.3:CRS84"
    ///
    /// Returns `None` for anything outside the catalog.
    pub fn resolve(code: &str) -> Option<Self> {
        let normalized = code.trim().to_ascii_uppercase();
        if is_crs84(&normalized) {
            return Some(CrsCode::Epsg4326);
        }
        epsg_number(&normalized).and_then(Self::from_epsg)
    }

    /// Strict variant of [`CrsCode::resolve`] for user-supplied codes.
    pub fn from_wms_string(s: &str) -> Result<Self, CrsParseError> {
        Self::resolve(s).ok_or_else(|| CrsParseError::UnsupportedCrs(s.to_string()))
    }

    /// Map a numeric EPSG code, including the common Web Mercator aliases.
    pub fn from_epsg(code: u32) -> Option<Self> {
        match code {
            4326 => Some(CrsCode::Epsg4326),
            3857 | 900913 | 102100 | 3785 => Some(CrsCode::Epsg3857),
            2056 => Some(CrsCode::Epsg2056),
            21781 => Some(CrsCode::Epsg21781),
            _ => None,
        }
    }

    /// Numeric EPSG code.
    pub fn epsg(&self) -> u32 {
        match self {
            CrsCode::Epsg4326 => 4326,
            CrsCode::Epsg3857 => 3857,
            CrsCode::Epsg2056 => 2056,
            CrsCode::Epsg21781 => 21781,
        }
    }
}

fn is_crs84(normalized: &str) -> bool {
    normalized == "CRS:84"
        || (normalized.contains("OGC") && normalized.ends_with("CRS84"))
}

fn epsg_number(normalized: &str) -> Option<u32> {
    if let Some(rest) = normalized.strip_prefix("EPSG:") {
        return rest.parse().ok();
    }
    if let Some(rest) = normalized.strip_prefix(OGC_EPSG_URN) {
        // Optional version segment: "EPSG::2056" or "EPSG:6.18:3:3857"
        return rest.rsplit(':').next().and_then(|code| code.parse().ok());
    }
    OGC_EPSG_URIS
        .iter()
        .find_map(|prefix| normalized.strip_prefix(prefix))
        .and_then(|rest| rest.rsplit('/').next())
        .and_then(|code| code.parse().ok())
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

impl Default for CrsCode {
    fn default() -> Self {
        CrsCode::WGS84
    }
}

impl TryFrom<String> for CrsCode {
    type Error = CrsParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_wms_string(&value)
    }
}

impl From<CrsCode> for String {
    fn from(code: CrsCode) -> Self {
        code.to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CrsParseError {
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_crs() {
        assert_eq!(
            CrsCode::from_wms_string("EPSG:4326").unwrap(),
            CrsCode::Epsg4326
        );
        assert_eq!(
            CrsCode::from_wms_string("epsg:3857").unwrap(),
            CrsCode::Epsg3857
        );
        assert_eq!(
            CrsCode::from_wms_string("CRS:84").unwrap(),
            CrsCode::Epsg4326
        );
        assert!(CrsCode::from_wms_string("EPSG:99999").is_err());
    }

    #[test]
    fn test_resolve_urns_and_uris() {
        assert_eq!(
            CrsCode::resolve("urn:ogc:def:crs:EPSG::2056"),
            Some(CrsCode::Epsg2056)
        );
        assert_eq!(
            CrsCode::resolve("urn:ogc:def:crs:EPSG:6.18:3:3857"),
            Some(CrsCode::Epsg3857)
        );
        assert_eq!(
            CrsCode::resolve("http://www.opengis.net/def/crs/EPSG/0/21781"),
            Some(CrsCode::Epsg21781)
        );
        assert_eq!(
            CrsCode::resolve("urn:ogc:def:crs:OGC:1.3:CRS84"),
            Some(CrsCode::Epsg4326)
        );
        assert_eq!(CrsCode::resolve("EPSG:900913"), Some(CrsCode::Epsg3857));
        assert_eq!(CrsCode::resolve("urn:ogc:def:crs:EPSG::32632"), None);
        assert_eq!(CrsCode::resolve(""), None);
    }

    #[test]
    fn test_serde_uses_code_string() {
        let json = serde_json::to_string(&CrsCode::Epsg2056).unwrap();
        assert_eq!(json, "\"EPSG:2056\"");
        let parsed: CrsCode = serde_json::from_str("\"urn:ogc:def:crs:EPSG::3857\"").unwrap();
        assert_eq!(parsed, CrsCode::Epsg3857);
        assert!(serde_json::from_str::<CrsCode>("\"EPSG:1\"").is_err());
    }
}
