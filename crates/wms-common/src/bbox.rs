//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A geographic or projected bounding box.
///
/// For geographic CRS (EPSG:4326), coordinates are in degrees.
/// For projected CRS (EPSG:3857, EPSG:2056, ...), coordinates are in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Build a box from the four `minx`/`miny`/`maxx`/`maxy` attribute strings
    /// of a WMS `BoundingBox` or `LatLonBoundingBox` element.
    pub fn from_attributes(
        min_x: &str,
        min_y: &str,
        max_x: &str,
        max_y: &str,
    ) -> Result<Self, BboxParseError> {
        Ok(Self {
            min_x: parse_number(min_x)?,
            min_y: parse_number(min_y)?,
            max_x: parse_number(max_x)?,
            max_y: parse_number(max_y)?,
        })
    }

    /// Build a box from OWS `LowerCorner` / `UpperCorner` strings ("x y").
    pub fn from_corners(lower: &str, upper: &str) -> Result<Self, BboxParseError> {
        let (min_x, min_y) = parse_corner(lower)?;
        let (max_x, max_y) = parse_corner(upper)?;
        Ok(Self::new(min_x, min_y, max_x, max_y))
    }

    /// The box as `[min_x, min_y, max_x, max_y]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }

    /// Lower-left corner.
    pub fn min_corner(&self) -> (f64, f64) {
        (self.min_x, self.min_y)
    }

    /// Upper-right corner.
    pub fn max_corner(&self) -> (f64, f64) {
        (self.max_x, self.max_y)
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// True when every coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(bbox: BoundingBox) -> Self {
        bbox.to_array()
    }
}

fn parse_number(raw: &str) -> Result<f64, BboxParseError> {
    raw.trim()
        .parse()
        .map_err(|_| BboxParseError::InvalidNumber(raw.to_string()))
}

fn parse_corner(raw: &str) -> Result<(f64, f64), BboxParseError> {
    let parts: Vec<&str> = raw.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(BboxParseError::InvalidCorner(raw.to_string()));
    }
    Ok((parse_number(parts[0])?, parse_number(parts[1])?))
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid corner: {0}. Expected 'x y'")]
    InvalidCorner(String),

    #[error("Invalid number in bounding box: {0}")]
    InvalidNumber(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_attributes() {
        let bbox = BoundingBox::from_attributes("2100000", "1030000", "2900000", "1400000").unwrap();
        assert_eq!(bbox.to_array(), [2100000.0, 1030000.0, 2900000.0, 1400000.0]);
    }

    #[test]
    fn test_from_corners() {
        let bbox = BoundingBox::from_corners("5.140242 45.398181", " 11.47757 48.230651 ").unwrap();
        assert_eq!(bbox.min_corner(), (5.140242, 45.398181));
        assert_eq!(bbox.max_corner(), (11.47757, 48.230651));
    }

    #[test]
    fn test_invalid_corner() {
        assert!(matches!(
            BoundingBox::from_corners("5.1", "11.4 48.2"),
            Err(BboxParseError::InvalidCorner(_))
        ));
        assert!(matches!(
            BoundingBox::from_corners("5.1 north", "11.4 48.2"),
            Err(BboxParseError::InvalidNumber(_))
        ));
    }
}
