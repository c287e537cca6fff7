//! Point and bounding box reprojection between catalog CRSs.
//!
//! Every transformation pivots through WGS84 geographic degrees.

use thiserror::Error;
use wms_common::{BoundingBox, CrsCode};

use crate::mercator;
use crate::swiss::SwissGrid;

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("Non-finite coordinate ({x}, {y})")]
    NonFinite { x: f64, y: f64 },

    #[error("Coordinate ({x}, {y}) cannot be converted from {crs}")]
    OutOfDomain { x: f64, y: f64, crs: CrsCode },
}

/// Reproject a single point.
///
/// Returns the input unchanged when `from == to`, so values already in the
/// target CRS never pick up floating point drift.
pub fn reproject(point: (f64, f64), from: CrsCode, to: CrsCode) -> Result<(f64, f64), ProjectionError> {
    if from == to {
        return Ok(point);
    }
    let (x, y) = point;
    if !x.is_finite() || !y.is_finite() {
        return Err(ProjectionError::NonFinite { x, y });
    }
    let (lon, lat) = to_wgs84(x, y, from)?;
    from_wgs84(lon, lat, to)
}

/// Reproject the min and max corners of a box independently.
///
/// Edges are not resampled.
pub fn reproject_bbox(
    bbox: &BoundingBox,
    from: CrsCode,
    to: CrsCode,
) -> Result<BoundingBox, ProjectionError> {
    if from == to {
        return Ok(*bbox);
    }
    let (min_x, min_y) = reproject(bbox.min_corner(), from, to)?;
    let (max_x, max_y) = reproject(bbox.max_corner(), from, to)?;
    Ok(BoundingBox::new(min_x, min_y, max_x, max_y))
}

fn to_wgs84(x: f64, y: f64, crs: CrsCode) -> Result<(f64, f64), ProjectionError> {
    let converted = match crs {
        CrsCode::Epsg4326 => Some((x, y)),
        CrsCode::Epsg3857 => Some(mercator::inverse(x, y)),
        CrsCode::Epsg2056 => SwissGrid::lv95().to_wgs84(x, y),
        CrsCode::Epsg21781 => SwissGrid::lv03().to_wgs84(x, y),
    };
    check(converted, x, y, crs)
}

fn from_wgs84(lon: f64, lat: f64, crs: CrsCode) -> Result<(f64, f64), ProjectionError> {
    let converted = match crs {
        CrsCode::Epsg4326 => Some((lon, lat)),
        CrsCode::Epsg3857 => Some(mercator::forward(lon, lat)),
        CrsCode::Epsg2056 => SwissGrid::lv95().from_wgs84(lon, lat),
        CrsCode::Epsg21781 => SwissGrid::lv03().from_wgs84(lon, lat),
    };
    check(converted, lon, lat, CrsCode::WGS84)
}

fn check(
    converted: Option<(f64, f64)>,
    x: f64,
    y: f64,
    crs: CrsCode,
) -> Result<(f64, f64), ProjectionError> {
    match converted {
        Some((cx, cy)) if cx.is_finite() && cy.is_finite() => Ok((cx, cy)),
        _ => Err(ProjectionError::OutOfDomain { x, y, crs }),
    }
}
