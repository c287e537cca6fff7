//! Coordinate reference system transformations.
//!
//! Implements the projections of the CRS catalog from scratch without
//! external dependencies.

pub mod ellipsoid;
pub mod mercator;
pub mod swiss;
pub mod transform;

pub use ellipsoid::Ellipsoid;
pub use swiss::SwissGrid;
pub use transform::{reproject, reproject_bbox, ProjectionError};
