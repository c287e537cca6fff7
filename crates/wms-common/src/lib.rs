//! Common types shared by the capabilities crates.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod layer;
pub mod time;

pub use bbox::BoundingBox;
pub use crs::{CrsCode, CrsParseError};
pub use error::{CapabilitiesError, CapabilitiesResult};
pub use layer::{Attribution, Legend, ResolvedLayer, ServiceType};
pub use time::{DateRange, TimeConfig, TimeEntry, TimeYear};
