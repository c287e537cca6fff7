//! Resolution options loaded from a YAML file.
//!
//! ```yaml
//! target_crs: EPSG:2056
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;
use wms_capabilities::ResolveOptions;
use wms_common::CrsCode;

/// Load options from `path`.
pub fn load_options(path: &Path) -> Result<ResolveOptions> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    let options: ResolveOptions = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;
    debug!(path = ?path, target_crs = %options.target_crs, "Loaded resolve options");
    Ok(options)
}

/// Combine the config file with the command line; `--crs` wins.
pub fn effective_options(config: Option<&Path>, crs: Option<&str>) -> Result<ResolveOptions> {
    let mut options = match config {
        Some(path) => load_options(path)?,
        None => ResolveOptions::default(),
    };
    if let Some(crs) = crs {
        options.target_crs = CrsCode::from_wms_string(crs)?;
    }
    Ok(options)
}
