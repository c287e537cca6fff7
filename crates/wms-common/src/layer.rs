//! Resolved layer descriptors handed to map clients.

use serde::{Deserialize, Serialize};

use crate::TimeConfig;

/// Which OGC service a document or layer comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Wms,
    Wmts,
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceType::Wms => write!(f, "WMS"),
            ServiceType::Wmts => write!(f, "WMTS"),
        }
    }
}

/// Data ownership credit shown for a layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Attribution {
    pub name: String,
    pub url: Option<String>,
}

impl Attribution {
    pub fn new(name: impl Into<String>, url: Option<String>) -> Self {
        Self {
            name: name.into(),
            url,
        }
    }
}

/// A legend image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Legend {
    pub url: String,
    pub format: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// A layer resolved from a capabilities document.
///
/// Owns all of its data; nothing refers back into the source document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLayer {
    /// Identifier, falling back to the title
    pub id: String,

    /// Title, falling back to the id
    pub name: String,

    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,

    pub service: ServiceType,

    /// Base URL for map/tile requests
    pub base_url: String,

    pub attributions: Vec<Attribution>,

    /// `[min_x, min_y, max_x, max_y]` in the requested CRS
    pub extent: Option<[f64; 4]>,

    pub legends: Vec<Legend>,

    pub has_description: bool,

    pub has_legend: bool,

    pub time_config: Option<TimeConfig>,

    pub queryable: bool,

    pub formats: Vec<String>,

    /// Linked TileMatrixSet identifiers (WMTS only)
    pub tile_matrix_sets: Vec<String>,

    /// RESTful tile URL template (WMTS only)
    pub tile_url_template: Option<String>,

    /// Child layers (WMS only)
    pub sublayers: Vec<ResolvedLayer>,
}

impl ResolvedLayer {
    /// Depth-first search through this layer and its sublayers.
    pub fn find(&self, id: &str) -> Option<&ResolvedLayer> {
        if self.id == id {
            return Some(self);
        }
        self.sublayers.iter().find_map(|child| child.find(id))
    }

    /// Number of layers in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.sublayers.iter().map(ResolvedLayer::count).sum::<usize>()
    }
}
