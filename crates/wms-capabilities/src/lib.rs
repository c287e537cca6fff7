//! OGC WMS and WMTS capabilities resolution.
//!
//! Turns a capabilities document into owned [`ResolvedLayer`] descriptors:
//! - WMS 1.1.1 and WMS 1.3.0 (`WMT_MS_Capabilities`, `WMS_Capabilities`)
//! - WMTS 1.0.0 (`Capabilities`)
//!
//! ```no_run
//! use url::Url;
//! use wms_capabilities::{parse, resolve_all_layers, ResolveOptions};
//! use wms_common::CrsCode;
//!
//! # fn run(content: &[u8]) -> wms_common::CapabilitiesResult<()> {
//! let origin = Url::parse("https://wms.example.com/?REQUEST=GetCapabilities").unwrap();
//! let doc = parse(content, origin)?;
//! let layers = resolve_all_layers(&doc, &ResolveOptions::new(CrsCode::Epsg2056));
//! # Ok(())
//! # }
//! ```

pub mod attribution;
pub mod dimension;
pub mod document;
pub mod extent;
pub mod legend;
pub mod locator;
pub mod materialize;
pub mod xml;

pub use attribution::resolve_attribution;
pub use dimension::resolve_time;
pub use document::{parse, CapabilitiesDocument, LayerArena, Sections, WmsSections, WmtsSections};
pub use extent::resolve_extent;
pub use legend::resolve_legends;
pub use locator::{find_layer, top_level_layers, LayerNode};
pub use materialize::{resolve_all_layers, resolve_layer, resolve_layer_strict, ResolveOptions};
pub use xml::{Node, NodeId, XmlTree};

pub use wms_common::{CapabilitiesError, CapabilitiesResult, ResolvedLayer};
