//! Capabilities document model.
//!
//! [`parse`] validates the document root and records where the
//! protocol-specific sections live. For WMS it also indexes the nested
//! layer tree into a [`LayerArena`] so that ancestor walks are index hops.

use std::collections::VecDeque;

use tracing::debug;
use url::Url;
use wms_common::{CapabilitiesError, CapabilitiesResult, ServiceType};

use crate::xml::{Node, NodeId, XmlTree};

const WMS_1_3_ROOT: &str = "WMS_Capabilities";
const WMS_1_1_ROOT: &str = "WMT_MS_Capabilities";
const WMTS_ROOT: &str = "Capabilities";

/// Index of a WMS layer in the [`LayerArena`].
pub type LayerIndex = usize;

/// One WMS layer and its position in the layer tree.
#[derive(Debug, Clone)]
pub struct LayerEntry {
    pub node: NodeId,
    pub parent: Option<LayerIndex>,
    pub children: Vec<LayerIndex>,
}

/// The WMS layer tree, flattened breadth-first.
///
/// Index 0 is the root `Layer` when one exists; children always have a
/// larger index than their parent.
#[derive(Debug, Clone, Default)]
pub struct LayerArena {
    entries: Vec<LayerEntry>,
}

impl LayerArena {
    fn build(root_layer: Option<Node<'_>>) -> Self {
        let mut entries: Vec<LayerEntry> = Vec::new();
        let mut queue: VecDeque<(Node<'_>, Option<LayerIndex>)> =
            root_layer.into_iter().map(|node| (node, None)).collect();

        while let Some((node, parent)) = queue.pop_front() {
            let index = entries.len();
            entries.push(LayerEntry {
                node: node.id(),
                parent,
                children: Vec::new(),
            });
            if let Some(parent) = parent {
                entries[parent].children.push(index);
            }
            for child in node.children("Layer") {
                queue.push_back((child, Some(index)));
            }
        }

        Self { entries }
    }

    pub fn root(&self) -> Option<LayerIndex> {
        (!self.entries.is_empty()).then_some(0)
    }

    pub fn get(&self, index: LayerIndex) -> &LayerEntry {
        &self.entries[index]
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Direct children of the root layer.
    pub fn top_level(&self) -> &[LayerIndex] {
        self.root()
            .map(|root| self.entries[root].children.as_slice())
            .unwrap_or(&[])
    }

    /// `index` followed by each ancestor up to the root.
    pub fn lineage(&self, index: LayerIndex) -> impl Iterator<Item = LayerIndex> + '_ {
        std::iter::successors(Some(index), move |&current| self.entries[current].parent)
    }

    /// `index` and all of its descendants, breadth-first.
    pub fn subtree(&self, index: LayerIndex) -> Vec<LayerIndex> {
        let mut order = vec![index];
        let mut cursor = 0;
        while cursor < order.len() {
            order.extend_from_slice(&self.entries[order[cursor]].children);
            cursor += 1;
        }
        order
    }
}

/// Where the WMS sections live in the tree.
#[derive(Debug, Clone)]
pub struct WmsSections {
    pub service: Option<NodeId>,
    pub capability: NodeId,
    pub layers: LayerArena,
}

/// Where the WMTS sections live in the tree.
#[derive(Debug, Clone)]
pub struct WmtsSections {
    pub service_identification: Option<NodeId>,
    pub service_provider: Option<NodeId>,
    pub operations_metadata: Option<NodeId>,
    pub contents: NodeId,
}

#[derive(Debug, Clone)]
pub enum Sections {
    Wms(WmsSections),
    Wmts(WmtsSections),
}

/// A parsed, immutable capabilities document.
#[derive(Debug, Clone)]
pub struct CapabilitiesDocument {
    version: String,
    origin_url: Url,
    tree: XmlTree,
    sections: Sections,
}

/// Parse a capabilities document fetched from `origin_url`.
pub fn parse(content: &[u8], origin_url: Url) -> CapabilitiesResult<CapabilitiesDocument> {
    CapabilitiesDocument::parse(content, origin_url)
}

impl CapabilitiesDocument {
    /// Parse and validate a WMS or WMTS capabilities document.
    ///
    /// The root must be a known capabilities element carrying a `version`
    /// attribute, and the section holding the layers (`Capability` for
    /// WMS, `Contents` for WMTS) must be present.
    pub fn parse(content: &[u8], origin_url: Url) -> CapabilitiesResult<Self> {
        let tree = XmlTree::parse(content)?;
        let root = tree.root();

        let service = match root.name() {
            WMS_1_3_ROOT | WMS_1_1_ROOT => ServiceType::Wms,
            WMTS_ROOT => ServiceType::Wmts,
            other => {
                return Err(CapabilitiesError::InvalidCapabilities(format!(
                    "unrecognized root element <{}>",
                    other
                )))
            }
        };

        let version = root
            .attr("version")
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                CapabilitiesError::InvalidCapabilities(
                    "root element has no version attribute".to_string(),
                )
            })?
            .to_string();

        let sections = match service {
            ServiceType::Wms => Sections::Wms(wms_sections(root)?),
            ServiceType::Wmts => Sections::Wmts(wmts_sections(root)?),
        };

        let document = Self {
            version,
            origin_url,
            tree,
            sections,
        };
        debug!(
            service = %service,
            version = %document.version,
            origin = %document.origin_url,
            elements = document.tree.len(),
            "Parsed capabilities document"
        );
        Ok(document)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn origin_url(&self) -> &Url {
        &self.origin_url
    }

    pub fn service_type(&self) -> ServiceType {
        match self.sections {
            Sections::Wms(_) => ServiceType::Wms,
            Sections::Wmts(_) => ServiceType::Wmts,
        }
    }

    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    pub(crate) fn node(&self, id: NodeId) -> Node<'_> {
        self.tree.node(id)
    }

    /// Service title (`Service/Title` or `ServiceIdentification/Title`).
    pub fn service_title(&self) -> Option<&str> {
        self.service_section()
            .and_then(|service| service.child_text("Title"))
    }

    /// Service abstract.
    pub fn service_abstract(&self) -> Option<&str> {
        self.service_section()
            .and_then(|service| service.child_text("Abstract"))
    }

    fn service_section(&self) -> Option<Node<'_>> {
        let id = match &self.sections {
            Sections::Wms(wms) => wms.service,
            Sections::Wmts(wmts) => wmts.service_identification,
        };
        id.map(|id| self.node(id))
    }

    /// Host name of the origin URL, or the whole URL when it has no host.
    pub fn origin_host(&self) -> String {
        self.origin_url
            .host_str()
            .map(str::to_string)
            .unwrap_or_else(|| self.origin_url.to_string())
    }

    /// Origin URL without query or fragment, ending in `/`.
    pub fn fallback_base_url(&self) -> String {
        let mut url = self.origin_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url.to_string()
    }

    /// HTTP GET endpoint of `GetMap` (WMS) or `GetTile` (WMTS).
    pub fn operation_url(&self) -> Option<&str> {
        match &self.sections {
            Sections::Wms(wms) => self
                .node(wms.capability)
                .path(&["Request", "GetMap", "DCPType", "HTTP", "Get", "OnlineResource"])
                .and_then(|resource| resource.attr("href")),
            Sections::Wmts(wmts) => {
                let operations = self.node(wmts.operations_metadata?);
                operations
                    .children("Operation")
                    .into_iter()
                    .find(|op| op.attr("name") == Some("GetTile"))
                    .and_then(|op| op.path(&["DCP", "HTTP", "Get"]))
                    .and_then(|get| get.attr("href"))
            }
        }
        .map(str::trim)
        .filter(|href| !href.is_empty())
    }

    /// Base URL for map and tile requests.
    pub fn base_url(&self) -> String {
        self.operation_url()
            .map(str::to_string)
            .unwrap_or_else(|| self.fallback_base_url())
    }

    /// Image formats offered by WMS `GetMap`.
    pub(crate) fn get_map_formats(&self) -> Vec<String> {
        match &self.sections {
            Sections::Wms(wms) => self
                .node(wms.capability)
                .path(&["Request", "GetMap"])
                .map(|get_map| {
                    get_map
                        .children("Format")
                        .into_iter()
                        .filter_map(|format| format.text())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            Sections::Wmts(_) => Vec::new(),
        }
    }

    /// Whether the WMS server can render legends through SLD
    /// `GetLegendGraphic`.
    pub fn supports_sld(&self) -> bool {
        let Sections::Wms(wms) = &self.sections else {
            return false;
        };
        let capability = self.node(wms.capability);
        let declared = capability
            .child("UserDefinedSymbolization")
            .and_then(|symbolization| symbolization.attr("SupportSLD"))
            .map_or(false, |flag| matches!(flag.trim(), "1" | "true"));
        declared || capability.path(&["Request", "GetLegendGraphic"]).is_some()
    }

    /// Provider sub-tree of a WMTS document.
    pub(crate) fn service_provider(&self) -> Option<Node<'_>> {
        match &self.sections {
            Sections::Wmts(wmts) => wmts.service_provider.map(|id| self.node(id)),
            Sections::Wms(_) => None,
        }
    }

    /// A WMTS `TileMatrixSet` declared in `Contents`.
    pub(crate) fn tile_matrix_set(&self, identifier: &str) -> Option<Node<'_>> {
        let Sections::Wmts(wmts) = &self.sections else {
            return None;
        };
        self.node(wmts.contents)
            .children("TileMatrixSet")
            .into_iter()
            .find(|set| set.child_text("Identifier") == Some(identifier))
    }
}

fn wms_sections(root: Node<'_>) -> CapabilitiesResult<WmsSections> {
    let capability = root.child("Capability").ok_or_else(|| {
        CapabilitiesError::InvalidCapabilities("WMS document has no Capability element".to_string())
    })?;
    Ok(WmsSections {
        service: root.child("Service").map(|node| node.id()),
        capability: capability.id(),
        layers: LayerArena::build(capability.child("Layer")),
    })
}

fn wmts_sections(root: Node<'_>) -> CapabilitiesResult<WmtsSections> {
    let contents = root.child("Contents").ok_or_else(|| {
        CapabilitiesError::InvalidCapabilities("WMTS document has no Contents element".to_string())
    })?;
    Ok(WmtsSections {
        service_identification: root.child("ServiceIdentification").map(|node| node.id()),
        service_provider: root.child("ServiceProvider").map(|node| node.id()),
        operations_metadata: root.child("OperationsMetadata").map(|node| node.id()),
        contents: contents.id(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("https://wms.example.com/mapserv?SERVICE=WMS&REQUEST=GetCapabilities").unwrap()
    }

    const NESTED: &str = r#"<WMS_Capabilities version="1.3.0">
        <Capability>
          <Layer><Title>root</Title>
            <Layer><Name>a</Name>
              <Layer><Name>a1</Name><Layer><Name>a1x</Name></Layer></Layer>
            </Layer>
            <Layer><Name>b</Name></Layer>
          </Layer>
        </Capability>
      </WMS_Capabilities>"#;

    #[test]
    fn test_missing_version_is_invalid() {
        let err = parse(b"<WMS_Capabilities><Capability/></WMS_Capabilities>", origin()).unwrap_err();
        assert!(matches!(err, CapabilitiesError::InvalidCapabilities(_)));
    }

    #[test]
    fn test_unknown_root_is_invalid() {
        let err = parse(br#"<ServiceExceptionReport version="1.3.0"/>"#, origin()).unwrap_err();
        assert!(err.to_string().contains("ServiceExceptionReport"));
    }

    #[test]
    fn test_missing_sections_are_invalid() {
        assert!(parse(br#"<WMS_Capabilities version="1.3.0"/>"#, origin()).is_err());
        assert!(parse(br#"<Capabilities version="1.0.0"/>"#, origin()).is_err());
    }

    #[test]
    fn test_layer_arena_shape() {
        let doc = parse(NESTED.as_bytes(), origin()).unwrap();
        let Sections::Wms(wms) = doc.sections() else {
            panic!("expected WMS");
        };
        let arena = &wms.layers;
        assert_eq!(arena.len(), 5);
        assert_eq!(arena.top_level().len(), 2);

        let deepest = *arena.subtree(0).last().unwrap();
        assert_eq!(doc.node(arena.get(deepest).node).child_text("Name"), Some("a1x"));
        assert_eq!(arena.lineage(deepest).count(), 4);
        assert_eq!(arena.lineage(deepest).last(), Some(0));
    }

    #[test]
    fn test_fallback_base_url_drops_query() {
        let doc = parse(NESTED.as_bytes(), origin()).unwrap();
        assert_eq!(doc.fallback_base_url(), "https://wms.example.com/mapserv/");
        assert_eq!(doc.base_url(), "https://wms.example.com/mapserv/");
        assert_eq!(doc.origin_host(), "wms.example.com");

        let bare = parse(
            NESTED.as_bytes(),
            Url::parse("https://wms.example.com?REQUEST=GetCapabilities").unwrap(),
        )
        .unwrap();
        assert_eq!(bare.fallback_base_url(), "https://wms.example.com/");
    }

    #[test]
    fn test_wms_1_1_root_accepted() {
        let doc = parse(
            br#"<WMT_MS_Capabilities version="1.1.1"><Capability/></WMT_MS_Capabilities>"#,
            origin(),
        )
        .unwrap();
        assert_eq!(doc.version(), "1.1.1");
        assert_eq!(doc.service_type(), ServiceType::Wms);
        assert!(!doc.supports_sld());
    }
}
