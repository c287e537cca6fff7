//! Layer lookup.
//!
//! WMTS layers are a flat list under `Contents`. WMS layers form a tree, but
//! single-layer lookup only looks at the direct children of the root layer;
//! deeper layers are reached through [`LayerNode::sublayers`].

use crate::document::{CapabilitiesDocument, LayerIndex, Sections};
use crate::xml::{Node, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LayerRef {
    Wms(LayerIndex),
    Wmts(NodeId),
}

/// A layer entry inside a parsed document.
#[derive(Debug, Clone, Copy)]
pub struct LayerNode<'d> {
    doc: &'d CapabilitiesDocument,
    layer: LayerRef,
}

impl<'d> LayerNode<'d> {
    pub fn document(&self) -> &'d CapabilitiesDocument {
        self.doc
    }

    /// The `Layer` element.
    pub fn node(&self) -> Node<'d> {
        match (self.layer, self.doc.sections()) {
            (LayerRef::Wms(index), Sections::Wms(wms)) => self.doc.node(wms.layers.get(index).node),
            (LayerRef::Wmts(id), _) | (LayerRef::Wms(id), _) => self.doc.node(id),
        }
    }

    /// `Name` (WMS) or `ows:Identifier` (WMTS).
    pub fn identifier(&self) -> Option<&'d str> {
        let tag = match self.layer {
            LayerRef::Wms(_) => "Name",
            LayerRef::Wmts(_) => "Identifier",
        };
        self.node().child_text(tag)
    }

    pub fn title(&self) -> Option<&'d str> {
        self.node().child_text("Title")
    }

    pub fn abstract_text(&self) -> Option<&'d str> {
        self.node().child_text("Abstract")
    }

    /// Identifier, else title, else empty.
    pub fn id(&self) -> &'d str {
        self.identifier().or_else(|| self.title()).unwrap_or("")
    }

    /// Whether `layer_id` names this layer.
    ///
    /// The title only counts when the layer has no identifier.
    pub fn matches(&self, layer_id: &str) -> bool {
        match self.identifier() {
            Some(identifier) => identifier == layer_id,
            None => self.title() == Some(layer_id),
        }
    }

    /// Enclosing WMS layer; WMTS layers have none.
    pub fn parent(&self) -> Option<LayerNode<'d>> {
        let index = self.wms_index()?;
        let Sections::Wms(wms) = self.doc.sections() else {
            return None;
        };
        wms.layers.get(index).parent.map(|parent| self.with_index(parent))
    }

    /// This layer followed by each enclosing layer, nearest first.
    pub fn self_and_ancestors(&self) -> Vec<LayerNode<'d>> {
        match (self.layer, self.doc.sections()) {
            (LayerRef::Wms(index), Sections::Wms(wms)) => wms
                .layers
                .lineage(index)
                .map(|index| self.with_index(index))
                .collect(),
            _ => vec![*self],
        }
    }

    /// Direct child layers in document order.
    pub fn sublayers(&self) -> Vec<LayerNode<'d>> {
        match (self.layer, self.doc.sections()) {
            (LayerRef::Wms(index), Sections::Wms(wms)) => wms
                .layers
                .get(index)
                .children
                .iter()
                .map(|&child| self.with_index(child))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub(crate) fn wms_index(&self) -> Option<LayerIndex> {
        match self.layer {
            LayerRef::Wms(index) => Some(index),
            LayerRef::Wmts(_) => None,
        }
    }

    pub(crate) fn with_index(&self, index: LayerIndex) -> LayerNode<'d> {
        LayerNode {
            doc: self.doc,
            layer: LayerRef::Wms(index),
        }
    }
}

impl PartialEq for LayerNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.layer == other.layer
    }
}

/// Layers that are candidates for lookup and for `resolve_all_layers`.
///
/// WMS: direct children of the root layer. WMTS: every `Contents/Layer`.
pub fn top_level_layers(doc: &CapabilitiesDocument) -> Vec<LayerNode<'_>> {
    match doc.sections() {
        Sections::Wms(wms) => wms
            .layers
            .top_level()
            .iter()
            .map(|&index| LayerNode {
                doc,
                layer: LayerRef::Wms(index),
            })
            .collect(),
        Sections::Wmts(wmts) => doc
            .node(wmts.contents)
            .children("Layer")
            .into_iter()
            .map(|node| LayerNode {
                doc,
                layer: LayerRef::Wmts(node.id()),
            })
            .collect(),
    }
}

/// Find a top-level layer by exact id.
pub fn find_layer<'d>(doc: &'d CapabilitiesDocument, layer_id: &str) -> Option<LayerNode<'d>> {
    top_level_layers(doc)
        .into_iter()
        .find(|layer| layer.matches(layer_id))
}

impl CapabilitiesDocument {
    /// Ids of the top-level layers, in document order.
    pub fn layer_ids(&self) -> Vec<String> {
        top_level_layers(self)
            .iter()
            .map(|layer| layer.id().to_string())
            .collect()
    }
}
