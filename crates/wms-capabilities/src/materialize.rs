//! Layer materialization.
//!
//! Combines the resolvers into owned [`ResolvedLayer`] values. WMS subtrees
//! are assembled bottom-up from the layer arena without recursion.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;
use wms_common::{CapabilitiesError, CapabilitiesResult, CrsCode, ResolvedLayer, ServiceType};

use crate::attribution::resolve_attribution;
use crate::dimension::resolve_time;
use crate::document::{CapabilitiesDocument, LayerIndex, Sections};
use crate::extent::{linked_matrix_set_ids, resolve_extent};
use crate::legend::resolve_legends;
use crate::locator::{find_layer, top_level_layers, LayerNode};

/// Caller choices for resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// CRS the extents are expressed in
    pub target_crs: CrsCode,
}

impl ResolveOptions {
    pub fn new(target_crs: CrsCode) -> Self {
        Self { target_crs }
    }
}

/// Resolve one top-level layer and its sublayers.
///
/// Only direct children of the WMS root layer are found; see
/// [`find_layer`].
pub fn resolve_layer(
    doc: &CapabilitiesDocument,
    layer_id: &str,
    options: &ResolveOptions,
) -> Option<ResolvedLayer> {
    let layer = find_layer(doc, layer_id)?;
    Some(Materializer::new(doc, options).materialize(layer))
}

/// Like [`resolve_layer`], with a missing layer reported as
/// [`CapabilitiesError::NoLayerFound`].
pub fn resolve_layer_strict(
    doc: &CapabilitiesDocument,
    layer_id: &str,
    options: &ResolveOptions,
) -> CapabilitiesResult<ResolvedLayer> {
    resolve_layer(doc, layer_id, options)
        .ok_or_else(|| CapabilitiesError::NoLayerFound(layer_id.to_string()))
}

/// Resolve every top-level layer, each with its full WMS subtree.
pub fn resolve_all_layers(doc: &CapabilitiesDocument, options: &ResolveOptions) -> Vec<ResolvedLayer> {
    let materializer = Materializer::new(doc, options);
    let layers: Vec<ResolvedLayer> = top_level_layers(doc)
        .into_iter()
        .map(|layer| materializer.materialize(layer))
        .collect();
    debug!(
        service = %doc.service_type(),
        top_level = layers.len(),
        total = layers.iter().map(ResolvedLayer::count).sum::<usize>(),
        target_crs = %options.target_crs,
        "Resolved layers"
    );
    layers
}

/// Per-document values shared by every layer.
struct Materializer<'d> {
    doc: &'d CapabilitiesDocument,
    target_crs: CrsCode,
    base_url: String,
    get_map_formats: Vec<String>,
}

impl<'d> Materializer<'d> {
    fn new(doc: &'d CapabilitiesDocument, options: &ResolveOptions) -> Self {
        Self {
            doc,
            target_crs: options.target_crs,
            base_url: doc.base_url(),
            get_map_formats: doc.get_map_formats(),
        }
    }

    fn materialize(&self, layer: LayerNode<'d>) -> ResolvedLayer {
        let (Some(root), Sections::Wms(wms)) = (layer.wms_index(), self.doc.sections()) else {
            return self.resolve_one(layer);
        };

        // Breadth-first order puts every child after its parent, so walking
        // it backwards finishes children first.
        let order = wms.layers.subtree(root);
        let mut finished: HashMap<LayerIndex, ResolvedLayer> = HashMap::new();
        for &index in order.iter().skip(1).rev() {
            let resolved = self.assemble(layer.with_index(index), &wms.layers.get(index).children, &mut finished);
            finished.insert(index, resolved);
        }
        self.assemble(layer, &wms.layers.get(root).children, &mut finished)
    }

    fn assemble(
        &self,
        layer: LayerNode<'d>,
        children: &[LayerIndex],
        finished: &mut HashMap<LayerIndex, ResolvedLayer>,
    ) -> ResolvedLayer {
        let mut resolved = self.resolve_one(layer);
        resolved.sublayers = children
            .iter()
            .filter_map(|child| finished.remove(child))
            .collect();
        resolved
    }

    /// Resolve a single layer without its sublayers.
    fn resolve_one(&self, layer: LayerNode<'d>) -> ResolvedLayer {
        let node = layer.node();
        let service = self.doc.service_type();

        let id = layer.id().to_string();
        let name = layer.title().map(str::to_string).unwrap_or_else(|| id.clone());
        let abstract_text = layer.abstract_text().map(str::to_string);
        let legends = resolve_legends(&layer, &self.base_url);

        let (queryable, formats, tile_matrix_sets, tile_url_template) = match service {
            ServiceType::Wms => (
                node.attr("queryable")
                    .map_or(false, |flag| matches!(flag.trim(), "1" | "true")),
                self.get_map_formats.clone(),
                Vec::new(),
                None,
            ),
            ServiceType::Wmts => (
                !node.children("InfoFormat").is_empty(),
                node.children("Format")
                    .into_iter()
                    .filter_map(|format| format.text())
                    .map(str::to_string)
                    .collect(),
                linked_matrix_set_ids(&layer),
                node.children("ResourceURL")
                    .into_iter()
                    .find(|resource| resource.attr("resourceType") == Some("tile"))
                    .and_then(|resource| resource.attr("template"))
                    .map(str::to_string),
            ),
        };

        ResolvedLayer {
            name,
            has_description: abstract_text.is_some(),
            abstract_text,
            service,
            base_url: self.base_url.clone(),
            attributions: vec![resolve_attribution(&layer)],
            extent: resolve_extent(&layer, self.target_crs).map(|bbox| bbox.to_array()),
            has_legend: !legends.is_empty(),
            legends,
            time_config: resolve_time(&layer),
            queryable,
            formats,
            tile_matrix_sets,
            tile_url_template,
            sublayers: Vec::new(),
            id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse;
    use url::Url;

    const TREE: &str = r#"<WMS_Capabilities version="1.3.0"><Capability><Layer><Title>Root</Title>
        <Layer><Name>a</Name><Title>A</Title>
          <Layer><Name>a1</Name><Layer><Name>a1x</Name></Layer><Layer><Name>a1y</Name></Layer></Layer>
          <Layer><Title>a2</Title></Layer>
        </Layer>
        <Layer queryable="1"><Name>b</Name><Abstract>  </Abstract></Layer>
        </Layer></Capability></WMS_Capabilities>"#;

    fn doc() -> CapabilitiesDocument {
        parse(TREE.as_bytes(), Url::parse("https://wms.example.com/").unwrap()).unwrap()
    }

    #[test]
    fn test_subtree_order_preserved() {
        let doc = doc();
        let a = resolve_layer(&doc, "a", &ResolveOptions::default()).unwrap();
        let child_ids: Vec<&str> = a.sublayers.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(child_ids, vec!["a1", "a2"]);
        let grandchild_ids: Vec<&str> = a.sublayers[0].sublayers.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(grandchild_ids, vec!["a1x", "a1y"]);
        assert_eq!(a.count(), 5);
    }

    #[test]
    fn test_name_falls_back_to_id() {
        let doc = doc();
        let b = resolve_layer(&doc, "b", &ResolveOptions::default()).unwrap();
        assert_eq!(b.name, "b");
        assert!(b.queryable);
        assert_eq!(b.abstract_text, None);
        assert!(!b.has_description);
        assert_eq!(b.base_url, "https://wms.example.com/");
    }

    #[test]
    fn test_strict_lookup() {
        let doc = doc();
        let err = resolve_layer_strict(&doc, "a1", &ResolveOptions::default()).unwrap_err();
        assert!(matches!(err, CapabilitiesError::NoLayerFound(ref id) if id == "a1"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_options_deserialize() {
        let options: ResolveOptions = serde_json::from_str(r#"{"target_crs": "EPSG:2056"}"#).unwrap();
        assert_eq!(options.target_crs, CrsCode::Epsg2056);
        let defaults: ResolveOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(defaults.target_crs, CrsCode::WGS84);
    }
}
