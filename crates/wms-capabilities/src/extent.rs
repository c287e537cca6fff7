//! Layer extent resolution.
//!
//! Each protocol has its own ordered list of sources. The first source that
//! yields a box in the target CRS wins. A box declared in the target CRS is
//! returned untouched; everything else goes through
//! [`projection::reproject_bbox`].

use projection::reproject_bbox;
use tracing::{debug, warn};
use wms_common::{BoundingBox, CapabilitiesError, CrsCode};

use crate::locator::LayerNode;
use crate::xml::Node;

/// A box as declared in the document, with its raw CRS string.
#[derive(Debug, Clone)]
struct DeclaredBox {
    bbox: BoundingBox,
    crs: Option<String>,
}

impl DeclaredBox {
    fn resolved_crs(&self) -> Option<CrsCode> {
        self.crs.as_deref().and_then(CrsCode::resolve)
    }
}

/// Resolve the extent of `layer` in `target`.
///
/// Returns `None` when no source applies; this is logged, not an error.
pub fn resolve_extent(layer: &LayerNode<'_>, target: CrsCode) -> Option<BoundingBox> {
    let extent = if layer.wms_index().is_some() {
        wms_extent(layer, target)
    } else {
        wmts_extent(layer, target)
    };

    if extent.is_none() {
        let err = CapabilitiesError::UnresolvedExtent {
            layer: layer.id().to_string(),
            target,
        };
        warn!(layer = %layer.id(), target_crs = %target, error = %err, "Extent unresolved");
    }
    extent
}

// ============================================================================
// WMS
// ============================================================================

fn wms_extent(layer: &LayerNode<'_>, target: CrsCode) -> Option<BoundingBox> {
    let node = layer.node();

    if let Some(declared) = wms_declared_boxes(node)
        .into_iter()
        .find(|declared| declared.resolved_crs() == Some(target))
    {
        debug!(layer = %layer.id(), crs = %target, "Using declared bounding box");
        return Some(declared.bbox);
    }

    // Own geographic box first, then the nearest ancestor declaring one
    layer
        .self_and_ancestors()
        .into_iter()
        .enumerate()
        .find_map(|(depth, candidate)| {
            let geographic = wms_geographic_box(candidate.node())?;
            if depth > 0 {
                debug!(layer = %layer.id(), from = %candidate.id(), "Inheriting geographic bounding box");
            }
            Some(geographic)
        })
        .and_then(|geographic| project_box(layer, &geographic, CrsCode::WGS84, target))
}

fn wms_declared_boxes(node: Node<'_>) -> Vec<DeclaredBox> {
    node.children("BoundingBox")
        .into_iter()
        .filter_map(|bbox_node| {
            let bbox = BoundingBox::from_attributes(
                bbox_node.attr("minx")?,
                bbox_node.attr("miny")?,
                bbox_node.attr("maxx")?,
                bbox_node.attr("maxy")?,
            )
            .ok()?;
            let crs = bbox_node
                .attr("CRS")
                .or_else(|| bbox_node.attr("SRS"))
                .map(str::to_string);
            Some(DeclaredBox { bbox, crs })
        })
        .collect()
}

/// `EX_GeographicBoundingBox` (1.3.0) or `LatLonBoundingBox` (1.1.1).
fn wms_geographic_box(node: Node<'_>) -> Option<BoundingBox> {
    if let Some(geographic) = node.child("EX_GeographicBoundingBox") {
        return BoundingBox::from_attributes(
            geographic.child_text("westBoundLongitude")?,
            geographic.child_text("southBoundLatitude")?,
            geographic.child_text("eastBoundLongitude")?,
            geographic.child_text("northBoundLatitude")?,
        )
        .ok();
    }
    let lat_lon = node.child("LatLonBoundingBox")?;
    BoundingBox::from_attributes(
        lat_lon.attr("minx")?,
        lat_lon.attr("miny")?,
        lat_lon.attr("maxx")?,
        lat_lon.attr("maxy")?,
    )
    .ok()
}

// ============================================================================
// WMTS
// ============================================================================

fn wmts_extent(layer: &LayerNode<'_>, target: CrsCode) -> Option<BoundingBox> {
    let node = layer.node();
    let declared = wmts_declared_boxes(node);
    let matrix_set = linked_matrix_set(layer);
    let matrix_set_crs = matrix_set
        .and_then(|set| set.child_text("SupportedCRS"))
        .and_then(CrsCode::resolve);

    wmts_geographic_box(node)
        .and_then(|geographic| project_box(layer, &geographic, CrsCode::WGS84, target))
        .or_else(|| {
            let exact = declared.iter().find(|d| d.resolved_crs() == Some(target))?;
            debug!(layer = %layer.id(), crs = %target, "Using declared bounding box");
            Some(exact.bbox)
        })
        .or_else(|| match declared.as_slice() {
            [only] if only.crs.is_none() => {
                debug!(layer = %layer.id(), "Inferring bounding box CRS from tile matrix set");
                project_box(layer, &only.bbox, matrix_set_crs?, target)
            }
            _ => None,
        })
        .or_else(|| {
            let (first, crs) = declared
                .iter()
                .find_map(|d| d.resolved_crs().map(|crs| (d, crs)))?;
            debug!(layer = %layer.id(), crs = %crs, "Projecting first declared bounding box");
            project_box(layer, &first.bbox, crs, target)
        })
        .or_else(|| {
            let set = matrix_set?;
            let set_box = wmts_declared_boxes(set).into_iter().next()?;
            let crs = set_box.resolved_crs().or(matrix_set_crs)?;
            debug!(layer = %layer.id(), crs = %crs, "Using tile matrix set bounding box");
            project_box(layer, &set_box.bbox, crs, target)
        })
}

fn wmts_declared_boxes(node: Node<'_>) -> Vec<DeclaredBox> {
    node.children("BoundingBox")
        .into_iter()
        .filter_map(|bbox_node| {
            let bbox = corners(bbox_node)?;
            let crs = bbox_node.attr("crs").map(str::to_string);
            Some(DeclaredBox { bbox, crs })
        })
        .collect()
}

/// `ows:WGS84BoundingBox`, corners as (west south) and (east north).
fn wmts_geographic_box(node: Node<'_>) -> Option<BoundingBox> {
    corners(node.child("WGS84BoundingBox")?)
}

fn corners(bbox_node: Node<'_>) -> Option<BoundingBox> {
    BoundingBox::from_corners(
        bbox_node.child_text("LowerCorner")?,
        bbox_node.child_text("UpperCorner")?,
    )
    .ok()
}

/// First `TileMatrixSetLink` that names a set declared in `Contents`.
fn linked_matrix_set<'d>(layer: &LayerNode<'d>) -> Option<Node<'d>> {
    let doc = layer.document();
    layer
        .node()
        .children("TileMatrixSetLink")
        .into_iter()
        .filter_map(|link| link.child_text("TileMatrixSet"))
        .find_map(|identifier| doc.tile_matrix_set(identifier))
}

/// Identifiers of every `TileMatrixSetLink`.
pub(crate) fn linked_matrix_set_ids(layer: &LayerNode<'_>) -> Vec<String> {
    layer
        .node()
        .children("TileMatrixSetLink")
        .into_iter()
        .filter_map(|link| link.child_text("TileMatrixSet"))
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Projection
// ============================================================================

fn project_box(
    layer: &LayerNode<'_>,
    bbox: &BoundingBox,
    from: CrsCode,
    to: CrsCode,
) -> Option<BoundingBox> {
    match reproject_bbox(bbox, from, to) {
        Ok(projected) if projected.is_finite() => Some(projected),
        Ok(_) => {
            warn!(layer = %layer.id(), from = %from, to = %to, "Projected extent is not finite");
            None
        }
        Err(e) => {
            let err = CapabilitiesError::UnresolvedProjection {
                from: from.to_string(),
                to,
                message: e.to_string(),
            };
            warn!(layer = %layer.id(), error = %err, "Extent projection failed");
            None
        }
    }
}
