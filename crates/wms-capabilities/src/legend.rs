//! Legend resolution.

use tracing::debug;
use url::Url;
use wms_common::Legend;

use crate::locator::LayerNode;
use crate::xml::Node;

const DEFAULT_LEGEND_FORMAT: &str = "image/png";
const SLD_VERSION: &str = "1.1.0";

/// Collect the legends of `layer`.
///
/// Every `Style/LegendURL` contributes one legend. When the WMS server
/// supports SLD, styles without a `LegendURL` get a `GetLegendGraphic`
/// request built on `base_url`.
pub fn resolve_legends(layer: &LayerNode<'_>, base_url: &str) -> Vec<Legend> {
    let is_wms = layer.wms_index().is_some();
    let styles = layer.node().children("Style");

    let mut legends: Vec<Legend> = Vec::new();
    let mut unillustrated: Vec<Option<&str>> = Vec::new();
    for style in &styles {
        let declared: Vec<Legend> = style
            .children("LegendURL")
            .into_iter()
            .filter_map(|legend_url| {
                if is_wms {
                    wms_legend(legend_url)
                } else {
                    wmts_legend(legend_url)
                }
            })
            .collect();
        if declared.is_empty() {
            unillustrated.push(style.child_text("Name"));
        }
        legends.extend(declared);
    }

    if is_wms && layer.document().supports_sld() {
        if styles.is_empty() {
            unillustrated.push(None);
        }
        for style in unillustrated {
            if let Some(legend) = legend_graphic(layer, base_url, style) {
                legends.push(legend);
            }
        }
    }

    dedupe(legends)
}

/// `LegendURL` with an `OnlineResource` child and a `Format` element.
fn wms_legend(node: Node<'_>) -> Option<Legend> {
    let url = node.child("OnlineResource")?.attr("href")?.trim();
    if url.is_empty() {
        return None;
    }
    Some(Legend {
        url: url.to_string(),
        format: node
            .child_text("Format")
            .unwrap_or(DEFAULT_LEGEND_FORMAT)
            .to_string(),
        width: parse_dimension(node.attr("width")),
        height: parse_dimension(node.attr("height")),
    })
}

/// `LegendURL` carrying everything as attributes.
fn wmts_legend(node: Node<'_>) -> Option<Legend> {
    let url = node.attr("href")?.trim();
    if url.is_empty() {
        return None;
    }
    Some(Legend {
        url: url.to_string(),
        format: node.attr("format").unwrap_or(DEFAULT_LEGEND_FORMAT).to_string(),
        width: parse_dimension(node.attr("width")),
        height: parse_dimension(node.attr("height")),
    })
}

fn parse_dimension(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|value| value.trim().parse().ok())
}

fn legend_graphic(layer: &LayerNode<'_>, base_url: &str, style: Option<&str>) -> Option<Legend> {
    let mut url = match Url::parse(base_url) {
        Ok(url) => url,
        Err(e) => {
            debug!(layer = %layer.id(), base_url, error = %e, "Cannot build GetLegendGraphic URL");
            return None;
        }
    };
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("SERVICE", "WMS")
            .append_pair("REQUEST", "GetLegendGraphic")
            .append_pair("VERSION", layer.document().version())
            .append_pair("FORMAT", DEFAULT_LEGEND_FORMAT)
            .append_pair("LAYER", layer.id())
            .append_pair("SLD_VERSION", SLD_VERSION);
        if let Some(style) = style {
            query.append_pair("STYLE", style);
        }
    }
    Some(Legend {
        url: url.to_string(),
        format: DEFAULT_LEGEND_FORMAT.to_string(),
        width: None,
        height: None,
    })
}

fn dedupe(legends: Vec<Legend>) -> Vec<Legend> {
    let mut unique: Vec<Legend> = Vec::with_capacity(legends.len());
    for legend in legends {
        if !unique.iter().any(|seen| seen.url == legend.url) {
            unique.push(legend);
        }
    }
    unique
}
