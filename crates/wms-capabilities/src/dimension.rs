//! Time dimension resolution.

use tracing::debug;
use wms_common::TimeConfig;

use crate::locator::LayerNode;
use crate::xml::Node;

const TIME_DIMENSION: &str = "time";

/// Build the time axis of `layer`, if it declares one with values.
pub fn resolve_time(layer: &LayerNode<'_>) -> Option<TimeConfig> {
    let node = layer.node();
    let (values, default_value) = if layer.wms_index().is_some() {
        wms_time_values(node)?
    } else {
        wmts_time_values(node)?
    };

    let config = TimeConfig::from_values(values, default_value);
    if config.is_none() {
        debug!(layer = %layer.id(), "Time dimension declares no values");
    }
    config
}

fn is_time(name: Option<&str>) -> bool {
    name.map_or(false, |name| name.trim().eq_ignore_ascii_case(TIME_DIMENSION))
}

/// Comma separated values of `Dimension name="time"`, or of the 1.1.1
/// `Extent name="time"` when the dimension carries none.
fn wms_time_values(node: Node<'_>) -> Option<(Vec<String>, Option<String>)> {
    let dimension = node
        .children("Dimension")
        .into_iter()
        .find(|dimension| is_time(dimension.attr("name")));
    let extent = node
        .children("Extent")
        .into_iter()
        .find(|extent| is_time(extent.attr("name")));

    let source = match (dimension, extent) {
        (Some(dimension), Some(extent)) if dimension.text().is_none() => extent,
        (Some(dimension), _) => dimension,
        (None, Some(extent)) => extent,
        (None, None) => return None,
    };

    let values = source
        .text()
        .map(split_values)
        .unwrap_or_default();
    let default_value = source
        .attr("default")
        .or_else(|| dimension.and_then(|dimension| dimension.attr("default")))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);
    Some((values, default_value))
}

fn split_values(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

/// `Value` elements of the dimension identified as `time`.
fn wmts_time_values(node: Node<'_>) -> Option<(Vec<String>, Option<String>)> {
    let dimension = node
        .children("Dimension")
        .into_iter()
        .find(|dimension| is_time(dimension.child_text("Identifier")))?;

    let values = dimension
        .children("Value")
        .into_iter()
        .filter_map(|value| value.text())
        .map(str::to_string)
        .collect();
    let default_value = dimension.child_text("Default").map(str::to_string);
    Some((values, default_value))
}
