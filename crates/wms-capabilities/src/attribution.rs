//! Attribution resolution.
//!
//! Every layer ends up with exactly one [`Attribution`]. WMS walks the layer
//! and its ancestors before falling back to the service; WMTS reads the
//! service provider.

use tracing::{debug, warn};
use url::Url;
use wms_common::{Attribution, CapabilitiesError};

use crate::locator::LayerNode;
use crate::xml::Node;

/// Resolve the attribution of `layer`.
pub fn resolve_attribution(layer: &LayerNode<'_>) -> Attribution {
    if layer.wms_index().is_some() {
        wms_attribution(layer)
    } else {
        wmts_attribution(layer)
    }
}

fn wms_attribution(layer: &LayerNode<'_>) -> Attribution {
    let declared = layer
        .self_and_ancestors()
        .into_iter()
        .filter_map(|candidate| candidate.node().child("Attribution"))
        .find_map(usable_attribution);
    if let Some(attribution) = declared {
        return attribution;
    }

    // Service-level attribution never carries a link
    let doc = layer.document();
    match doc.service_title() {
        Some(title) => {
            debug!(layer = %layer.id(), "Using service title as attribution");
            Attribution::new(title, None)
        }
        None => {
            let host = doc.origin_host();
            let err = CapabilitiesError::UnresolvedAttributionSource {
                layer: layer.id().to_string(),
                fallback: host.clone(),
            };
            warn!(layer = %layer.id(), error = %err, "Falling back to origin host");
            Attribution::new(host, None)
        }
    }
}

/// Read an `Attribution` element, or `None` when it names nothing.
fn usable_attribution(node: Node<'_>) -> Option<Attribution> {
    let href = node
        .child("OnlineResource")
        .and_then(|resource| resource.attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty());
    let parsed = href.and_then(|href| Url::parse(href).ok().map(|url| (href, url)));

    let name = match node.child_text("Title") {
        Some(title) => title.to_string(),
        None => parsed.as_ref()?.1.host_str()?.to_string(),
    };
    let url = parsed.map(|(href, _)| href.to_string());
    Some(Attribution::new(name, url))
}

fn wmts_attribution(layer: &LayerNode<'_>) -> Attribution {
    let doc = layer.document();
    let provider = doc.service_provider();

    let name = provider
        .and_then(|provider| provider.child_text("ProviderName"))
        .map(str::to_string)
        .unwrap_or_else(|| {
            let host = doc.origin_host();
            let err = CapabilitiesError::UnresolvedAttributionSource {
                layer: layer.id().to_string(),
                fallback: host.clone(),
            };
            warn!(layer = %layer.id(), error = %err, "No provider name, falling back to origin host");
            host
        });
    let url = provider
        .and_then(|provider| provider.child("ProviderSite"))
        .and_then(|site| site.attr("href"))
        .map(str::to_string);

    Attribution::new(name, url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse;
    use crate::locator::find_layer;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing::Level;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Resolve with a subscriber that records only `WARN` and above.
    fn resolve_capturing_warnings(xml: &str, layer_id: &str) -> (Attribution, String) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let attribution =
            tracing::subscriber::with_default(subscriber, || resolve(xml, layer_id));
        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        (attribution, output)
    }

    fn resolve(xml: &str, layer_id: &str) -> Attribution {
        let doc = parse(
            xml.as_bytes(),
            Url::parse("https://wms.example.com/ows?REQUEST=GetCapabilities").unwrap(),
        )
        .unwrap();
        let layer = find_layer(&doc, layer_id).unwrap();
        resolve_attribution(&layer)
    }

    #[test]
    fn test_title_and_link() {
        let attribution = resolve(
            r#"<WMS_Capabilities version="1.3.0"><Capability><Layer>
            <Layer><Name>a</Name><Attribution><Title>Agency</Title>
            <OnlineResource href="https://agency.example.org/about"/></Attribution></Layer>
            </Layer></Capability></WMS_Capabilities>"#,
            "a",
        );
        assert_eq!(attribution.name, "Agency");
        assert_eq!(attribution.url.as_deref(), Some("https://agency.example.org/about"));
    }

    #[test]
    fn test_host_as_name() {
        let attribution = resolve(
            r#"<WMS_Capabilities version="1.3.0"><Capability><Layer>
            <Layer><Name>a</Name><Attribution>
            <OnlineResource href="https://agency.example.org/about"/></Attribution></Layer>
            </Layer></Capability></WMS_Capabilities>"#,
            "a",
        );
        assert_eq!(attribution.name, "agency.example.org");
        assert!(attribution.url.is_some());
    }

    #[test]
    fn test_title_with_relative_link_drops_url() {
        let attribution = resolve(
            r#"<WMS_Capabilities version="1.3.0"><Capability><Layer>
            <Layer><Name>a</Name><Attribution><Title>Agency</Title>
            <OnlineResource href="/about"/></Attribution></Layer>
            </Layer></Capability></WMS_Capabilities>"#,
            "a",
        );
        assert_eq!(attribution, Attribution::new("Agency", None));
    }

    #[test]
    fn test_unusable_attribution_continues_to_ancestor() {
        let attribution = resolve(
            r#"<WMS_Capabilities version="1.3.0"><Capability><Layer>
            <Attribution><Title>Root owner</Title></Attribution>
            <Layer><Name>a</Name><Attribution><OnlineResource href="not a url"/></Attribution></Layer>
            </Layer></Capability></WMS_Capabilities>"#,
            "a",
        );
        assert_eq!(attribution, Attribution::new("Root owner", None));
    }

    #[test]
    fn test_wmts_provider_site_unvalidated() {
        let attribution = resolve(
            r#"<Capabilities version="1.0.0"><ServiceProvider><ProviderName>Agency</ProviderName>
            <ProviderSite href="agency"/></ServiceProvider>
            <Contents><Layer><Identifier>a</Identifier></Layer></Contents></Capabilities>"#,
            "a",
        );
        assert_eq!(attribution, Attribution::new("Agency", Some("agency".to_string())));
    }

    #[test]
    fn test_wmts_without_provider() {
        let attribution = resolve(
            r#"<Capabilities version="1.0.0"><Contents><Layer><Identifier>a</Identifier></Layer></Contents></Capabilities>"#,
            "a",
        );
        assert_eq!(attribution, Attribution::new("wms.example.com", None));
    }

    #[test]
    fn test_host_fallback_is_warned() {
        let (attribution, logs) = resolve_capturing_warnings(
            r#"<WMS_Capabilities version="1.3.0"><Capability><Layer>
            <Layer><Name>a</Name></Layer>
            </Layer></Capability></WMS_Capabilities>"#,
            "a",
        );
        assert_eq!(attribution, Attribution::new("wms.example.com", None));
        assert!(logs.contains("WARN"), "{}", logs);
        assert!(logs.contains("Falling back to origin host"), "{}", logs);

        let (_, logs) = resolve_capturing_warnings(
            r#"<Capabilities version="1.0.0"><Contents><Layer><Identifier>a</Identifier></Layer></Contents></Capabilities>"#,
            "a",
        );
        assert!(logs.contains("falling back to origin host"), "{}", logs);
    }

    #[test]
    fn test_service_title_fallback_is_not_warned() {
        let (attribution, logs) = resolve_capturing_warnings(
            r#"<WMS_Capabilities version="1.3.0"><Service><Title>Service</Title></Service>
            <Capability><Layer><Layer><Name>a</Name></Layer></Layer></Capability></WMS_Capabilities>"#,
            "a",
        );
        assert_eq!(attribution, Attribution::new("Service", None));
        assert!(logs.is_empty(), "{}", logs);
    }
}
