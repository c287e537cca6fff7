//! Builders for synthetic capabilities documents.
//!
//! Tests describe only the part of a document they exercise (a layer, a
//! service section) and let the builder supply the envelope.
//!
//! # Example
//!
//! ```
//! use test_utils::WmsDocument;
//!
//! let xml = WmsDocument::new()
//!     .service("<Title>Test service</Title>")
//!     .layer("<Layer><Name>a</Name><Title>A</Title></Layer>")
//!     .build();
//! assert!(xml.contains("<Name>a</Name>"));
//! ```

/// Builder for a WMS 1.3.0 capabilities document.
#[derive(Debug, Clone, Default)]
pub struct WmsDocument {
    version: Option<String>,
    service: Option<String>,
    get_map_url: Option<String>,
    support_sld: bool,
    root_layer_extra: String,
    layers: Vec<String>,
}

impl WmsDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the root `version` attribute; `""` omits it.
    pub fn version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Inner XML of the `<Service>` element.
    pub fn service(mut self, inner: &str) -> Self {
        self.service = Some(inner.to_string());
        self
    }

    /// Declare a `GetMap` HTTP GET endpoint.
    pub fn get_map(mut self, url: &str) -> Self {
        self.get_map_url = Some(url.to_string());
        self
    }

    /// Advertise SLD support through `UserDefinedSymbolization`.
    pub fn support_sld(mut self) -> Self {
        self.support_sld = true;
        self
    }

    /// Extra XML placed inside the root layer before its children.
    pub fn root_layer_extra(mut self, xml: &str) -> Self {
        self.root_layer_extra.push_str(xml);
        self
    }

    /// Add a direct child of the root layer.
    pub fn layer(mut self, xml: &str) -> Self {
        self.layers.push(xml.to_string());
        self
    }

    pub fn build(&self) -> String {
        let version = match self.version.as_deref() {
            Some("") => String::new(),
            Some(v) => format!(r#" version="{}""#, v),
            None => r#" version="1.3.0""#.to_string(),
        };
        let service = self
            .service
            .as_ref()
            .map(|inner| format!("<Service>{}</Service>", inner))
            .unwrap_or_default();
        let get_map = self
            .get_map_url
            .as_ref()
            .map(|url| {
                format!(
                    r#"<Request><GetMap><Format>image/png</Format><Format>image/jpeg</Format><DCPType><HTTP><Get><OnlineResource xlink:href="{}"/></Get></HTTP></DCPType></GetMap></Request>"#,
                    url
                )
            })
            .unwrap_or_default();
        let sld = if self.support_sld {
            r#"<UserDefinedSymbolization SupportSLD="1" UserLayer="0" UserStyle="1" RemoteWFS="0"/>"#
        } else {
            ""
        };

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<WMS_Capabilities{version} xmlns="http://www.opengis.net/wms" xmlns:xlink="http://www.w3.org/1999/xlink">
{service}
<Capability>
{get_map}
{sld}
<Layer><Title>Root</Title>{root_extra}{layers}</Layer>
</Capability>
</WMS_Capabilities>"#,
            version = version,
            service = service,
            get_map = get_map,
            sld = sld,
            root_extra = self.root_layer_extra,
            layers = self.layers.concat(),
        )
    }
}

/// Builder for a WMTS 1.0.0 capabilities document.
#[derive(Debug, Clone, Default)]
pub struct WmtsDocument {
    provider: Option<String>,
    get_tile_url: Option<String>,
    layers: Vec<String>,
    matrix_sets: Vec<String>,
}

impl WmtsDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inner XML of `<ows:ServiceProvider>`.
    pub fn provider(mut self, inner: &str) -> Self {
        self.provider = Some(inner.to_string());
        self
    }

    /// Declare a KVP `GetTile` endpoint.
    pub fn get_tile(mut self, url: &str) -> Self {
        self.get_tile_url = Some(url.to_string());
        self
    }

    /// Add a `<Layer>` to `Contents`.
    pub fn layer(mut self, xml: &str) -> Self {
        self.layers.push(xml.to_string());
        self
    }

    /// Add a `<TileMatrixSet>` to `Contents`.
    pub fn matrix_set(mut self, xml: &str) -> Self {
        self.matrix_sets.push(xml.to_string());
        self
    }

    pub fn build(&self) -> String {
        let provider = self
            .provider
            .as_ref()
            .map(|inner| format!("<ows:ServiceProvider>{}</ows:ServiceProvider>", inner))
            .unwrap_or_default();
        let operations = self
            .get_tile_url
            .as_ref()
            .map(|url| {
                format!(
                    r#"<ows:OperationsMetadata><ows:Operation name="GetCapabilities"><ows:DCP><ows:HTTP><ows:Get xlink:href="https://tiles.example.com/capabilities"/></ows:HTTP></ows:DCP></ows:Operation><ows:Operation name="GetTile"><ows:DCP><ows:HTTP><ows:Get xlink:href="{}"/></ows:HTTP></ows:DCP></ows:Operation></ows:OperationsMetadata>"#,
                    url
                )
            })
            .unwrap_or_default();

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Capabilities version="1.0.0" xmlns="http://www.opengis.net/wmts/1.0" xmlns:ows="http://www.opengis.net/ows/1.1" xmlns:xlink="http://www.w3.org/1999/xlink">
<ows:ServiceIdentification><ows:Title>Tiles</ows:Title><ows:ServiceType>OGC WMTS</ows:ServiceType></ows:ServiceIdentification>
{provider}
{operations}
<Contents>{layers}{matrix_sets}</Contents>
</Capabilities>"#,
            provider = provider,
            operations = operations,
            layers = self.layers.concat(),
            matrix_sets = self.matrix_sets.concat(),
        )
    }
}
