//! Loading capabilities documents from disk or over HTTP.
//!
//! Failures are returned to the caller as is; nothing is retried or cached.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

/// A document together with the URL it is attributed to.
#[derive(Debug)]
pub struct Source {
    pub content: Vec<u8>,
    pub origin_url: Url,
}

/// Fetch a document with a single GET request.
pub async fn fetch_url(url: &Url, timeout: Duration) -> Result<Source> {
    let client = Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(30))
        .user_agent(concat!("capabilities-cli/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")?;

    info!(url = %url, "Fetching capabilities");
    let response = client
        .get(url.clone())
        .send()
        .await
        .context("HTTP request failed")?
        .error_for_status()
        .context("Server returned an error status")?;
    let content = response
        .bytes()
        .await
        .context("Error reading response body")?;
    debug!(bytes = content.len(), "Fetched capabilities");

    Ok(Source {
        content: content.to_vec(),
        origin_url: url.clone(),
    })
}

/// Read a document from disk.
///
/// Without an explicit origin the document is attributed to its `file://`
/// URL.
pub fn read_file(path: &Path, origin_url: Option<Url>) -> Result<Source> {
    let content =
        std::fs::read(path).with_context(|| format!("Failed to read capabilities file: {:?}", path))?;
    let origin_url = match origin_url {
        Some(url) => url,
        None => file_url(path)?,
    };
    Ok(Source {
        content,
        origin_url,
    })
}

fn file_url(path: &Path) -> Result<Url> {
    let absolute = path
        .canonicalize()
        .with_context(|| format!("Failed to resolve path: {:?}", path))?;
    Url::from_file_path(&absolute)
        .map_err(|_| anyhow::anyhow!("Cannot express {:?} as a file URL", absolute))
}
