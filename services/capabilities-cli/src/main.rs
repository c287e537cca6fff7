//! Capabilities resolution command line tool.
//!
//! Reads a WMS or WMTS capabilities document from a file or URL and prints
//! the resolved layers as JSON on stdout. Logs go to stderr.

mod config;
mod fetch;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use url::Url;
use wms_capabilities::{parse, resolve_all_layers, resolve_layer, resolve_layer_strict};

#[derive(Parser, Debug)]
#[command(name = "capabilities")]
#[command(about = "Resolve the layers of a WMS/WMTS capabilities document")]
#[command(group(ArgGroup::new("source").required(true).args(["file", "url"])))]
struct Args {
    /// Capabilities document on disk
    #[arg(long)]
    file: Option<PathBuf>,

    /// GetCapabilities URL to fetch
    #[arg(long)]
    url: Option<Url>,

    /// URL the document is attributed to (defaults to --url or the file URL)
    #[arg(long)]
    origin_url: Option<Url>,

    /// Target CRS for extents, e.g. EPSG:2056
    #[arg(long, env = "CAPABILITIES_TARGET_CRS")]
    crs: Option<String>,

    /// Resolve a single top-level layer instead of all layers
    #[arg(short, long)]
    layer: Option<String>,

    /// Fail when --layer is not found
    #[arg(long, requires = "layer")]
    strict: bool,

    /// YAML file with resolve options
    #[arg(long, env = "CAPABILITIES_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args)?;

    let options = config::effective_options(args.config.as_deref(), args.crs.as_deref())?;

    let source = match (&args.file, &args.url) {
        (Some(path), _) => fetch::read_file(path, args.origin_url.clone())?,
        (None, Some(url)) => {
            let mut source = fetch::fetch_url(url, Duration::from_secs(args.timeout_secs)).await?;
            if let Some(origin) = &args.origin_url {
                source.origin_url = origin.clone();
            }
            source
        }
        (None, None) => anyhow::bail!("Either --file or --url is required"),
    };

    let doc = parse(&source.content, source.origin_url)?;
    info!(
        service = %doc.service_type(),
        version = %doc.version(),
        target_crs = %options.target_crs,
        "Parsed capabilities"
    );

    let output = match &args.layer {
        Some(layer_id) if args.strict => {
            serde_json::to_string_pretty(&resolve_layer_strict(&doc, layer_id, &options)?)
        }
        Some(layer_id) => {
            let layer = resolve_layer(&doc, layer_id, &options);
            if layer.is_none() {
                warn!(layer = %layer_id, "Layer not found among top-level layers");
            }
            serde_json::to_string_pretty(&layer)
        }
        None => serde_json::to_string_pretty(&resolve_all_layers(&doc, &options)),
    }
    .context("Failed to serialize layers")?;

    println!("{}", output);
    Ok(())
}

fn init_tracing(args: &Args) -> Result<()> {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if args.json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}
