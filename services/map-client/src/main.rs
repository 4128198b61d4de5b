//! Command-line client for the raster map API.
//!
//! Fetches the capabilities document to list available layers, and issues
//! GetMap requests, writing the encoded image to a file for viewing.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "map-client")]
#[command(about = "Client for the raster map API")]
struct Args {
    /// WMS endpoint URL
    #[arg(short, long, default_value = "http://localhost:5000/wms", env = "MAP_SERVER_URL")]
    server: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the layers the server offers
    Capabilities,

    /// Request a composited map image and write it to a file
    GetMap {
        /// Comma-separated layer names, bottom to top
        #[arg(long)]
        layers: String,

        /// Bounding box "minx,miny,maxx,maxy"; defaults to the first
        /// capabilities layer's bbox
        #[arg(long)]
        bbox: Option<String>,

        /// Output width in pixels
        #[arg(long, default_value = "800")]
        width: u32,

        /// Output height in pixels
        #[arg(long, default_value = "600")]
        height: u32,

        /// Output format: png, jpeg, or gif
        #[arg(long, default_value = "png")]
        format: String,

        /// File the image bytes are written to
        #[arg(short, long)]
        out: PathBuf,
    },
}

#[derive(Debug, Deserialize)]
struct CapabilitiesResponse {
    version: String,
    layers: Vec<LayerCapability>,
}

#[derive(Debug, Deserialize)]
struct LayerCapability {
    name: String,
    bbox: [f64; 4],
    width: u32,
    height: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Capabilities => capabilities(&args.server).await,
        Command::GetMap {
            layers,
            bbox,
            width,
            height,
            format,
            out,
        } => get_map(&args.server, &layers, bbox, width, height, &format, &out).await,
    }
}

async fn fetch_capabilities(server: &str) -> Result<CapabilitiesResponse> {
    let url = format!("{server}?REQUEST=GetCapabilities");
    let response = reqwest::get(&url)
        .await
        .with_context(|| format!("cannot reach {url}"))?;
    if !response.status().is_success() {
        bail!("server returned {} for GetCapabilities", response.status());
    }
    response
        .json::<CapabilitiesResponse>()
        .await
        .context("invalid capabilities document")
}

async fn capabilities(server: &str) -> Result<()> {
    let doc = fetch_capabilities(server).await?;
    println!("server version {} offers {} layer(s):", doc.version, doc.layers.len());
    for layer in &doc.layers {
        println!(
            "  {:<24} {}x{}  bbox [{}, {}, {}, {}]",
            layer.name,
            layer.width,
            layer.height,
            layer.bbox[0],
            layer.bbox[1],
            layer.bbox[2],
            layer.bbox[3]
        );
    }
    Ok(())
}

async fn get_map(
    server: &str,
    layers: &str,
    bbox: Option<String>,
    width: u32,
    height: u32,
    format: &str,
    out: &PathBuf,
) -> Result<()> {
    // Seed the viewport from the first advertised layer when no bbox is
    // given.
    let bbox = match bbox {
        Some(b) => b,
        None => {
            let doc = fetch_capabilities(server).await?;
            let first = doc
                .layers
                .first()
                .context("server offers no layers to derive a default bbox from")?;
            info!(layer = %first.name, "Using first layer's bbox as viewport");
            format!(
                "{},{},{},{}",
                first.bbox[0], first.bbox[1], first.bbox[2], first.bbox[3]
            )
        }
    };

    let url = format!(
        "{server}?REQUEST=GetMap&LAYERS={layers}&BBOX={bbox}&WIDTH={width}&HEIGHT={height}&FORMAT=image/{format}&SRS=&STYLES="
    );
    info!(url = %url, "Requesting map");

    let response = reqwest::get(&url).await.context("GetMap request failed")?;
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        bail!("server returned {status}: {body}");
    }

    let bytes = response.bytes().await?;
    tokio::fs::write(out, &bytes)
        .await
        .with_context(|| format!("cannot write {}", out.display()))?;
    info!(file = %out.display(), bytes = bytes.len(), "Map image written");
    Ok(())
}
