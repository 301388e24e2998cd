//! pediad: Pedia tool daemon.
//!
//! Exposes the `pedia_list` and `pedia_detail` tools over http, sse or stdio.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pedia::server::http::{http_router, serve, sse_router};
use pedia::server::stdio::serve_stdio;
use pedia::server::{Config, Secrets, ToolServer, Transport};

/// Pedia daemon: cached encyclopedia lookup tools.
#[derive(Parser)]
#[command(name = "pediad")]
#[command(version = pedia::PKG_VERSION)]
#[command(about = "Pedia encyclopedia tool server")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Transport: http, sse or stdio.
    #[arg(long)]
    transport: Option<Transport>,

    /// Bind host for http/sse.
    #[arg(long)]
    host: Option<String>,

    /// Bind port for http/sse.
    #[arg(long)]
    port: Option<u16>,

    /// Endpoint path in http mode.
    #[arg(long)]
    path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();

    // stdout belongs to the stdio transport
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(transport) = args.transport {
        config.server.transport = transport;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(path) = args.path {
        config.server.path = path;
    }

    let api_key = Secrets::load()?.api_key();
    if api_key.is_none() {
        warn!("PEDIA_API_KEY is not set; tool calls will answer MISSING_API_KEY");
    }

    let tools = config.builder(api_key).build()?;
    let server = Arc::new(ToolServer::new(tools));

    info!(
        version = pedia::PKG_VERSION,
        transport = %config.server.transport,
        ttl_secs = config.cache.ttl_secs,
        "pediad starting"
    );

    match config.server.transport {
        Transport::Http => {
            let router = http_router(server, &config.server.path);
            serve(router, &config.server.address()).await?;
        }
        Transport::Sse => {
            serve(sse_router(server), &config.server.address()).await?;
        }
        Transport::Stdio => serve_stdio(&server).await?,
    }

    Ok(())
}
