//! Sample observability API.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!                 │                     SAMPLE API                       │
//!                 │                                                      │
//!  Client Request │  ┌─────────┐    ┌────────────┐    ┌──────────────┐  │
//!  ───────────────┼─▶│  http   │───▶│  handlers  │───▶│    faults    │  │
//!                 │  │ server  │    │            │    │ delay / fail │  │
//!                 │  └─────────┘    └─────┬──────┘    └──────────────┘  │
//!                 │                       │                              │
//!                 │                       ▼                              │
//!  Response       │                ┌────────────┐                        │
//!  ◀──────────────┼────────────────│   users    │                        │
//!                 │                └────────────┘                        │
//!                 │                                                      │
//!                 │  ┌────────────────────────────────────────────────┐ │
//!                 │  │ config │ observability (logs, metrics, OTLP)   │ │
//!                 │  │        │ lifecycle (signals, shutdown)         │ │
//!                 │  └────────────────────────────────────────────────┘ │
//!                 └──────────────────────────────────────────────────────┘
//! ```
//!
//! The OTLP providers run their own export threads with a blocking HTTP
//! client, so they are built before the Tokio runtime starts and flushed after
//! it stops.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use sample_api::config::{load_config, AppConfig};
use sample_api::http::HttpServer;
use sample_api::lifecycle::{wait_for_signal, Shutdown};
use sample_api::observability::{logging, OtlpPipeline, RequestMetrics};

#[derive(Parser)]
#[command(name = "sample-api")]
#[command(about = "Demo HTTP service with fault injection and telemetry", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Disable OTLP export.
    #[arg(long)]
    no_otlp: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if cli.no_otlp {
        config.observability.otlp.enabled = false;
    }

    let otlp = OtlpPipeline::build(&config.observability.otlp, &config.service.name)?;
    logging::init(&config.observability, otlp.as_ref().map(OtlpPipeline::tracer))?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Sample API");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        otlp_enabled = config.observability.otlp.enabled,
        seed = ?config.faults.seed,
        "Configuration loaded"
    );

    let mut metrics = RequestMetrics::new(&config.observability.histogram_buckets)?;
    if let Some(pipeline) = &otlp {
        metrics = metrics.with_meter(&pipeline.meter());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(serve(config, metrics));
    drop(runtime);

    if let Some(pipeline) = otlp {
        pipeline.shutdown();
    }

    tracing::info!("Shutdown complete");
    result
}

async fn serve(config: AppConfig, metrics: RequestMetrics) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));

    let server = HttpServer::new(config, metrics);
    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
