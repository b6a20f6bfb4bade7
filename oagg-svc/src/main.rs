//! oagg-svc - Order Aggregation Service
//!
//! Serves `GET /sellers/:seller_id/order`, returning the seller's order
//! enriched with offer, product and image data fetched concurrently from the
//! configured upstream services.

use anyhow::{Context, Result};
use clap::Parser;
use oagg_common::config::{locate_config_file, resolve_config, ConfigOverrides, LoggingConfig};
use oagg_svc::clients::HttpUpstream;
use oagg_svc::{build_router, Aggregator, AggregatorConfig, AppState};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments (highest configuration priority)
#[derive(Debug, Parser)]
#[command(name = "oagg-svc", version, about = "Order aggregation service")]
struct Args {
    /// Path to TOML config file
    #[arg(long, env = "OAGG_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long)]
    bind_address: Option<String>,

    #[arg(long)]
    port: Option<u16>,

    #[arg(long)]
    log_level: Option<String>,

    /// Deadline for all enrichment branches, in milliseconds
    #[arg(long)]
    branch_budget_ms: Option<u64>,

    /// Abort slow branches at the deadline (true) or detach them (false)
    #[arg(long)]
    cancel_on_timeout: Option<bool>,

    #[arg(long)]
    order_url: Option<String>,

    #[arg(long)]
    offer_url: Option<String>,

    #[arg(long)]
    product_url: Option<String>,

    #[arg(long)]
    image_url: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            bind_address: self.bind_address.clone(),
            port: self.port,
            log_level: self.log_level.clone(),
            branch_budget_ms: self.branch_budget_ms,
            cancel_on_timeout: self.cancel_on_timeout,
            order_url: self.order_url.clone(),
            offer_url: self.offer_url.clone(),
            product_url: self.product_url.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

/// RUST_LOG wins over the configured level
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .context("Invalid log level")?;

    match &logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // CLI > ENV > TOML > compiled defaults
    let (env_overrides, env_notes) = ConfigOverrides::from_env();
    let overrides = args.overrides().or(env_overrides);
    let config = resolve_config(args.config.as_deref(), &overrides)?;

    init_tracing(&config.logging)?;

    info!(
        "Starting Order Aggregation Service (oagg-svc) v{}",
        env!("CARGO_PKG_VERSION")
    );
    for note in &env_notes {
        warn!("{}", note);
    }
    match locate_config_file(args.config.as_deref()) {
        Some(path) => info!("Config file: {}", path.display()),
        None => warn!("No config file found, using compiled defaults"),
    }
    info!(
        branch_budget_ms = config.aggregator.branch_budget_ms,
        cancel_on_timeout = config.aggregator.cancel_on_timeout,
        order_url = %config.upstream.order_url,
        offer_url = %config.upstream.offer_url,
        product_url = %config.upstream.product_url,
        image_url = %config.upstream.image_url,
        "Configuration resolved"
    );

    let ports = HttpUpstream::new(&config.upstream)
        .context("Failed to build upstream HTTP client")?
        .into_ports();
    let aggregator = Aggregator::new(ports, AggregatorConfig::from(&config.aggregator));

    let state = AppState::new(aggregator);
    let app = build_router(state);

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("oagg-svc listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
