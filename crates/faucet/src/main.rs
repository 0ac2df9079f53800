//! Faucet service binary

use anyhow::bail;
use clap::Parser;
use drip_common::utils::config::load_config;
use drip_common::utils::logging::init_logging;
use drip_faucet::api::router;
use drip_faucet::{ClaimService, EthRpc, FaucetConfig, HttpRpcClient};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Faucet service CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server address
    #[arg(long)]
    server_addr: Option<String>,

    /// RPC URL
    #[arg(long)]
    rpc_url: Option<String>,

    /// Chain id the RPC endpoint must report
    #[arg(long)]
    chain_id: Option<u64>,

    /// Faucet contract address
    #[arg(long)]
    faucet_contract: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config: FaucetConfig = match &args.config {
        Some(path) => load_config(path)?,
        None => FaucetConfig::default(),
    };
    config.apply_overrides(|name| std::env::var(name).ok())?;

    // Override with CLI arguments
    if let Some(addr) = args.server_addr {
        config.server_addr = addr;
    }

    if let Some(rpc_url) = args.rpc_url {
        config.rpc_url = rpc_url;
    }

    if let Some(chain_id) = args.chain_id {
        config.chain_id = chain_id;
    }

    if let Some(contract) = args.faucet_contract {
        config.faucet_contract = contract;
    }

    if args.debug {
        config.logging.level = "debug".to_string();
    }

    init_logging(&config.logging)?;

    info!("Starting Drip Faucet Service v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Server address: {}", config.server_addr);
    info!("  RPC URL: {}", config.rpc_url);
    info!("  Chain id: {}", config.chain_id);
    info!("  Gas price: {} wei, gas limit: {}", config.gas_price, config.gas_limit);

    let rpc = HttpRpcClient::new(config.rpc_url.clone(), config.rpc_timeout())?;

    // The endpoint is fixed to one network; refuse to sign for another
    let remote_chain_id = rpc.chain_id().await?;
    if remote_chain_id != config.chain_id {
        bail!(
            "RPC endpoint {} reports chain id {}, expected {}",
            rpc.url(),
            remote_chain_id,
            config.chain_id
        );
    }

    let service = Arc::new(ClaimService::new(&config, Arc::new(rpc))?);
    info!("Faucet service initialized");

    let mut app = router(service).layer(TraceLayer::new_for_http());

    // Add CORS if enabled
    if config.cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        app = app.layer(cors);
        info!("CORS enabled");
    }

    // Start server
    let addr: SocketAddr = config.server_addr.parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down gracefully");
    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}
