//! MemeHub API server
//!
//! Serves the meme feed, voting, comments and the engagement leaderboard
//! over HTTP. Data lives in memory; pass `--seed` to start from a JSON
//! fixture shaped as `{ "memes": [...], "users": [...], ... }`.
//!
//! Usage:
//!   memehub-server --port 8080 --seed fixtures/demo.json

use anyhow::{Context, Result};
use clap::Parser;
use memehub_feed::{FeedConfig, MemeService};
use memehub_server::build_router;
use memehub_store::MemoryStore;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "memehub-server")]
#[command(about = "MemeHub feed and engagement API")]
struct Args {
    /// HTTP port to listen on
    #[arg(short, long, env = "MEMEHUB_PORT", default_value = "8080")]
    port: u16,

    /// JSON fixture to seed the store with
    #[arg(short, long, env = "MEMEHUB_SEED")]
    seed: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    info!("MemeHub server starting...");

    let store = match &args.seed {
        Some(path) => MemoryStore::load_json(path)
            .await
            .with_context(|| format!("failed to load seed fixture {}", path.display()))?,
        None => MemoryStore::new(),
    };
    let service = Arc::new(MemeService::new(Arc::new(store), FeedConfig::default()));

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, build_router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Ctrl+C handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("SIGTERM handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
