//! ClinicHub server: wires the crates together and serves the HTTP API.

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use clinichub_api::{AppState, build_app};
use clinichub_core::config::AppConfig;
use clinichub_database::migration::run_migrations;
use clinichub_database::{DatabasePool, Stores};
use clinichub_storage::LocalFileStore;

/// ClinicHub HTTP server
#[derive(Debug, Parser)]
#[command(name = "clinichub-server", version, about)]
struct Args {
    /// Directory holding default.toml and the environment overlays
    #[arg(long, default_value = "config")]
    config_dir: String,

    /// Environment overlay to load
    #[arg(long, env = "CLINICHUB_ENV", default_value = "development")]
    env: String,

    /// Serve from in-memory stores; nothing is persisted
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match AppConfig::load(&args.config_dir, &args.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config, args.in_memory).await {
        error!(error = format!("{e:#}"), "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig, in_memory: bool) -> anyhow::Result<()> {
    info!(version = env!("CARGO_PKG_VERSION"), "Starting ClinicHub");

    // ── Stores ───────────────────────────────────────────────
    let (stores, pool) = if in_memory {
        warn!("Using in-memory stores; data is lost on shutdown");
        (Stores::in_memory(), None)
    } else {
        let pool = DatabasePool::connect(&config.database).await?;
        run_migrations(pool.pool()).await?;
        (Stores::postgres(pool.pool().clone()), Some(pool))
    };

    // ── File storage ─────────────────────────────────────────
    let uploads = LocalFileStore::new(&config.storage.upload_dir).await?;
    let backups = LocalFileStore::new(&config.storage.backup_dir).await?;

    // ── HTTP server ──────────────────────────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    let state = AppState::new(config, stores, Arc::new(uploads), Arc::new(backups))?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "ClinicHub server listening");

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        info!("Shutdown signal received, draining connections");
        let _ = shutdown_tx.send(true);
    });

    tokio::select! {
        result = server.into_future() => result.context("Server error")?,
        _ = async {
            if shutdown_rx.wait_for(|stopping| *stopping).await.is_ok() {
                tokio::time::sleep(grace).await;
            } else {
                std::future::pending::<()>().await;
            }
        } => {
            warn!(grace_seconds = grace.as_secs(), "Grace period elapsed, closing open connections");
        }
    }

    if let Some(pool) = pool {
        pool.close().await;
    }
    info!("ClinicHub server shut down");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
