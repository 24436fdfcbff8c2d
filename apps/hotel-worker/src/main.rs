//! # Hotel Worker
//!
//! Runs the expiration sweeper against the configured database until
//! Ctrl-C or SIGTERM.
//!
//! ## Usage
//! ```bash
//! # Config from the platform default location (or defaults)
//! cargo run -p hotel-worker
//!
//! # Explicit config file
//! cargo run -p hotel-worker -- --config ./hotel.toml
//!
//! # One sweep, then exit (cron style)
//! cargo run -p hotel-worker -- --once
//! ```
//!
//! ## Log Levels
//! - `RUST_LOG=debug` - Show every tick
//! - Default: `info,sqlx=warn`

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hotel_booking::{EngineConfig, ExpirationSweeper};
use hotel_db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut once = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--once" => once = true,
            "--help" | "-h" => {
                println!("Hotel expiration sweeper");
                println!();
                println!("Usage: hotel-worker [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>  Config file (default: platform config dir)");
                println!("      --once           Run a single sweep and exit");
                println!("  -h, --help           Show this help");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let config = EngineConfig::load(config_path).context("Failed to load configuration")?;
    info!(
        db_path = %config.database.path.display(),
        hold_minutes = config.booking.hold_minutes,
        interval_secs = config.sweeper.interval_secs,
        "Configuration loaded"
    );

    let db = Database::new(config.db_config())
        .await
        .context("Failed to open database")?;

    let (sweeper, handle) = ExpirationSweeper::new(db.clone(), config.sweep_interval());

    if once {
        let cancelled = sweeper
            .sweep_once(Utc::now())
            .await
            .context("Sweep failed")?;
        info!(cancelled, "Single sweep complete");
        db.close().await;
        return Ok(());
    }

    let task = tokio::spawn(sweeper.run());

    shutdown_signal().await;

    handle
        .shutdown()
        .await
        .context("Failed to stop sweeper")?;
    task.await.context("Sweeper task panicked")?;

    db.close().await;
    info!("Worker shutdown complete");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Resolves on Ctrl-C, or SIGTERM on unix. If a handler can't be
/// installed that branch never resolves and the other one still works.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(?e, "Failed to install Ctrl+C handler");
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
                tracing::error!(?e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received, stopping sweeper...");
}
