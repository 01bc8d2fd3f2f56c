//! tallyd: the judging service daemon.
//!
//! Single binary that assembles the service:
//! - Score store (Postgres, or SQLite via `DATABASE_URL`)
//! - REST API
//! - Optional contestant-totals refresh loop
//!
//! # Usage
//!
//! ```text
//! tallyd serve --port 5000 --db-name festival_judging
//! tallyd refresh-totals
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tokio::sync::watch;
use tracing::{info, warn};

use tally_store::{DbConfig, Store};

#[derive(Parser)]
#[command(name = "tallyd", about = "Dance competition judging daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Database settings, shared by every subcommand.
#[derive(Args)]
struct DbArgs {
    /// Database server host.
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    db_host: String,

    /// Database user.
    #[arg(long, env = "DB_USER", default_value = "root")]
    db_user: String,

    /// Database password.
    #[arg(long, env = "DB_PASS", default_value = "")]
    db_pass: String,

    /// Database name.
    #[arg(long, env = "DB_NAME", default_value = "festival_judging")]
    db_name: String,

    /// Full connection URL override (postgres:// or sqlite://).
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
}

impl DbArgs {
    fn to_config(&self) -> DbConfig {
        DbConfig {
            host: self.db_host.clone(),
            user: self.db_user.clone(),
            password: self.db_pass.clone(),
            database: self.db_name.clone(),
            url: self.database_url.clone(),
            ..DbConfig::default()
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service.
    Serve {
        /// Port to listen on.
        #[arg(long, env = "PORT", default_value_t = 5000)]
        port: u16,

        #[command(flatten)]
        db: DbArgs,

        /// Seconds between contestant-totals refreshes (0 disables the loop).
        #[arg(long, default_value_t = 0)]
        refresh_interval: u64,
    },

    /// Recompute the contestant totals once and exit.
    RefreshTotals {
        #[command(flatten)]
        db: DbArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,tallyd=debug,tally_store=debug,tally_api=debug"
                    .parse()
                    .unwrap()
            }),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            port,
            db,
            refresh_interval,
        } => serve(port, db.to_config(), refresh_interval).await,
        Command::RefreshTotals { db } => refresh_totals(db.to_config()).await,
    }
}

async fn serve(port: u16, config: DbConfig, refresh_interval: u64) -> anyhow::Result<()> {
    info!("judging service starting");

    let store = Store::connect(&config).await?;
    info!("score store connected");

    // ── Shutdown signal ────────────────────────────────────────

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Totals refresh loop ────────────────────────────────────

    let refresh_handle = if refresh_interval > 0 {
        let interval = Duration::from_secs(refresh_interval);
        let refresh_store = store.clone();
        let mut refresh_shutdown = shutdown_rx.clone();
        info!(interval_secs = refresh_interval, "totals refresh loop starting");
        Some(tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {
                        match refresh_store.refresh_contestant_totals().await {
                            Ok(count) => tracing::debug!(contestants = count, "totals refreshed"),
                            Err(e) => warn!(error = %e, "totals refresh failed"),
                        }
                    }
                    _ = refresh_shutdown.changed() => {
                        info!("totals refresh loop shutting down");
                        break;
                    }
                }
            }
        }))
    } else {
        None
    };

    // ── API server ─────────────────────────────────────────────

    let router = tally_api::build_router(store);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!(%addr, "API server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown on Ctrl-C.
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
        info!("shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    server.await?;

    // Wait for background tasks.
    if let Some(handle) = refresh_handle {
        let _ = handle.await;
    }

    info!("judging service stopped");
    Ok(())
}

async fn refresh_totals(config: DbConfig) -> anyhow::Result<()> {
    let store = Store::connect(&config).await?;
    let count = store.refresh_contestant_totals().await?;
    info!(contestants = count, "contestant totals recomputed");
    Ok(())
}
