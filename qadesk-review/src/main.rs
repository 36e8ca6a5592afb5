//! qadesk-review - record review service and maintenance commands
//!
//! `serve` (the default) runs the web UI. `bulk-skip` and `release-locks`
//! operate on the database directly and exit.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use qadesk_common::config::{resolve_database_url, CliOverrides, ServiceConfig};
use qadesk_common::db::{init_database, Queue};
use qadesk_review::{build_router, db, AppState};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for qadesk-review
#[derive(Parser, Debug)]
#[command(name = "qadesk-review")]
#[command(about = "Record review service for the QA desk")]
#[command(version)]
struct Args {
    /// Config file (default: <config dir>/qadesk/config.toml)
    #[arg(long, global = true, env = "QADESK_CONFIG")]
    config: Option<PathBuf>,

    /// Database URL, e.g. sqlite:///var/lib/qadesk/qadesk.db
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the review web service (default)
    Serve {
        /// Listen address (default: 127.0.0.1:8000)
        #[arg(long)]
        bind: Option<String>,

        /// Key for signing session cookies, at least 16 bytes
        #[arg(long)]
        session_secret: Option<String>,
    },

    /// Mark every record with one of the given numbers as skipped
    BulkSkip {
        /// Record numbers to skip
        #[arg(required = true)]
        numbers: Vec<String>,

        /// Queue to operate on (qa or problem)
        #[arg(long, default_value = "qa")]
        queue: Queue,
    },

    /// Clear every claim in a queue
    ReleaseLocks {
        /// Queue to operate on (qa or problem)
        #[arg(long, default_value = "qa")]
        queue: Queue,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "qadesk_review=info,qadesk_common=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting qadesk-review v{}", env!("CARGO_PKG_VERSION"));

    let mut overrides = CliOverrides {
        database_url: args.database_url,
        config_file: args.config,
        ..Default::default()
    };

    match args.command.unwrap_or(Command::Serve {
        bind: None,
        session_secret: None,
    }) {
        Command::Serve {
            bind,
            session_secret,
        } => {
            overrides.bind = bind;
            overrides.session_secret = session_secret;
            serve(&overrides).await
        }
        Command::BulkSkip { numbers, queue } => {
            let url = resolve_database_url(&overrides)?;
            let pool = init_database(&url)
                .await
                .context("Failed to open database")?;
            let count = db::bulk_skip(&pool, queue, &numbers).await?;
            println!("Marked {} record(s) in {} as skipped", count, queue);
            Ok(())
        }
        Command::ReleaseLocks { queue } => {
            let url = resolve_database_url(&overrides)?;
            let pool = init_database(&url)
                .await
                .context("Failed to open database")?;
            let count = db::release_locks(&pool, queue).await?;
            println!("Released {} claim(s) in {}", count, queue);
            Ok(())
        }
    }
}

async fn serve(overrides: &CliOverrides) -> Result<()> {
    let config = ServiceConfig::resolve(overrides).context("Invalid configuration")?;
    info!("Configuration: {:?}", config);

    let pool = init_database(&config.database_url)
        .await
        .context("Failed to open database")?;

    let state = AppState::new(pool, config.session_secret.as_str());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;
    info!("qadesk-review listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
