mod config;
mod error;
mod handlers;
mod metrics;
mod response;
mod server;
mod validate;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use config::ServerConfig;
use server::TuskServer;
use tusk_store_sqlite::SqliteStore;

#[derive(Parser)]
#[command(name = "tusk-server")]
#[command(about = "Task manager REST API server")]
struct Cli {
    /// Database URL (sqlite://path/to/db.db or sqlite::memory:)
    #[arg(
        long,
        global = true,
        env = "DATABASE_URL",
        default_value = "sqlite://tusk.db"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server
    Serve {
        /// Listen address
        #[arg(long, default_value = "0.0.0.0:8080")]
        addr: String,
    },
}

async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");

    tokio::select! {
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
    }
}

async fn serve(database_url: &str, addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    let store = Arc::new(SqliteStore::open(database_url).await?);
    let server = TuskServer::new(store, config);

    let metrics_handle = metrics::init_metrics();
    let app = handlers::router(server, metrics_handle);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("tusk-server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { addr } => serve(&cli.database_url, &addr).await,
    }
}
