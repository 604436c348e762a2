use axum::Router;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use cookbook_backend::app_config;
use cookbook_backend::db;
use cookbook_backend::recipe_service::{recipe_routes, RecipeAccess};
use cookbook_model::MemoryRecipeStore;
use thiserror::Error as ThisError;

const DEFAULT_CONFIG_PATH: &str = "config/config.toml";
const DEFAULT_STATIC_DIR: &str = "frontend/dist";
const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, ThisError)]
enum Error {
    #[error("cookbook failed to bind server with io error: {0}")]
    IO(#[from] std::io::Error),
    #[error("cookbook failed to load config, Config Error {0}")]
    Confg(#[from] config::ConfigError),
    #[error("cookbook database error {0}")]
    DB(#[from] db::Error),
    #[error("cookbook config has no [db] section; pass --in-memory to run without a database")]
    MissingDbConfig,
}
type Result<T> = std::result::Result<T, Error>;

/// Serves the recipe catalog API and the built frontend.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML config with [http] and [db] sections
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,
    /// Keep recipes in memory instead of Postgres
    #[arg(long)]
    in_memory: bool,
    /// Directory holding the built frontend
    #[arg(long, default_value = DEFAULT_STATIC_DIR)]
    static_dir: PathBuf,
}

fn app(api: Router, static_dir: &Path) -> Router {
    let index = ServeFile::new(static_dir.join("index.html"));
    api.fallback_service(ServeDir::new(static_dir).fallback(index))
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let conf = app_config::AppConfig::load(&args.config)?;

    let api = if args.in_memory {
        info!("serving recipes from memory");
        recipe_routes(Arc::new(MemoryRecipeStore::new()))
    } else {
        let db_config = conf.db_config.as_ref().ok_or(Error::MissingDbConfig)?;
        let db_access = Arc::new(db::DBMigrator::new(db_config).await?.migrate().await?);
        recipe_routes(Arc::new(RecipeAccess::new(&db_access)))
    };

    let host_port = conf.http_config.connection_string();
    let listener = TcpListener::bind(&host_port).await?;
    info!("Successfully bound server to {}", host_port);

    axum::serve(listener, app(api, &args.static_dir))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(err) => {
                error!("Failed to install Ctrl+C handler: {err}");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                error!("Failed to install signal handler: {err}");
                std::future::pending::<()>().await
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
