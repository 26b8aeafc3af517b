use anyhow::Context;
use backend::store::SqliteStore;
use backend::{api, AppState, Stores};
use clap::Parser;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ServerConfig::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let stores = if config.memory_store {
        info!("[SERVER] using in-memory stores");
        Stores::memory()
    } else {
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .context("Invalid database URL")?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;
        let store = SqliteStore::connect(pool)
            .await
            .context("Failed to initialize database schema")?;
        info!("[SERVER] using database {}", config.database_url);
        Stores::sqlite(store)
    };

    let app = api::router(AppState::new(stores));
    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("[SERVER] listening on {}", config.bind);
    axum::serve(listener, app).await?;
    Ok(())
}
