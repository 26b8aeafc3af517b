use clap::Parser;
use std::net::SocketAddr;

/// Live chess session server
#[derive(Parser, Debug, Clone)]
#[command(name = "livechess", version, about)]
pub struct ServerConfig {
    /// Address the HTTP and WebSocket listener binds to
    #[arg(long, env = "LIVECHESS_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// SQLite connection string
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:livechess.db")]
    pub database_url: String,

    #[arg(long, env = "LIVECHESS_DB_MAX_CONNECTIONS", default_value_t = 5)]
    pub db_max_connections: u32,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, env = "LIVECHESS_LOG", default_value = "info")]
    pub log_level: String,

    /// Keep users, tokens and games in memory instead of SQLite
    #[arg(long, env = "LIVECHESS_MEMORY_STORE")]
    pub memory_store: bool,
}
