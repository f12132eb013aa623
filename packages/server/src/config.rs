//! Server configuration (command line flags with environment fallbacks).

use clap::Parser;

use crate::domain::DEFAULT_HISTORY_CAPACITY;

/// Signing secret used when `JWT_SECRET` is not set. Only fit for development.
pub const DEV_JWT_SECRET: &str = "hiroba-dev-secret-change-me";

/// `--database-url` value that selects the in-memory stores
pub const IN_MEMORY_DATABASE: &str = "memory";

/// Real-time chat relay server
#[derive(Debug, Clone, Parser)]
#[command(name = "hiroba-server", version, about)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// SQLite URL for the message and credential stores, or `memory`
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://hiroba.db")]
    pub database_url: String,

    /// HMAC secret for identity tokens
    #[arg(long, env = "JWT_SECRET", default_value = DEV_JWT_SECRET, hide_env_values = true)]
    pub jwt_secret: String,

    /// Number of messages kept in history
    #[arg(
        long,
        env = "HISTORY_CAPACITY",
        default_value_t = DEFAULT_HISTORY_CAPACITY,
        value_parser = parse_capacity
    )]
    pub history_capacity: usize,

    /// Create the demo users alice and bob if they do not exist
    #[arg(long, env = "SEED_DEMO_USERS")]
    pub seed_demo_users: bool,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn uses_in_memory_store(&self) -> bool {
        self.database_url == IN_MEMORY_DATABASE
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

fn parse_capacity(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("history capacity must be at least 1".to_string()),
        Ok(capacity) => Ok(capacity),
        Err(e) => Err(e.to_string()),
    }
}
