//! Client command line options.

use clap::Parser;

/// Terminal chat client
#[derive(Debug, Clone, Parser)]
#[command(name = "hiroba-client", version, about)]
pub struct ClientConfig {
    /// Base URL of the server
    #[arg(long, env = "HIROBA_SERVER", default_value = "http://127.0.0.1:3000")]
    pub server: String,

    #[arg(short, long, env = "HIROBA_USERNAME")]
    pub username: String,

    #[arg(short, long, env = "HIROBA_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Create the account before connecting
    #[arg(long)]
    pub register: bool,

    /// Number of history messages printed on connect
    #[arg(long, default_value_t = 20)]
    pub history: usize,
}
