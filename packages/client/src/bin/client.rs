//! Terminal chat client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-client -- --username alice --password password123
//! ```

use clap::Parser;
use hiroba_client::{ClientConfig, run_client};
use hiroba_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    // Initialize tracing (warn by default so logs do not interleave with chat)
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    let config = ClientConfig::parse();

    if let Err(e) = run_client(config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
