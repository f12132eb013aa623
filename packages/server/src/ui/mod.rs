//! WebSocket chat server: HTTP surface, sessions and process lifecycle.

pub mod error;
mod handler;
mod router;
mod runner;
mod signal;
pub mod state;

pub use router::build_router;
pub use runner::{Stores, run, seed_demo_users, serve};
