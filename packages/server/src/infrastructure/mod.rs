//! Infrastructure layer: DTOs, persistence, authentication adapters and the
//! live connection registry.

pub mod auth;
pub mod dto;
pub mod registry;
pub mod repository;

pub use registry::InMemoryConnectionRegistry;
