//! Domain layer for the chat application.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod connection;
pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod service;
pub mod session;
pub mod value_object;

pub use connection::Connection;
pub use entity::{ChatMessage, DEFAULT_HISTORY_CAPACITY, MessageHistory, User};
pub use error::{DeliveryError, PasswordHashError, RepositoryError, TokenError, ValueObjectError};
pub use factory::ConnectionIdFactory;
pub use repository::{BroadcastReport, ConnectionRegistry, MessageRepository, UserRepository};
pub use service::{PasswordHasher, TokenService};
pub use session::{CloseReason, Session, SessionError, SessionState};
pub use value_object::{ConnectionId, MessageText, Timestamp, Username};
