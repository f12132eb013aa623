//! Server startup and runtime errors.

use thiserror::Error;

use crate::{domain::RepositoryError, usecase::AuthError};

#[derive(Debug, Error)]
pub enum ServerError {
    /// The message or credential store could not be opened
    #[error("failed to open store: {0}")]
    Store(#[from] RepositoryError),

    #[error("failed to seed demo users: {0}")]
    Seed(#[from] AuthError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}
