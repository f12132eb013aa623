//! Live connection handle held by the connection registry.

use tokio::sync::mpsc::{self, error::TrySendError};

use super::{error::DeliveryError, value_object::Username};

/// Outbound half of one authenticated transport session.
///
/// Frames are queued on a bounded channel drained by the connection's writer
/// task. `send` never waits: a full queue means the client is not keeping up.
#[derive(Debug, Clone)]
pub struct Connection {
    identity: Username,
    sender: mpsc::Sender<String>,
}

impl Connection {
    /// Wrap an existing outbound channel
    pub fn new(identity: Username, sender: mpsc::Sender<String>) -> Self {
        Self { identity, sender }
    }

    /// Create a connection together with the receiver its writer task drains
    pub fn channel(identity: Username, buffer: usize) -> (Self, mpsc::Receiver<String>) {
        let (sender, receiver) = mpsc::channel(buffer);
        (Self::new(identity, sender), receiver)
    }

    pub fn identity(&self) -> &Username {
        &self.identity
    }

    /// Queue a serialized frame without blocking
    pub fn send(&self, frame: String) -> Result<(), DeliveryError> {
        self.sender.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::Full,
            TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }

    pub fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }
}
