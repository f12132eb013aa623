//! Per-connection session state machine.
//!
//! ```text
//! Connecting -> Authenticating -> Active -> Closed
//!      \______________\______________\______^
//! ```
//!
//! `Closed` is terminal and reachable from every other state.

use thiserror::Error;

use super::{ConnectionId, Username};

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// No token in the handshake
    AuthenticationRequired,
    /// Token failed verification (bad signature, expired, ...)
    InvalidToken,
    /// Client sent a close frame or the stream ended
    ClientClosed,
    /// Transport read or write failed
    TransportError,
    /// Server is shutting down
    ServerShutdown,
}

impl CloseReason {
    /// Human readable reason sent in the close frame
    pub fn as_str(&self) -> &'static str {
        match self {
            CloseReason::AuthenticationRequired => "authentication required",
            CloseReason::InvalidToken => "invalid token",
            CloseReason::ClientClosed => "client closed",
            CloseReason::TransportError => "transport error",
            CloseReason::ServerShutdown => "server shutting down",
        }
    }

    /// Whether the close is an authentication failure (policy violation)
    pub fn is_policy_violation(&self) -> bool {
        matches!(
            self,
            CloseReason::AuthenticationRequired | CloseReason::InvalidToken
        )
    }
}

/// Session lifecycle states
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Authenticating,
    Active {
        connection_id: ConnectionId,
        identity: Username,
    },
    Closed {
        reason: CloseReason,
    },
}

impl SessionState {
    fn name(&self) -> &'static str {
        match self {
            SessionState::Connecting => "connecting",
            SessionState::Authenticating => "authenticating",
            SessionState::Active { .. } => "active",
            SessionState::Closed { .. } => "closed",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid session transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

/// State of one transport connection
#[derive(Debug)]
pub struct Session {
    state: SessionState,
}

impl Session {
    /// A freshly accepted transport connection
    pub fn new() -> Self {
        Self {
            state: SessionState::Connecting,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// `Connecting -> Authenticating`
    pub fn begin_authentication(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Connecting => {
                self.state = SessionState::Authenticating;
                Ok(())
            }
            ref other => Err(SessionError::InvalidTransition {
                from: other.name(),
                to: "authenticating",
            }),
        }
    }

    /// `Authenticating -> Active`, binding the identity
    pub fn activate(
        &mut self,
        connection_id: ConnectionId,
        identity: Username,
    ) -> Result<(), SessionError> {
        match self.state {
            SessionState::Authenticating => {
                self.state = SessionState::Active {
                    connection_id,
                    identity,
                };
                Ok(())
            }
            ref other => Err(SessionError::InvalidTransition {
                from: other.name(),
                to: "active",
            }),
        }
    }

    /// Move to `Closed`.
    ///
    /// Returns the connection handle if the session was `Active`, so the caller
    /// can deregister it. Closing an already closed session is a no-op.
    pub fn close(&mut self, reason: CloseReason) -> Option<ConnectionId> {
        if self.is_closed() {
            return None;
        }
        match std::mem::replace(&mut self.state, SessionState::Closed { reason }) {
            SessionState::Active { connection_id, .. } => Some(connection_id),
            _ => None,
        }
    }

    /// Identity bound to the session, only while `Active`
    pub fn identity(&self) -> Option<&Username> {
        match &self.state {
            SessionState::Active { identity, .. } => Some(identity),
            _ => None,
        }
    }

    pub fn connection_id(&self) -> Option<ConnectionId> {
        match &self.state {
            SessionState::Active { connection_id, .. } => Some(*connection_id),
            _ => None,
        }
    }

    pub fn close_reason(&self) -> Option<CloseReason> {
        match &self.state {
            SessionState::Closed { reason } => Some(*reason),
            _ => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, SessionState::Closed { .. })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConnectionIdFactory;

    fn alice() -> Username {
        Username::new("alice".to_string()).unwrap()
    }

    #[test]
    fn test_session_happy_path() {
        // テスト項目: Connecting -> Authenticating -> Active -> Closed と遷移できる
        // given (前提条件):
        let mut session = Session::new();
        let connection_id = ConnectionIdFactory::generate();

        // when (操作):
        session.begin_authentication().unwrap();
        session.activate(connection_id, alice()).unwrap();

        // then (期待する結果):
        assert_eq!(session.identity(), Some(&alice()));
        assert_eq!(session.connection_id(), Some(connection_id));

        let closed = session.close(CloseReason::ClientClosed);
        assert_eq!(closed, Some(connection_id));
        assert!(session.is_closed());
        assert_eq!(session.close_reason(), Some(CloseReason::ClientClosed));
        assert_eq!(session.identity(), None);
    }

    #[test]
    fn test_session_close_from_authenticating() {
        // テスト項目: 認証中に閉じた場合は登録解除すべきハンドルがない
        let mut session = Session::new();
        session.begin_authentication().unwrap();

        let closed = session.close(CloseReason::InvalidToken);

        assert_eq!(closed, None);
        assert_eq!(
            session.state(),
            &SessionState::Closed {
                reason: CloseReason::InvalidToken
            }
        );
    }

    #[test]
    fn test_session_close_is_idempotent() {
        // テスト項目: 二度目の close は何もせず、最初の理由が保持される
        let mut session = Session::new();
        session.begin_authentication().unwrap();
        session
            .activate(ConnectionIdFactory::generate(), alice())
            .unwrap();

        assert!(session.close(CloseReason::TransportError).is_some());
        assert!(session.close(CloseReason::ClientClosed).is_none());
        assert_eq!(session.close_reason(), Some(CloseReason::TransportError));
    }

    #[test]
    fn test_session_cannot_activate_without_authenticating() {
        // テスト項目: 認証を経ずに Active へは遷移できない
        let mut session = Session::new();

        let result = session.activate(ConnectionIdFactory::generate(), alice());

        assert_eq!(
            result,
            Err(SessionError::InvalidTransition {
                from: "connecting",
                to: "active"
            })
        );
    }

    #[test]
    fn test_closed_session_is_terminal() {
        // テスト項目: Closed からは他の状態に遷移できない
        let mut session = Session::new();
        session.close(CloseReason::AuthenticationRequired);

        assert!(session.begin_authentication().is_err());
        assert!(
            session
                .activate(ConnectionIdFactory::generate(), alice())
                .is_err()
        );
    }

    #[test]
    fn test_close_reason_policy_violation() {
        // テスト項目: 認証失敗系の理由だけがポリシー違反として扱われる
        assert!(CloseReason::AuthenticationRequired.is_policy_violation());
        assert!(CloseReason::InvalidToken.is_policy_violation());
        assert!(!CloseReason::ClientClosed.is_policy_violation());
        assert_eq!(
            CloseReason::AuthenticationRequired.as_str(),
            "authentication required"
        );
        assert_eq!(CloseReason::InvalidToken.as_str(), "invalid token");
    }
}
