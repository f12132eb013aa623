//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod connect_session;
pub mod disconnect_session;
pub mod error;
pub mod fetch_history;
pub mod list_users;
pub mod login;
pub mod register_user;
pub mod send_message;

pub use connect_session::{ActiveConnection, ConnectSessionUseCase};
pub use disconnect_session::DisconnectSessionUseCase;
pub use error::{AuthError, ConnectError, SendMessageError};
pub use fetch_history::FetchHistoryUseCase;
pub use list_users::ListUsersUseCase;
pub use login::{IssuedToken, LoginUseCase};
pub use register_user::RegisterUserUseCase;
pub use send_message::{SendMessageUseCase, SendOutcome};
