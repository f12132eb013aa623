//! インメモリ実装（テストおよび永続化不要な起動用）

pub mod message;
pub mod user;

pub use message::InMemoryMessageRepository;
pub use user::InMemoryUserRepository;
