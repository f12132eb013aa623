//! Authentication adapters: token signing and password hashing.

pub mod jwt;
pub mod password;

pub use jwt::{JwtTokenService, TOKEN_TTL_HOURS};
pub use password::Argon2PasswordHasher;
