//! Argon2id password hashing.

use argon2::{
    Argon2,
    password_hash::{
        self, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use crate::domain::{PasswordHashError, PasswordHasher};

/// Argon2id with the crate's default parameters; hashes are PHC strings
#[derive(Default)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordHashError::Hash(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| PasswordHashError::MalformedHash(e.to_string()))?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordHashError::Hash(e.to_string())),
        }
    }
}
