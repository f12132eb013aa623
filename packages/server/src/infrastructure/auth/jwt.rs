//! HS256 JWT token service.

use chrono::Duration;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::domain::{TokenError, TokenService, Username};

/// Lifetime of issued tokens
pub const TOKEN_TTL_HOURS: i64 = 24;

/// JWT payload
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Username
    sub: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies identity tokens with a shared secret
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtTokenService {
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, Duration::hours(TOKEN_TTL_HOURS))
    }

    pub fn with_ttl(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, identity: &Username) -> Result<String, TokenError> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: identity.as_str().to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Issue(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Username, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;
        Username::new(data.claims.sub).map_err(|_| TokenError::Invalid)
    }
}
