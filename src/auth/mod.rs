use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::MAX_JWT_EXPIRY_HOURS;

pub mod cookie;

pub use cookie::SessionCookies;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(email: String, issued_at: DateTime<Utc>, lifetime: Duration) -> Self {
        Self {
            email,
            exp: (issued_at + lifetime).timestamp(),
            iat: issued_at.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,
}

/// Signs and verifies session credentials with a shared HMAC secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, lifetime: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
        }
    }

    pub fn from_config(config: &crate::config::AppConfig) -> Self {
        let hours = config.security.jwt_expiry_hours.clamp(1, MAX_JWT_EXPIRY_HOURS);
        let hours = i64::try_from(hours).unwrap_or(1);
        Self::new(&config.security.jwt_secret, Duration::hours(hours))
    }

    pub fn issue(&self, email: &str) -> Result<String, AuthError> {
        self.issue_at(email, Utc::now())
    }

    pub fn issue_at(&self, email: &str, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = Claims::new(email.to_string(), issued_at, self.lifetime);
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Returns the identity claim of a well-signed, unexpired token.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims.email)
            .map_err(|e| {
                tracing::debug!("Rejected session token: {}", e);
                AuthError::InvalidOrExpiredToken
            })
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}
