pub mod password;

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::config;

pub use password::{hash_password, verify_password, PasswordError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i64,
    pub email: String,
    /// Unique per issued token so every login gets its own revocable record
    pub jti: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: i64, email: impl Into<String>) -> Self {
        let expiry_hours = config::config()
            .security
            .jwt_expiry_hours
            .min(config::MAX_JWT_EXPIRY_HOURS);
        Self::with_lifetime(user_id, email, Duration::hours(expiry_hours as i64))
    }

    /// A lifetime past the end of representable time saturates instead of overflowing.
    pub fn with_lifetime(user_id: i64, email: impl Into<String>, lifetime: Duration) -> Self {
        let now = Utc::now();
        let expires_at = now.checked_add_signed(lifetime).unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            sub: user_id,
            email: email.into(),
            jti: Uuid::new_v4().to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or_else(Utc::now)
    }
}

#[derive(Debug, Error)]
pub enum AuthTokenError {
    #[error("JWT secret not configured")]
    InvalidSecret,

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
}

pub fn generate_jwt(claims: &Claims) -> Result<String, AuthTokenError> {
    generate_jwt_with_secret(claims, &config::config().security.jwt_secret)
}

pub fn generate_jwt_with_secret(claims: &Claims, secret: &str) -> Result<String, AuthTokenError> {
    if secret.is_empty() {
        return Err(AuthTokenError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(|e| AuthTokenError::TokenGeneration(e.to_string()))
}

/// Checks signature and expiry. Whether the token was revoked is up to the caller.
pub fn validate_jwt(token: &str) -> Result<Claims, AuthTokenError> {
    validate_jwt_with_secret(token, &config::config().security.jwt_secret)
}

pub fn validate_jwt_with_secret(token: &str, secret: &str) -> Result<Claims, AuthTokenError> {
    if secret.is_empty() {
        return Err(AuthTokenError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthTokenError::Expired,
            _ => AuthTokenError::Invalid(e.to_string()),
        })
}

/// Hex SHA-256 of a bearer token, the only form in which tokens are stored.
pub fn token_hash(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
