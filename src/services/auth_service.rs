use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::{self, Claims, PasswordError};
use crate::database::models::{User, UserChanges};
use crate::database::repository::{AccessTokenRepository, UserRepository};
use crate::error::ApiError;
use crate::validation::{Credentials, ProfileChanges, Registration, ValidationErrors};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const UNAUTHENTICATED: &str = "Unauthenticated.";

/// Body returned by register and login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    pub token: String,
}

/// The caller behind a valid bearer token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub token_hash: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn AccessTokenRepository>,
    allow_registration: bool,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn AccessTokenRepository>,
        allow_registration: bool,
    ) -> Self {
        Self {
            users,
            tokens,
            allow_registration,
        }
    }

    pub async fn register(&self, payload: &Value) -> Result<AuthPayload, ApiError> {
        if !self.allow_registration {
            return Err(ApiError::Forbidden("Registration is disabled".to_string()));
        }

        let registration = Registration::from_payload(payload)?;
        if self.users.find_by_email(&registration.email).await?.is_some() {
            return Err(email_taken().into());
        }

        let password_hash = hash_password(registration.password).await?;
        let user = self
            .users
            .insert(&registration.name, &registration.email, &password_hash)
            .await?;
        info!("Registered user {} ({})", user.id, user.email);

        self.issue(user).await
    }

    pub async fn login(&self, payload: &Value) -> Result<AuthPayload, ApiError> {
        let credentials = Credentials::from_payload(payload)?;

        let Some(user) = self.users.find_by_email(&credentials.email).await? else {
            warn!("Login attempt for unknown email {}", credentials.email);
            return Err(ApiError::unauthenticated(INVALID_CREDENTIALS));
        };
        if !verify_password(credentials.password, user.password_hash.clone()).await? {
            warn!("Wrong password for user {}", user.id);
            return Err(ApiError::unauthenticated(INVALID_CREDENTIALS));
        }

        match self.tokens.delete_expired(Utc::now()).await {
            Ok(0) => {}
            Ok(n) => info!("Purged {} expired access tokens", n),
            Err(e) => warn!("Failed to purge expired access tokens: {}", e),
        }

        info!("User {} logged in", user.id);
        self.issue(user).await
    }

    /// Resolves a bearer token to its user. Fails for bad signatures, expired
    /// tokens, revoked tokens and deleted users alike.
    pub async fn authenticate(&self, token: &str) -> Result<AuthUser, ApiError> {
        let claims = auth::validate_jwt(token).map_err(|e| {
            warn!("Rejected bearer token: {}", e);
            ApiError::from(e)
        })?;

        let token_hash = auth::token_hash(token);
        let Some(record) = self.tokens.find_by_hash(&token_hash).await? else {
            warn!("Bearer token for user {} was revoked", claims.sub);
            return Err(ApiError::unauthenticated(UNAUTHENTICATED));
        };
        if record.user_id != claims.sub || record.is_expired(Utc::now()) {
            return Err(ApiError::unauthenticated(UNAUTHENTICATED));
        }

        let user = self
            .users
            .find_by_id(record.user_id)
            .await?
            .ok_or_else(|| ApiError::unauthenticated(UNAUTHENTICATED))?;

        Ok(AuthUser { user, token_hash })
    }

    /// Revokes the token. Revoking an already revoked token is not an error.
    pub async fn logout(&self, caller: &AuthUser) -> Result<(), ApiError> {
        self.tokens.delete_by_hash(&caller.token_hash).await?;
        info!("User {} logged out", caller.user.id);
        Ok(())
    }

    pub async fn update_profile(&self, caller: &User, payload: &Value) -> Result<User, ApiError> {
        let profile = ProfileChanges::from_payload(payload)?;
        if profile.is_empty() {
            return Ok(caller.clone());
        }

        if let Some(email) = &profile.email {
            if let Some(existing) = self.users.find_by_email(email).await? {
                if existing.id != caller.id {
                    return Err(email_taken().into());
                }
            }
        }

        let password_hash = match profile.password {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        let changes = UserChanges {
            name: profile.name,
            email: profile.email,
            password_hash,
        };
        let user = self
            .users
            .update(caller.id, &changes)
            .await?
            .ok_or_else(|| ApiError::unauthenticated(UNAUTHENTICATED))?;
        info!("User {} updated their profile", user.id);
        Ok(user)
    }

    async fn issue(&self, user: User) -> Result<AuthPayload, ApiError> {
        let claims = Claims::new(user.id, user.email.clone());
        let token = auth::generate_jwt(&claims)?;
        self.tokens
            .insert(user.id, &auth::token_hash(&token), claims.expires_at())
            .await?;
        Ok(AuthPayload { user, token })
    }
}

fn email_taken() -> ValidationErrors {
    ValidationErrors::single("email", "The email has already been taken.")
}

// Argon2 is deliberately slow, keep it off the async workers
async fn hash_password(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || auth::hash_password(&password))
        .await
        .map_err(|e| PasswordError::Hash(e.to_string()))?
        .map_err(ApiError::from)
}

async fn verify_password(password: String, hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || auth::verify_password(&password, &hash))
        .await
        .map_err(|e| PasswordError::Hash(e.to_string()))?
        .map_err(ApiError::from)
}
