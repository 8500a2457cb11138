use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Server-side record of an issued bearer token. The token itself is never
/// stored, only its SHA-256 digest.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct AccessToken {
    pub id: i64,
    pub user_id: i64,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
