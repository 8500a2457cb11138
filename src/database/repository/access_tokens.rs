use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::{AccessTokenRepository, RepositoryError};
use crate::database::models::AccessToken;

#[derive(Clone)]
pub struct SqliteAccessTokenRepository {
    pool: SqlitePool,
}

impl SqliteAccessTokenRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessTokenRepository for SqliteAccessTokenRepository {
    async fn insert(
        &self,
        user_id: i64,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<AccessToken, RepositoryError> {
        sqlx::query_as::<_, AccessToken>(
            r#"
            INSERT INTO access_tokens (user_id, token_hash, created_at, expires_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, user_id, token_hash, created_at, expires_at
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(Utc::now())
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "token_hash"))
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<AccessToken>, RepositoryError> {
        let token = sqlx::query_as::<_, AccessToken>(
            "SELECT id, user_id, token_hash, created_at, expires_at FROM access_tokens WHERE token_hash = ?1",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;
        Ok(token)
    }

    async fn delete_by_hash(&self, token_hash: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM access_tokens WHERE token_hash = ?1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        // Timestamps are all written as UTC RFC 3339, which sorts correctly as text
        let result = sqlx::query("DELETE FROM access_tokens WHERE expires_at <= ?1")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
