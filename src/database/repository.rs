// Storage-agnostic repository interfaces.
//
// Services only ever see these traits. `Sqlite*` types implement them on top
// of an `SqlitePool`; `memory` holds a process-local todo store for unit tests.

pub mod access_tokens;
#[cfg(test)]
pub mod memory;
pub mod todos;
pub mod users;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::database::models::{AccessToken, Todo, User, UserChanges};
use crate::validation::{NewTodo, TodoChanges};

pub use access_tokens::SqliteAccessTokenRepository;
#[cfg(test)]
pub use memory::MemoryTodoRepository;
pub use todos::SqliteTodoRepository;
pub use users::SqliteUserRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A unique constraint rejected the write. Carries the column name.
    #[error("Duplicate value for {0}")]
    Conflict(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl RepositoryError {
    /// Maps unique-constraint failures to `Conflict`, everything else passes through.
    pub(crate) fn from_write(err: sqlx::Error, column: &'static str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => RepositoryError::Conflict(column),
            _ => RepositoryError::Sqlx(err),
        }
    }
}

#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Todo>, RepositoryError>;

    /// Newest due date first, undated last, then newest first.
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Todo>, RepositoryError>;

    async fn insert(&self, user_id: i64, todo: &NewTodo) -> Result<Todo, RepositoryError>;

    /// Returns `None` when no row has that id.
    async fn update(&self, id: i64, changes: &TodoChanges) -> Result<Option<Todo>, RepositoryError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    async fn insert(&self, name: &str, email: &str, password_hash: &str) -> Result<User, RepositoryError>;

    async fn update(&self, id: i64, changes: &UserChanges) -> Result<Option<User>, RepositoryError>;
}

#[async_trait]
pub trait AccessTokenRepository: Send + Sync {
    async fn insert(
        &self,
        user_id: i64,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<AccessToken, RepositoryError>;

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<AccessToken>, RepositoryError>;

    async fn delete_by_hash(&self, token_hash: &str) -> Result<bool, RepositoryError>;

    /// Removes every token that expired at or before `now`.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError>;
}

/// Ordering shared by every todo store.
pub fn list_order(a: &Todo, b: &Todo) -> std::cmp::Ordering {
    // Option<NaiveDate> orders None first, so reversing puts it last
    b.due_date
        .cmp(&a.due_date)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| b.id.cmp(&a.id))
}
