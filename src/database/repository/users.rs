use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{RepositoryError, UserRepository};
use crate::database::models::{User, UserChanges};

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn insert(&self, name: &str, email: &str, password_hash: &str) -> Result<User, RepositoryError> {
        let now = Utc::now();
        let sql = format!(
            r#"
            INSERT INTO users (name, email, password_hash, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_write(e, "email"))
    }

    async fn update(&self, id: i64, changes: &UserChanges) -> Result<Option<User>, RepositoryError> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE users SET updated_at = ");
        query.push_bind(Utc::now());

        if let Some(name) = &changes.name {
            query.push(", name = ").push_bind(name.clone());
        }
        if let Some(email) = &changes.email {
            query.push(", email = ").push_bind(email.clone());
        }
        if let Some(password_hash) = &changes.password_hash {
            query.push(", password_hash = ").push_bind(password_hash.clone());
        }

        query.push(" WHERE id = ").push_bind(id);
        query.push(" RETURNING ").push(USER_COLUMNS);

        query
            .build_query_as::<User>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_write(e, "email"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::manager::DatabaseManager;

    async fn repo() -> SqliteUserRepository {
        SqliteUserRepository::new(DatabaseManager::connect_in_memory().await.unwrap())
    }

    #[tokio::test]
    async fn insert_then_lookup() {
        let repo = repo().await;
        let user = repo.insert("Ada", "ada@example.com", "hash").await.unwrap();

        assert_eq!(repo.find_by_id(user.id).await.unwrap().as_ref(), Some(&user));
        assert_eq!(repo.find_by_email("ada@example.com").await.unwrap(), Some(user));
        assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let repo = repo().await;
        repo.insert("Ada", "ada@example.com", "hash").await.unwrap();

        let err = repo.insert("Other", "ada@example.com", "hash").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict("email")));
    }

    #[tokio::test]
    async fn update_profile_columns() {
        let repo = repo().await;
        let user = repo.insert("Ada", "ada@example.com", "hash").await.unwrap();
        repo.insert("Grace", "grace@example.com", "hash").await.unwrap();

        let updated = repo
            .update(
                user.id,
                &UserChanges {
                    name: Some("Ada L.".into()),
                    ..UserChanges::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Ada L.");
        assert_eq!(updated.email, "ada@example.com");
        assert_eq!(updated.password_hash, "hash");

        let err = repo
            .update(
                user.id,
                &UserChanges {
                    email: Some("grace@example.com".into()),
                    ..UserChanges::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict("email")));
    }
}
