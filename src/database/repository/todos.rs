use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{RepositoryError, TodoRepository};
use crate::database::models::Todo;
use crate::validation::{NewTodo, TodoChanges};

const TODO_COLUMNS: &str = "id, title, description, completed, due_date, user_id, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteTodoRepository {
    pool: SqlitePool,
}

impl SqliteTodoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for SqliteTodoRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Todo>, RepositoryError> {
        let sql = format!("SELECT {} FROM todos WHERE id = ?1", TODO_COLUMNS);
        let todo = sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Todo>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM todos
            WHERE user_id = ?1
            ORDER BY due_date IS NULL, due_date DESC, created_at DESC, id DESC
            "#,
            TODO_COLUMNS
        );
        let todos = sqlx::query_as::<_, Todo>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(todos)
    }

    async fn insert(&self, user_id: i64, todo: &NewTodo) -> Result<Todo, RepositoryError> {
        let now = Utc::now();
        let sql = format!(
            r#"
            INSERT INTO todos
                (title, description, completed, due_date, user_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            RETURNING {}
            "#,
            TODO_COLUMNS
        );
        let created = sqlx::query_as::<_, Todo>(&sql)
            .bind(&todo.title)
            .bind(&todo.description)
            .bind(todo.completed)
            .bind(todo.due_date)
            .bind(user_id)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn update(&self, id: i64, changes: &TodoChanges) -> Result<Option<Todo>, RepositoryError> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE todos SET updated_at = ");
        query.push_bind(Utc::now());

        if let Some(title) = &changes.title {
            query.push(", title = ").push_bind(title.clone());
        }
        if let Some(description) = &changes.description {
            query.push(", description = ").push_bind(description.clone());
        }
        if let Some(completed) = changes.completed {
            query.push(", completed = ").push_bind(completed);
        }
        if let Some(due_date) = changes.due_date {
            query.push(", due_date = ").push_bind(due_date);
        }

        query.push(" WHERE id = ").push_bind(id);
        query.push(" RETURNING ").push(TODO_COLUMNS);

        let updated = query
            .build_query_as::<Todo>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::manager::DatabaseManager;
    use crate::database::repository::{SqliteUserRepository, UserRepository};
    use chrono::NaiveDate;

    async fn setup() -> (SqliteTodoRepository, i64) {
        let pool = DatabaseManager::connect_in_memory().await.unwrap();
        let users = SqliteUserRepository::new(pool.clone());
        let user = users.insert("Owner", "owner@example.com", "hash").await.unwrap();
        (SqliteTodoRepository::new(pool), user.id)
    }

    fn dated(title: &str, due: Option<(i32, u32, u32)>) -> NewTodo {
        NewTodo {
            due_date: due.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            ..NewTodo::new(title)
        }
    }

    #[tokio::test]
    async fn insert_and_find() {
        let (repo, user_id) = setup().await;

        let created = repo
            .insert(
                user_id,
                &NewTodo {
                    description: Some("two liters".into()),
                    ..NewTodo::new("Buy milk")
                },
            )
            .await
            .unwrap();
        assert_eq!(created.title, "Buy milk");
        assert_eq!(created.description.as_deref(), Some("two liters"));
        assert!(!created.completed);
        assert_eq!(created.user_id, user_id);
        assert_eq!(created.created_at, created.updated_at);

        let found = repo.find_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created));
        assert_eq!(repo.find_by_id(9999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_orders_by_due_date_then_newest() {
        let (repo, user_id) = setup().await;

        repo.insert(user_id, &dated("undated-old", None)).await.unwrap();
        repo.insert(user_id, &dated("early", Some((2025, 8, 1)))).await.unwrap();
        repo.insert(user_id, &dated("undated-new", None)).await.unwrap();
        repo.insert(user_id, &dated("late", Some((2025, 8, 15)))).await.unwrap();

        let titles: Vec<String> = repo
            .list_by_user(user_id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["late", "early", "undated-new", "undated-old"]);
    }

    #[tokio::test]
    async fn update_touches_only_supplied_fields() {
        let (repo, user_id) = setup().await;
        let created = repo
            .insert(
                user_id,
                &NewTodo {
                    description: Some("keep me".into()),
                    ..dated("Pay rent", Some((2025, 9, 1)))
                },
            )
            .await
            .unwrap();

        let updated = repo
            .update(created.id, &TodoChanges::completed(true))
            .await
            .unwrap()
            .unwrap();
        assert!(updated.completed);
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.due_date, created.due_date);
        assert!(updated.updated_at >= created.updated_at);

        let cleared = repo
            .update(
                created.id,
                &TodoChanges {
                    description: Some(None),
                    due_date: Some(None),
                    ..TodoChanges::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cleared.description, None);
        assert_eq!(cleared.due_date, None);
        assert!(cleared.completed);

        assert!(repo.update(9999, &TodoChanges::completed(true)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_reports_missing_rows() {
        let (repo, user_id) = setup().await;
        let created = repo.insert(user_id, &NewTodo::new("Temp")).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
        assert!(repo.find_by_id(created.id).await.unwrap().is_none());
    }
}
