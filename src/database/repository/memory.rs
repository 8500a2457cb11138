use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{list_order, RepositoryError, TodoRepository};
use crate::database::models::Todo;
use crate::validation::{NewTodo, TodoChanges};

/// Process-local todo store. Nothing survives a restart.
#[derive(Clone, Default)]
pub struct MemoryTodoRepository {
    inner: Arc<RwLock<MemoryTodos>>,
}

#[derive(Default)]
struct MemoryTodos {
    next_id: i64,
    rows: Vec<Todo>,
}

impl MemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoRepository for MemoryTodoRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Todo>, RepositoryError> {
        let store = self.inner.read().await;
        Ok(store.rows.iter().find(|t| t.id == id).cloned())
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Todo>, RepositoryError> {
        let store = self.inner.read().await;
        let mut todos: Vec<Todo> = store.rows.iter().filter(|t| t.user_id == user_id).cloned().collect();
        todos.sort_by(list_order);
        Ok(todos)
    }

    async fn insert(&self, user_id: i64, todo: &NewTodo) -> Result<Todo, RepositoryError> {
        let mut store = self.inner.write().await;
        store.next_id += 1;

        let now = Utc::now();
        let created = Todo {
            id: store.next_id,
            title: todo.title.clone(),
            description: todo.description.clone(),
            completed: todo.completed,
            due_date: todo.due_date,
            user_id,
            created_at: now,
            updated_at: now,
        };
        store.rows.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, changes: &TodoChanges) -> Result<Option<Todo>, RepositoryError> {
        let mut store = self.inner.write().await;
        let Some(current) = store.rows.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };

        if let Some(title) = &changes.title {
            current.title = title.clone();
        }
        if let Some(description) = &changes.description {
            current.description = description.clone();
        }
        if let Some(completed) = changes.completed {
            current.completed = completed;
        }
        if let Some(due_date) = changes.due_date {
            current.due_date = due_date;
        }
        current.updated_at = Utc::now();

        Ok(Some(current.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        let mut store = self.inner.write().await;
        let before = store.rows.len();
        store.rows.retain(|t| t.id != id);
        Ok(store.rows.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn matches_sql_ordering() {
        let repo = MemoryTodoRepository::new();
        for (title, due) in [("none", None), ("aug-01", NaiveDate::from_ymd_opt(2025, 8, 1)), ("aug-15", NaiveDate::from_ymd_opt(2025, 8, 15))] {
            repo.insert(1, &NewTodo { due_date: due, ..NewTodo::new(title) }).await.unwrap();
        }
        repo.insert(2, &NewTodo::new("someone else")).await.unwrap();

        let titles: Vec<String> = repo.list_by_user(1).await.unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["aug-15", "aug-01", "none"]);
    }

    #[tokio::test]
    async fn update_and_delete_missing() {
        let repo = MemoryTodoRepository::new();
        assert!(repo.update(1, &TodoChanges::completed(true)).await.unwrap().is_none());
        assert!(!repo.delete(1).await.unwrap());
    }
}
