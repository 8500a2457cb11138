use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::database::models::Todo;
use crate::database::repository::TodoRepository;
use crate::error::ApiError;
use crate::validation::{NewTodo, TodoChanges};

/// Todo operations on behalf of an authenticated caller.
///
/// Every single-record operation resolves the record first and then checks
/// ownership, so a missing id is always 404 and someone else's id is always
/// 403. Payload validation only happens after both checks pass.
#[derive(Clone)]
pub struct TodoService {
    todos: Arc<dyn TodoRepository>,
}

impl TodoService {
    pub fn new(todos: Arc<dyn TodoRepository>) -> Self {
        Self { todos }
    }

    pub async fn list(&self, caller_id: i64) -> Result<Vec<Todo>, ApiError> {
        Ok(self.todos.list_by_user(caller_id).await?)
    }

    pub async fn create(&self, caller_id: i64, payload: &Value) -> Result<Todo, ApiError> {
        let new_todo = NewTodo::from_payload(payload)?;
        let todo = self.todos.insert(caller_id, &new_todo).await?;
        debug!("User {} created todo {}", caller_id, todo.id);
        Ok(todo)
    }

    pub async fn show(&self, caller_id: i64, id: i64) -> Result<Todo, ApiError> {
        self.owned(caller_id, id).await
    }

    pub async fn update(&self, caller_id: i64, id: i64, payload: &Value) -> Result<Todo, ApiError> {
        let current = self.owned(caller_id, id).await?;

        let changes = TodoChanges::from_payload(payload)?;
        if changes.is_empty() {
            return Ok(current);
        }

        // Gone between the ownership check and the write
        let updated = self.todos.update(id, &changes).await?.ok_or_else(not_found)?;
        debug!("User {} updated todo {}", caller_id, id);
        Ok(updated)
    }

    pub async fn destroy(&self, caller_id: i64, id: i64) -> Result<(), ApiError> {
        self.owned(caller_id, id).await?;

        if !self.todos.delete(id).await? {
            return Err(not_found());
        }
        debug!("User {} deleted todo {}", caller_id, id);
        Ok(())
    }

    async fn owned(&self, caller_id: i64, id: i64) -> Result<Todo, ApiError> {
        let todo = self.todos.find_by_id(id).await?.ok_or_else(not_found)?;
        if !todo.is_owned_by(caller_id) {
            debug!("User {} denied access to todo {}", caller_id, id);
            return Err(ApiError::forbidden());
        }
        Ok(todo)
    }
}

fn not_found() -> ApiError {
    ApiError::not_found("Todo not found")
}
