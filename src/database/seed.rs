// Demo data for a fresh account
use chrono::{Days, NaiveDate};
use tracing::info;

use crate::database::models::Todo;
use crate::database::repository::{RepositoryError, TodoRepository};
use crate::validation::NewTodo;

/// (title, description, completed, due in N days)
const DEMO_TODOS: &[(&str, &str, bool, Option<u64>)] = &[
    (
        "Learn axum extractors and middleware",
        "Work through routing, shared state, extractors and from_fn middleware.",
        true,
        None,
    ),
    (
        "Build the command-line client",
        "Create list, add, edit and toggle commands on top of the HTTP client.",
        true,
        None,
    ),
    (
        "Set up SQLite database",
        "Configure the connection pool and run migrations for the todo application.",
        true,
        None,
    ),
    (
        "Implement CRUD API endpoints",
        "Create RESTful API endpoints for creating, reading, updating, and deleting todos.",
        false,
        Some(1),
    ),
    (
        "Add input validation",
        "Implement proper validation for API requests to ensure data integrity.",
        false,
        Some(2),
    ),
    (
        "Write comprehensive tests",
        "Create unit and integration tests to ensure the application works correctly.",
        false,
        Some(5),
    ),
    (
        "Deploy to production",
        "Set up deployment pipeline and deploy the application to a production server.",
        false,
        Some(14),
    ),
    (
        "Optimize performance",
        "Review and optimize database queries and client round trips.",
        false,
        None,
    ),
    (
        "Add user authentication",
        "Implement user registration and login with revocable bearer tokens.",
        false,
        Some(3),
    ),
    (
        "Document the API",
        "Create comprehensive API documentation with examples and usage instructions.",
        false,
        None,
    ),
];

pub fn demo_todos(today: NaiveDate) -> Vec<NewTodo> {
    DEMO_TODOS
        .iter()
        .map(|(title, description, completed, due_in)| NewTodo {
            title: title.to_string(),
            description: Some(description.to_string()),
            completed: *completed,
            due_date: due_in.and_then(|days| today.checked_add_days(Days::new(days))),
        })
        .collect()
}

/// Inserts the demo todos for `user_id`, returning what was stored.
pub async fn seed_todos(
    todos: &dyn TodoRepository,
    user_id: i64,
    today: NaiveDate,
) -> Result<Vec<Todo>, RepositoryError> {
    let mut created = Vec::with_capacity(DEMO_TODOS.len());
    for todo in demo_todos(today) {
        created.push(todos.insert(user_id, &todo).await?);
    }
    info!("Seeded {} todos for user {}", created.len(), user_id);
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repository::MemoryTodoRepository;

    #[tokio::test]
    async fn seeds_ten_todos_for_the_user() {
        let repo = MemoryTodoRepository::new();
        let today = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();

        let created = seed_todos(&repo, 7, today).await.unwrap();
        assert_eq!(created.len(), 10);
        assert_eq!(created.iter().filter(|t| t.completed).count(), 3);
        assert!(created.iter().all(|t| t.user_id == 7));
        assert!(created.iter().filter(|t| t.completed).all(|t| t.due_date.is_none()));

        let listed = repo.list_by_user(7).await.unwrap();
        assert_eq!(listed[0].title, "Deploy to production");
        assert_eq!(listed[0].due_date, NaiveDate::from_ymd_opt(2025, 8, 15));
    }
}
