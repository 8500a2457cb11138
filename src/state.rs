use sqlx::SqlitePool;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::repository::{
    SqliteAccessTokenRepository, SqliteTodoRepository, SqliteUserRepository,
};
use crate::services::{AuthService, TodoService};

/// Shared by every handler. Cloning is cheap: the pool and services are handles.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub todos: TodoService,
    pub auth: AuthService,
}

impl AppState {
    /// Wires the SQLite-backed repositories into the services.
    pub fn new(pool: SqlitePool, config: &AppConfig) -> Self {
        let todos = TodoService::new(Arc::new(SqliteTodoRepository::new(pool.clone())));
        let auth = AuthService::new(
            Arc::new(SqliteUserRepository::new(pool.clone())),
            Arc::new(SqliteAccessTokenRepository::new(pool.clone())),
            config.security.allow_registration,
        );
        Self { pool, todos, auth }
    }
}
