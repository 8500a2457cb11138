pub mod auth_service;
pub mod todo_service;

pub use auth_service::{AuthPayload, AuthService, AuthUser};
pub use todo_service::TodoService;
