// handlers/protected/todos/mod.rs - Todo CRUD
//
// Collection: GET/POST /todos
// Record:     GET/PUT/PATCH/DELETE /todos/:id

pub mod collection;
pub mod record;

pub use collection::{todos_get, todos_post};
pub use record::{todo_delete, todo_get, todo_put};
