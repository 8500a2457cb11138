// handlers/protected/auth/mod.rs - Endpoints for the signed-in user

pub mod profile; // PUT /auth/user
pub mod session; // GET /auth/user, POST /auth/logout

pub use profile::profile_put;
pub use session::{logout_post, user_get};
