// handlers/public/auth/mod.rs - Token acquisition endpoints

pub mod login; // POST /auth/login - authenticate and get a bearer token
pub mod register; // POST /auth/register - create an account and get a bearer token

pub use login::login_post;
pub use register::register_post;
