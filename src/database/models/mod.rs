pub mod access_token;
pub mod todo;
pub mod user;

pub use access_token::AccessToken;
pub use todo::Todo;
pub use user::{User, UserChanges};
