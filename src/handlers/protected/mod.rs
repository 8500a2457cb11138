// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every route here sits behind `bearer_auth_middleware`, so handlers can rely
// on an `AuthUser` extension being present.

pub mod auth; // Current user, logout and profile
pub mod todos; // Todo CRUD, scoped to the caller
