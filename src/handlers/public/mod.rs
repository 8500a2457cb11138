// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition plus service info and health.

pub mod auth;
pub mod system;
