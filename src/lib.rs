pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;
pub mod validation;

use axum::{
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::config::{AppConfig, Environment};
use crate::handlers::{protected, public};
use crate::middleware::bearer_auth_middleware;

pub use crate::error::ApiError;
pub use crate::state::AppState;

/// Full HTTP surface. Every API route is served both at the root and under `/api`.
pub fn app(state: AppState) -> Router {
    let config = config::config();

    Router::new()
        .route("/", get(public::system::root))
        .route("/health", get(public::system::health))
        .merge(api_routes(state.clone()))
        .nest("/api", api_routes(state.clone()))
        .layer(
            // Outermost first. The limit wraps CORS because `Cors` needs a `Default` response body
            ServiceBuilder::new()
                .layer(RequestBodyLimitLayer::new(config.api.max_request_size_bytes))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(config)),
        )
        .with_state(state)
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(auth_public_routes())
        .merge(auth_routes(state.clone()))
        .merge(todo_routes(state))
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/auth/register", post(auth::register_post))
        .route("/auth/login", post(auth::login_post))
}

fn auth_routes(state: AppState) -> Router<AppState> {
    use protected::auth;

    Router::new()
        .route("/auth/user", get(auth::user_get).put(auth::profile_put))
        .route("/auth/logout", post(auth::logout_post))
        // Older clients read the current user from here
        .route("/user", get(auth::user_get))
        .route_layer(from_fn_with_state(state, bearer_auth_middleware))
}

fn todo_routes(state: AppState) -> Router<AppState> {
    use protected::todos;

    Router::new()
        .route("/todos", get(todos::todos_get).post(todos::todos_post))
        .route(
            "/todos/:id",
            get(todos::todo_get)
                .put(todos::todo_put)
                .patch(todos::todo_put)
                .delete(todos::todo_delete),
        )
        .route_layer(from_fn_with_state(state, bearer_auth_middleware))
}

/// Permissive in development, otherwise limited to the configured origins.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    if !config.security.enable_cors {
        return CorsLayer::new();
    }
    if config.environment == Environment::Development {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
