// HTTP client for the todo API
//
// Holds no authentication state of its own. The bearer token is read from the
// `SessionHandle` it was built with on every request, and login/register/
// logout write back into that same handle.

pub mod guard;
pub mod session;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::database::models::{Todo, User};
use crate::services::AuthPayload;
use crate::validation::{FieldErrors, NewTodo, TodoChanges};

pub use guard::{guard, navigate, Access, Navigation, Route};
pub use session::{Session, SessionHandle};

const FETCH_TODOS_FAILED: &str = "Failed to fetch todos";
const FETCH_TODO_FAILED: &str = "Failed to fetch todo";
const CREATE_TODO_FAILED: &str = "Failed to create todo";
const UPDATE_TODO_FAILED: &str = "Failed to update todo";
const DELETE_TODO_FAILED: &str = "Failed to delete todo";
const REGISTER_FAILED: &str = "Registration failed";
const LOGIN_FAILED: &str = "Login failed";
const GET_USER_FAILED: &str = "Failed to get user data";
const UPDATE_PROFILE_FAILED: &str = "Failed to update profile";

/// Normalized failure of a client call
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status
    #[error("{message}")]
    Api {
        status: StatusCode,
        message: String,
        errors: Option<FieldErrors>,
    },

    /// No usable response (connection refused, timeout, undecodable body)
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ClientError::Api { errors, .. } => errors.as_ref(),
            _ => None,
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    errors: Option<FieldErrors>,
}

/// Profile fields to change. `None` fields are not sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_confirmation: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: SessionHandle,
}

impl ApiClient {
    pub fn new(base_url: &str, session: SessionHandle) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        // Url::join replaces the last segment unless the path ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            session,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    // Todos

    pub async fn get_todos(&self) -> Result<Vec<Todo>, ClientError> {
        let request = self.request(Method::GET, "todos", FETCH_TODOS_FAILED)?;
        self.send(request, FETCH_TODOS_FAILED).await
    }

    pub async fn get_todo(&self, id: i64) -> Result<Todo, ClientError> {
        let request = self.request(Method::GET, &format!("todos/{}", id), FETCH_TODO_FAILED)?;
        self.send(request, FETCH_TODO_FAILED).await
    }

    pub async fn create_todo(&self, todo: &NewTodo) -> Result<Todo, ClientError> {
        let request = self.request(Method::POST, "todos", CREATE_TODO_FAILED)?.json(todo);
        self.send(request, CREATE_TODO_FAILED).await
    }

    pub async fn update_todo(&self, id: i64, changes: &TodoChanges) -> Result<Todo, ClientError> {
        let request = self
            .request(Method::PUT, &format!("todos/{}", id), UPDATE_TODO_FAILED)?
            .json(changes);
        self.send(request, UPDATE_TODO_FAILED).await
    }

    pub async fn delete_todo(&self, id: i64) -> Result<(), ClientError> {
        let request = self.request(Method::DELETE, &format!("todos/{}", id), DELETE_TODO_FAILED)?;
        self.send_empty(request, DELETE_TODO_FAILED).await
    }

    /// Sets the completion flag and nothing else.
    pub async fn toggle_todo(&self, id: i64, completed: bool) -> Result<Todo, ClientError> {
        self.update_todo(id, &TodoChanges::completed(completed)).await
    }

    // Auth

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        password_confirmation: &str,
    ) -> Result<AuthPayload, ClientError> {
        let request = self.request(Method::POST, "auth/register", REGISTER_FAILED)?.json(&json!({
            "name": name,
            "email": email,
            "password": password,
            "password_confirmation": password_confirmation,
        }));
        let payload: AuthPayload = self.send(request, REGISTER_FAILED).await?;
        self.session.sign_in(payload.token.clone(), payload.user.clone());
        Ok(payload)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, ClientError> {
        let request = self
            .request(Method::POST, "auth/login", LOGIN_FAILED)?
            .json(&json!({ "email": email, "password": password }));
        let payload: AuthPayload = self.send(request, LOGIN_FAILED).await?;
        self.session.sign_in(payload.token.clone(), payload.user.clone());
        Ok(payload)
    }

    pub async fn get_user(&self) -> Result<User, ClientError> {
        let request = self.request(Method::GET, "auth/user", GET_USER_FAILED)?;
        self.send(request, GET_USER_FAILED).await
    }

    pub async fn update_profile(&self, changes: &ProfileUpdate) -> Result<User, ClientError> {
        let request = self
            .request(Method::PUT, "auth/user", UPDATE_PROFILE_FAILED)?
            .json(changes);
        let user: User = self.send(request, UPDATE_PROFILE_FAILED).await?;
        self.session.set_user(user.clone());
        Ok(user)
    }

    /// Revokes the token server-side when possible. The local session is
    /// cleared whatever happens.
    pub async fn logout(&self) {
        if self.session.is_authenticated() {
            match self.request(Method::POST, "auth/logout", "Logout failed") {
                Ok(request) => {
                    if let Err(e) = self.send_empty(request, "Logout failed").await {
                        warn!("Logout request failed: {}", e);
                    }
                }
                Err(e) => warn!("Logout request failed: {}", e),
            }
        }
        self.session.clear();
    }

    fn request(&self, method: Method, path: &str, default_message: &str) -> Result<RequestBuilder, ClientError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", default_message, e)))?;
        debug!("{} {}", method, url);

        let mut request = self.http.request(method, url).header(ACCEPT, "application/json");
        if let Some(token) = self.session.token() {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        Ok(request)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, default_message: &str) -> Result<T, ClientError> {
        let response = self.execute(request, default_message).await?;
        response.json::<T>().await.map_err(|source| ClientError::Transport {
            message: default_message.to_string(),
            source,
        })
    }

    async fn send_empty(&self, request: RequestBuilder, default_message: &str) -> Result<(), ClientError> {
        self.execute(request, default_message).await.map(|_| ())
    }

    async fn execute(&self, request: RequestBuilder, default_message: &str) -> Result<Response, ClientError> {
        let response = request.send().await.map_err(|source| ClientError::Transport {
            message: default_message.to_string(),
            source,
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Error bodies are best effort: anything unreadable falls back to the default
        let body = response.json::<ErrorBody>().await.ok();
        let (message, errors) = match body {
            Some(ErrorBody { message, errors }) => (message, errors),
            None => (None, None),
        };
        Err(ClientError::Api {
            status,
            message: message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| default_message.to_string()),
            errors,
        })
    }
}
