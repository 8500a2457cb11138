use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

use crate::database::models::User;

/// Client-side authentication state: the bearer token and the user it
/// belongs to. Token presence is the only thing that makes a session
/// "authenticated"; expiry is left for the server to decide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn authenticated(token: impl Into<String>, user: User) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn clear(&mut self) {
        self.token = None;
        self.user = None;
    }
}

/// Shared handle to one `Session`, given to the API client and read by the
/// route guard and the UI.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle(Arc<RwLock<Session>>);

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self(Arc::new(RwLock::new(session)))
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> Session {
        self.read(Session::clone)
    }

    pub fn token(&self) -> Option<String> {
        self.read(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<User> {
        self.read(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read(Session::is_authenticated)
    }

    pub fn sign_in(&self, token: impl Into<String>, user: User) {
        self.write(|s| *s = Session::authenticated(token, user));
    }

    pub fn set_user(&self, user: User) {
        self.write(|s| s.user = Some(user));
    }

    pub fn clear(&self) {
        self.write(Session::clear);
    }

    // A panic while holding the lock cannot leave a Session half-written, so
    // poisoning is ignored
    fn read<T>(&self, f: impl FnOnce(&Session) -> T) -> T {
        let guard = self.0.read().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }

    fn write(&self, f: impl FnOnce(&mut Session)) {
        let mut guard = self.0.write().unwrap_or_else(|e| e.into_inner());
        f(&mut guard);
    }
}
