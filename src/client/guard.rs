// Client-side route guard
//
// A pure function of the target route and the session. It never looks at
// stored state on its own, so callers decide which session applies.

use super::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Profile,
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    RequiresAuth,
    RequiresGuest,
}

/// Outcome of a navigation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Proceed(Route),
    Redirect(Route),
}

impl Navigation {
    /// Where the user ends up either way
    pub fn destination(self) -> Route {
        match self {
            Navigation::Proceed(route) | Navigation::Redirect(route) => route,
        }
    }
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Dashboard => "/",
            Route::Profile => "/profile",
            Route::Login => "/login",
            Route::Register => "/register",
        }
    }

    /// Unknown paths fall through to the dashboard.
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "/profile" => Route::Profile,
            "/login" => Route::Login,
            "/register" => Route::Register,
            _ => Route::Dashboard,
        }
    }

    pub fn access(self) -> Access {
        match self {
            Route::Dashboard | Route::Profile => Access::RequiresAuth,
            Route::Login | Route::Register => Access::RequiresGuest,
        }
    }
}

/// Decides whether navigation to `target` may proceed.
pub fn guard(target: Route, session: &Session) -> Navigation {
    match (target.access(), session.is_authenticated()) {
        (Access::RequiresAuth, false) => Navigation::Redirect(Route::Login),
        (Access::RequiresGuest, true) => Navigation::Redirect(Route::Dashboard),
        _ => Navigation::Proceed(target),
    }
}

/// Resolves a path and applies the guard in one step.
pub fn navigate(path: &str, session: &Session) -> Navigation {
    guard(Route::from_path(path), session)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_in() -> Session {
        Session {
            token: Some("token".into()),
            user: None,
        }
    }

    #[test]
    fn guest_is_sent_to_login() {
        let guest = Session::new();
        assert_eq!(guard(Route::Dashboard, &guest), Navigation::Redirect(Route::Login));
        assert_eq!(guard(Route::Profile, &guest), Navigation::Redirect(Route::Login));
        assert_eq!(guard(Route::Login, &guest), Navigation::Proceed(Route::Login));
        assert_eq!(guard(Route::Register, &guest), Navigation::Proceed(Route::Register));
    }

    #[test]
    fn signed_in_user_skips_guest_pages() {
        let session = signed_in();
        assert_eq!(guard(Route::Login, &session), Navigation::Redirect(Route::Dashboard));
        assert_eq!(guard(Route::Register, &session), Navigation::Redirect(Route::Dashboard));
        assert_eq!(guard(Route::Dashboard, &session), Navigation::Proceed(Route::Dashboard));
        assert_eq!(guard(Route::Profile, &session), Navigation::Proceed(Route::Profile));
    }

    #[test]
    fn token_presence_is_enough() {
        // No cached user and an obviously stale token still count as signed in
        let session = Session {
            token: Some("expired-long-ago".into()),
            user: None,
        };
        assert_eq!(guard(Route::Profile, &session), Navigation::Proceed(Route::Profile));
    }

    #[test]
    fn unknown_paths_resolve_to_dashboard() {
        assert_eq!(Route::from_path("/nowhere"), Route::Dashboard);
        assert_eq!(Route::from_path("/profile/"), Route::Profile);
        assert_eq!(navigate("/nowhere", &Session::new()).destination(), Route::Login);
        assert_eq!(navigate("/login", &signed_in()).destination(), Route::Dashboard);

        for route in [Route::Dashboard, Route::Profile, Route::Login, Route::Register] {
            assert_eq!(Route::from_path(route.path()), route);
        }
    }
}
