//! Routing surface and access guard
//!
//! Path-based routes for every page the app serves, plus the pure guard
//! predicate that runs ahead of rendering privileged screens. Guard failure
//! is always a redirect to sign-in carrying the original path as callback,
//! never an error rendered inside the guarded page.

use std::fmt;

use crate::auth::Session;

// =============================================================================
// Routes
// =============================================================================

/// Every navigable page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Movies,
    TvShows,
    MovieDetail(u64),
    TvDetail(u64),
    Stream(u64),
    Search,
    MyList,
    Admin,
    SignIn { callback: Option<String> },
    AuthError { code: Option<String> },
}

impl Route {
    /// Canonical path string for the route
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Movies => "/movies".to_string(),
            Route::TvShows => "/tv-shows".to_string(),
            Route::MovieDetail(id) => format!("/movies/{}", id),
            Route::TvDetail(id) => format!("/tv-shows/{}", id),
            Route::Stream(id) => format!("/stream/{}", id),
            Route::Search => "/search".to_string(),
            Route::MyList => "/my-list".to_string(),
            Route::Admin => "/admin".to_string(),
            Route::SignIn { callback } => match callback {
                Some(cb) => format!("/auth/signin?callbackUrl={}", urlencoding::encode(cb)),
                None => "/auth/signin".to_string(),
            },
            Route::AuthError { code } => match code {
                Some(c) => format!("/auth/error?error={}", c),
                None => "/auth/error".to_string(),
            },
        }
    }

    /// Parse a path (with optional query string) back into a route
    pub fn parse(path: &str) -> Option<Route> {
        let (path, query) = match path.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (path, None),
        };

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Some(Route::Home),
            ["movies"] => Some(Route::Movies),
            ["tv-shows"] => Some(Route::TvShows),
            ["movies", id] => id.parse().ok().map(Route::MovieDetail),
            ["tv-shows", id] => id.parse().ok().map(Route::TvDetail),
            ["stream", id] => id.parse().ok().map(Route::Stream),
            ["search"] => Some(Route::Search),
            ["my-list"] => Some(Route::MyList),
            ["admin"] => Some(Route::Admin),
            ["auth", "signin"] => Some(Route::SignIn {
                callback: query_param(query, "callbackUrl"),
            }),
            ["auth", "error"] => Some(Route::AuthError {
                code: query_param(query, "error"),
            }),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Extract and decode a single query parameter
fn query_param(query: Option<&str>, key: &str) -> Option<String> {
    let query = query?;
    for pair in query.split('&') {
        if let Some((k, v)) = pair.split_once('=') {
            if k == key {
                return urlencoding::decode(v).ok().map(|s| s.into_owned());
            }
        }
    }
    None
}

// =============================================================================
// Access Guard
// =============================================================================

/// Access level a route requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    SignedIn,
    Admin,
}

impl Route {
    /// Required access level. The role claim on the validated session is
    /// the only thing privileged routes consult.
    pub fn required_access(&self) -> Access {
        match self {
            Route::MyList => Access::SignedIn,
            Route::Admin => Access::Admin,
            _ => Access::Public,
        }
    }
}

/// Outcome of the guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(Route),
}

/// Pure guard predicate over (route, session).
///
/// Callers must pass an already-validated session: an expired token is a
/// `None` here, so it authorizes exactly like no session at all.
pub fn guard(route: &Route, session: Option<&Session>) -> RouteDecision {
    let allowed = match route.required_access() {
        Access::Public => true,
        Access::SignedIn => session.is_some(),
        Access::Admin => session.map(|s| s.is_admin()).unwrap_or(false),
    };

    if allowed {
        RouteDecision::Allow
    } else {
        RouteDecision::Redirect(Route::SignIn {
            callback: Some(route.path()),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Authenticator, Role};
    use chrono::Utc;

    fn session_with_role(role: Role) -> Session {
        let auth = Authenticator::new("test-secret");
        let (email, password) = match role {
            Role::User => ("user@example.com", "password123"),
            Role::Admin => ("admin@example.com", "admin123"),
        };
        auth.sign_in(email, password, Utc::now()).unwrap().session
    }

    // -------------------------------------------------------------------------
    // Path Round-Trip Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_path_round_trip() {
        let routes = vec![
            Route::Home,
            Route::Movies,
            Route::TvShows,
            Route::MovieDetail(550),
            Route::TvDetail(1396),
            Route::Stream(550),
            Route::Search,
            Route::MyList,
            Route::Admin,
            Route::SignIn { callback: None },
            Route::SignIn {
                callback: Some("/admin".to_string()),
            },
            Route::AuthError {
                code: Some("CredentialsSignin".to_string()),
            },
        ];

        for route in routes {
            let parsed = Route::parse(&route.path());
            assert_eq!(parsed, Some(route));
        }
    }

    #[test]
    fn test_parse_unknown_path() {
        assert_eq!(Route::parse("/does-not-exist"), None);
        assert_eq!(Route::parse("/movies/not-a-number"), None);
    }

    #[test]
    fn test_parse_callback_decoding() {
        let route = Route::parse("/auth/signin?callbackUrl=%2Fmy-list").unwrap();
        assert_eq!(
            route,
            Route::SignIn {
                callback: Some("/my-list".to_string())
            }
        );
    }

    // -------------------------------------------------------------------------
    // Access Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_required_access() {
        assert_eq!(Route::Home.required_access(), Access::Public);
        assert_eq!(Route::Stream(550).required_access(), Access::Public);
        assert_eq!(Route::MyList.required_access(), Access::SignedIn);
        assert_eq!(Route::Admin.required_access(), Access::Admin);
    }

    // -------------------------------------------------------------------------
    // Guard Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_guard_public_route_anonymous() {
        assert_eq!(guard(&Route::Home, None), RouteDecision::Allow);
        assert_eq!(guard(&Route::Movies, None), RouteDecision::Allow);
    }

    #[test]
    fn test_guard_admin_redirects_anonymous_with_callback() {
        let decision = guard(&Route::Admin, None);
        assert_eq!(
            decision,
            RouteDecision::Redirect(Route::SignIn {
                callback: Some("/admin".to_string())
            })
        );
    }

    #[test]
    fn test_guard_admin_rejects_plain_user() {
        let session = session_with_role(Role::User);
        let decision = guard(&Route::Admin, Some(&session));
        assert_eq!(
            decision,
            RouteDecision::Redirect(Route::SignIn {
                callback: Some("/admin".to_string())
            })
        );
    }

    #[test]
    fn test_guard_admin_allows_admin() {
        let session = session_with_role(Role::Admin);
        assert_eq!(guard(&Route::Admin, Some(&session)), RouteDecision::Allow);
    }

    #[test]
    fn test_guard_my_list_requires_session() {
        assert_eq!(
            guard(&Route::MyList, None),
            RouteDecision::Redirect(Route::SignIn {
                callback: Some("/my-list".to_string())
            })
        );

        let session = session_with_role(Role::User);
        assert_eq!(guard(&Route::MyList, Some(&session)), RouteDecision::Allow);
    }
}
