//! Access gating for the admin screens.
//!
//! `RouteGuard` turns session state into an access decision. While the
//! startup verification is pending it answers `Loading` - no protected
//! content, no redirect - so the admin subtree can neither flash before the
//! session resolves nor bounce an eventually-valid session to the login
//! screen.

use super::session::{Session, SessionStatus};

/// Top-level destinations the guard can route between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Admin,
}

/// Where unauthenticated sessions are sent
pub const LOGIN_ROUTE: Route = Route::Login;

/// Entry point of the protected subtree
pub const PROTECTED_ROUTE: Route = Route::Admin;

/// Outcome of an access check for the protected subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Session status unknown - render a neutral placeholder
    Loading,
    /// Render the protected subtree
    Grant,
    /// Send the user to the login entry point
    Redirect(Route),
}

#[derive(Debug, Clone, Copy)]
pub struct RouteGuard {
    redirect_to: Route,
}

impl RouteGuard {
    pub fn new() -> Self {
        Self {
            redirect_to: LOGIN_ROUTE,
        }
    }

    /// Decide access for the protected subtree given the current session
    pub fn decide(&self, session: &Session) -> AccessDecision {
        match session.status() {
            SessionStatus::Verifying => AccessDecision::Loading,
            SessionStatus::Resolved if session.is_authenticated() => AccessDecision::Grant,
            SessionStatus::Resolved => AccessDecision::Redirect(self.redirect_to),
        }
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::models::UserProfile;

    use super::*;

    fn user() -> UserProfile {
        UserProfile {
            name: "A".to_string(),
            email: "a@x.com".to_string(),
        }
    }

    #[test]
    fn verifying_session_gets_loading_not_a_decision() {
        let guard = RouteGuard::new();
        let session = Session::verifying();
        assert_eq!(guard.decide(&session), AccessDecision::Loading);
    }

    #[test]
    fn resolved_authenticated_session_is_granted() {
        let guard = RouteGuard::new();
        let session = Session::resolved_authenticated(user());
        assert_eq!(guard.decide(&session), AccessDecision::Grant);
    }

    #[test]
    fn resolved_unauthenticated_session_redirects_to_login() {
        let guard = RouteGuard::new();
        let session = Session::resolved_unauthenticated();
        assert_eq!(
            guard.decide(&session),
            AccessDecision::Redirect(Route::Login)
        );
    }
}
