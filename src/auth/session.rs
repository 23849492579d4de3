//! Session ownership and the login/verify/logout operations.
//!
//! `SessionGuard` holds the session state and the persisted token and is the
//! only thing that talks to the backend auth endpoints. Every failure path -
//! transport error, `success:false`, malformed body - resolves to an
//! unauthenticated session: an unverifiable token is treated as no token.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::api::AuthApi;
use crate::models::UserProfile;

use super::token::TokenStore;

/// Whether the startup verification has settled yet.
///
/// `Verifying` covers the window between process start and the first answer
/// from the auth service; `authenticated` is meaningful only once the status
/// is `Resolved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Verifying,
    Resolved,
}

/// Current authentication state, as consumed by the route guard and the UI.
#[derive(Debug, Clone)]
pub struct Session {
    status: SessionStatus,
    authenticated: bool,
    user: Option<UserProfile>,
}

impl Session {
    pub(crate) fn verifying() -> Self {
        Self {
            status: SessionStatus::Verifying,
            authenticated: false,
            user: None,
        }
    }

    pub(crate) fn resolved_unauthenticated() -> Self {
        Self {
            status: SessionStatus::Resolved,
            authenticated: false,
            user: None,
        }
    }

    pub(crate) fn resolved_authenticated(user: UserProfile) -> Self {
        Self {
            status: SessionStatus::Resolved,
            authenticated: true,
            user: Some(user),
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }
}

/// Owns the session and the persisted token; mediates all communication with
/// the auth service through the injected `AuthApi`.
pub struct SessionGuard {
    api: Arc<dyn AuthApi>,
    store: TokenStore,
    session: Session,
    token: Option<String>,
}

impl SessionGuard {
    /// Read the persisted token and establish the initial state: `Verifying`
    /// when a token is present, resolved-unauthenticated when it is not.
    pub fn new(api: Arc<dyn AuthApi>, store: TokenStore) -> Self {
        let token = match store.load() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted token, treating as absent");
                None
            }
        };

        let session = if token.is_some() {
            Session::verifying()
        } else {
            Session::resolved_unauthenticated()
        };

        Self {
            api,
            store,
            session,
            token,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.session.user()
    }

    /// Current token, for authenticating data requests
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Token awaiting startup verification. `Some` only while the session is
    /// still `Verifying`; callers running the verify call on a background
    /// task use this together with `complete_verification`.
    pub fn pending_token(&self) -> Option<String> {
        if self.session.status() == SessionStatus::Verifying {
            self.token.clone()
        } else {
            None
        }
    }

    /// Verify the persisted token against the auth service. Called once at
    /// process start. Never returns an error: with no token this resolves
    /// unauthenticated without touching the network, and any verify failure
    /// discards the token and resolves unauthenticated.
    pub async fn verify_on_start(&mut self) {
        // With no stored token the session resolved unauthenticated at
        // construction; there is nothing to verify and no call to make.
        let Some(token) = self.pending_token() else {
            return;
        };

        match self.api.verify_token(&token).await {
            Ok(user) => self.complete_verification(Some(user)),
            Err(e) => {
                warn!(error = %e, "Token verification failed, discarding stored token");
                self.complete_verification(None);
            }
        }
    }

    /// Apply a startup verification outcome. `Some(profile)` authenticates
    /// the session; `None` discards the persisted token and resolves
    /// unauthenticated. Ignored once the session has already resolved, so a
    /// verification settles the status exactly once.
    pub fn complete_verification(&mut self, profile: Option<UserProfile>) {
        if self.session.status() != SessionStatus::Verifying {
            warn!("Verification completed after session already resolved, ignoring");
            return;
        }

        match profile {
            Some(user) => {
                info!(email = %user.email, "Session verified");
                self.session = Session::resolved_authenticated(user);
            }
            None => {
                self.token = None;
                if let Err(e) = self.store.clear() {
                    warn!(error = %e, "Failed to remove persisted token");
                }
                self.session = Session::resolved_unauthenticated();
            }
        }
    }

    /// Attempt a login with the given credentials. On success the returned
    /// token becomes the persisted token and the session authenticates; on
    /// any failure the session is unauthenticated and nothing is persisted.
    /// Reports the outcome as a bool - the cause is logged, not surfaced.
    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        match self.api.login(email, password).await {
            Ok(grant) => {
                if let Err(e) = self.store.save(&grant.token) {
                    warn!(error = %e, "Failed to persist session token");
                }
                self.token = Some(grant.token);
                info!(email = %grant.user.email, "Login successful");
                self.session = Session::resolved_authenticated(grant.user);
                true
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.session = Session::resolved_unauthenticated();
                false
            }
        }
    }

    /// Clear the session and the persisted token. Always succeeds, has no
    /// network effect, and is idempotent.
    pub fn logout(&mut self) {
        self.token = None;
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to remove persisted token");
        }
        self.session = Session::resolved_unauthenticated();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::api::{ApiError, LoginGrant};

    use super::*;

    /// Scriptable auth backend: outcomes are popped in order, and every call
    /// is counted so tests can assert that no network traffic happened.
    #[derive(Default)]
    struct StubAuthApi {
        login_outcomes: Mutex<VecDeque<Result<LoginGrant, ApiError>>>,
        verify_outcomes: Mutex<VecDeque<Result<UserProfile, ApiError>>>,
        login_calls: AtomicUsize,
        verify_calls: AtomicUsize,
    }

    impl StubAuthApi {
        fn with_verify(outcome: Result<UserProfile, ApiError>) -> Self {
            let stub = Self::default();
            stub.verify_outcomes.lock().unwrap().push_back(outcome);
            stub
        }

        fn with_login(outcome: Result<LoginGrant, ApiError>) -> Self {
            let stub = Self::default();
            stub.login_outcomes.lock().unwrap().push_back(outcome);
            stub
        }

        fn push_login(&self, outcome: Result<LoginGrant, ApiError>) {
            self.login_outcomes.lock().unwrap().push_back(outcome);
        }

        fn verify_calls(&self) -> usize {
            self.verify_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AuthApi for StubAuthApi {
        async fn login(&self, _email: &str, _password: &str) -> Result<LoginGrant, ApiError> {
            self.login_calls.fetch_add(1, Ordering::SeqCst);
            self.login_outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(ApiError::Rejected("unscripted login".to_string())))
        }

        async fn verify_token(&self, _token: &str) -> Result<UserProfile, ApiError> {
            self.verify_calls.fetch_add(1, Ordering::SeqCst);
            self.verify_outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(ApiError::Rejected("unscripted verify".to_string())))
        }
    }

    fn profile(name: &str, email: &str) -> UserProfile {
        UserProfile {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    fn grant(token: &str, name: &str, email: &str) -> LoginGrant {
        LoginGrant {
            token: token.to_string(),
            user: profile(name, email),
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> TokenStore {
        TokenStore::new(dir.path().to_path_buf())
    }

    #[tokio::test]
    async fn no_token_resolves_unauthenticated_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(StubAuthApi::default());
        let mut guard = SessionGuard::new(api.clone(), store_in(&dir));

        // Resolved immediately at construction
        assert_eq!(guard.session().status(), SessionStatus::Resolved);
        assert!(!guard.is_authenticated());

        guard.verify_on_start().await;
        assert_eq!(api.verify_calls(), 0);
        assert!(!guard.is_authenticated());
        assert!(guard.user().is_none());
    }

    #[tokio::test]
    async fn stored_token_starts_in_verifying() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save("abc123").unwrap();

        let guard = SessionGuard::new(Arc::new(StubAuthApi::default()), store);
        assert_eq!(guard.session().status(), SessionStatus::Verifying);
        assert!(!guard.is_authenticated());
        assert_eq!(guard.pending_token().as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn verify_success_authenticates_with_exact_profile() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save("abc123").unwrap();

        let api = Arc::new(StubAuthApi::with_verify(Ok(profile("A", "a@x.com"))));
        let mut guard = SessionGuard::new(api, store);
        guard.verify_on_start().await;

        assert_eq!(guard.session().status(), SessionStatus::Resolved);
        assert!(guard.is_authenticated());
        assert_eq!(guard.user(), Some(&profile("A", "a@x.com")));
        assert_eq!(guard.token(), Some("abc123"));
        // Token survives a successful verification
        assert_eq!(store_in(&dir).load().unwrap().as_deref(), Some("abc123"));
    }

    async fn assert_verify_failure_discards_token(failure: ApiError) {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save("stale-token").unwrap();

        let api = Arc::new(StubAuthApi::with_verify(Err(failure)));
        let mut guard = SessionGuard::new(api, store);
        guard.verify_on_start().await;

        assert_eq!(guard.session().status(), SessionStatus::Resolved);
        assert!(!guard.is_authenticated());
        assert!(guard.user().is_none());
        assert!(guard.token().is_none());
        assert!(store_in(&dir).load().unwrap().is_none());
    }

    #[tokio::test]
    async fn verify_rejection_resolves_unauthenticated_and_clears_token() {
        assert_verify_failure_discards_token(ApiError::Rejected("expired".to_string())).await;
    }

    #[tokio::test]
    async fn verify_transport_error_resolves_unauthenticated_and_clears_token() {
        assert_verify_failure_discards_token(ApiError::ServerError("502".to_string())).await;
    }

    #[tokio::test]
    async fn verify_malformed_response_resolves_unauthenticated_and_clears_token() {
        assert_verify_failure_discards_token(ApiError::InvalidResponse(
            "bad envelope".to_string(),
        ))
        .await;
    }

    #[tokio::test]
    async fn login_success_persists_token_and_authenticates() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(StubAuthApi::with_login(Ok(grant(
            "fresh-token",
            "Dana",
            "dana@x.com",
        ))));
        let mut guard = SessionGuard::new(api, store_in(&dir));

        assert!(guard.login("dana@x.com", "hunter2").await);
        assert!(guard.is_authenticated());
        assert_eq!(guard.user(), Some(&profile("Dana", "dana@x.com")));
        assert_eq!(guard.token(), Some("fresh-token"));
        assert_eq!(
            store_in(&dir).load().unwrap().as_deref(),
            Some("fresh-token")
        );
    }

    #[tokio::test]
    async fn login_failure_reports_false_and_persists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(StubAuthApi::with_login(Err(ApiError::Rejected(
            "Invalid credentials".to_string(),
        ))));
        let mut guard = SessionGuard::new(api, store_in(&dir));

        assert!(!guard.login("a@x.com", "wrong").await);
        assert!(!guard.is_authenticated());
        assert!(guard.user().is_none());
        assert!(store_in(&dir).load().unwrap().is_none());
    }

    #[tokio::test]
    async fn relogin_overwrites_token_and_profile() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(StubAuthApi::with_login(Ok(grant("t1", "A", "a@x.com"))));
        api.push_login(Ok(grant("t2", "B", "b@x.com")));
        let mut guard = SessionGuard::new(api.clone(), store_in(&dir));

        assert!(guard.login("a@x.com", "pw").await);
        assert!(guard.login("b@x.com", "pw").await);
        assert_eq!(api.login_calls.load(Ordering::SeqCst), 2);

        assert!(guard.is_authenticated());
        assert_eq!(guard.user(), Some(&profile("B", "b@x.com")));
        assert_eq!(store_in(&dir).load().unwrap().as_deref(), Some("t2"));
    }

    #[tokio::test]
    async fn logout_clears_everything_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(StubAuthApi::with_login(Ok(grant("t1", "A", "a@x.com"))));
        let mut guard = SessionGuard::new(api, store_in(&dir));
        assert!(guard.login("a@x.com", "pw").await);

        guard.logout();
        assert_eq!(guard.session().status(), SessionStatus::Resolved);
        assert!(!guard.is_authenticated());
        assert!(guard.user().is_none());
        assert!(guard.token().is_none());
        assert!(store_in(&dir).load().unwrap().is_none());

        // Logging out while already logged out is a no-op with the same end state
        guard.logout();
        assert!(!guard.is_authenticated());
        assert!(store_in(&dir).load().unwrap().is_none());
    }

    #[tokio::test]
    async fn background_completion_path_matches_inline_verify() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save("abc123").unwrap();

        // The UI runs the verify call on a task and applies the outcome here
        let mut guard = SessionGuard::new(Arc::new(StubAuthApi::default()), store);
        let pending = guard.pending_token();
        assert_eq!(pending.as_deref(), Some("abc123"));

        guard.complete_verification(Some(profile("A", "a@x.com")));
        assert!(guard.is_authenticated());

        // A late second completion must not unseat the resolved session
        guard.complete_verification(None);
        assert!(guard.is_authenticated());
        assert_eq!(guard.user(), Some(&profile("A", "a@x.com")));
    }
}
