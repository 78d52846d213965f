//! Session store: the authenticated actor, its token, and its persistence.
//!
//! The store is hydrated once from [`DurableStorage`] by
//! [`SessionStore::initialize`], mutated only by
//! [`SessionStore::authenticate`] (all fields at once) and
//! [`SessionStore::deauthenticate`] (clears all fields), and writes the
//! whole session record after every successful in-memory change. Storage
//! failures are logged and never reach the caller.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use conceptforge_core::credentials::Credentials;
use conceptforge_core::session::{AuthState, Session, SessionUser};
use conceptforge_gateway::{AuthError, AuthGateway};
use conceptforge_storage::DurableStorage;
use tokio::sync::RwLock;

use crate::config::{RoleRoutes, DEFAULT_SESSION_KEY};

/// Gateway call timeout used unless overridden.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Owns the current [`AuthState`].
pub struct SessionStore {
    gateway: Arc<dyn AuthGateway>,
    storage: DurableStorage,
    storage_key: String,
    request_timeout: Duration,
    routes: RoleRoutes,
    state: RwLock<AuthState>,
    hydrated: AtomicBool,
    login_in_flight: AtomicBool,
}

/// Clears the in-flight flag when a sign-in attempt ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SessionStore {
    /// Create an empty, not-yet-hydrated store.
    pub fn new(gateway: Arc<dyn AuthGateway>, storage: DurableStorage) -> Self {
        Self {
            gateway,
            storage,
            storage_key: DEFAULT_SESSION_KEY.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            routes: RoleRoutes::default(),
            state: RwLock::new(AuthState::LoggedOut),
            hydrated: AtomicBool::new(false),
            login_in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_routes(mut self, routes: RoleRoutes) -> Self {
        self.routes = routes;
        self
    }

    // ---- hydration ----

    /// Populate the state from storage, then mark the store hydrated.
    ///
    /// Missing, unreadable, or incomplete stored sessions all hydrate as
    /// [`AuthState::LoggedOut`]. The store yields to the runtime once
    /// before flipping [`is_hydrated`](Self::is_hydrated), so observers can
    /// tell "still reading" from "confirmed logged out". Calling it again
    /// after hydration returns the current state untouched.
    pub async fn initialize(&self) -> AuthState {
        if self.is_hydrated() {
            return self.state().await;
        }

        let stored = match self.storage.read::<Session>(&self.storage_key) {
            Ok(stored) => stored.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(
                    key = %self.storage_key,
                    error = %e,
                    "Unable to read stored session"
                );
                Session::empty()
            }
        };

        let state = stored.into_state();
        *self.state.write().await = state.clone();

        tokio::task::yield_now().await;
        self.hydrated.store(true, Ordering::Release);

        tracing::info!(authenticated = state.is_authenticated(), "Session hydrated");
        state
    }

    // ---- mutations ----

    /// Sign in and persist the resulting session.
    ///
    /// Fails without touching memory or storage when the credentials are
    /// invalid, another sign-in is still running, the gateway rejects the
    /// login, the response lacks a token, or the request does not complete.
    pub async fn authenticate(&self, credentials: Credentials) -> Result<Session, AuthError> {
        credentials.ensure_valid()?;
        let _guard = InFlightGuard::acquire(&self.login_in_flight).ok_or(AuthError::InFlight)?;

        let response = self.call(self.gateway.login(&credentials)).await?;
        if response.token.is_empty() {
            return Err(AuthError::Protocol(
                "response did not include a token".into(),
            ));
        }

        let user = response
            .user
            .unwrap_or_else(|| SessionUser::new(credentials.email.clone(), credentials.role));
        let state = AuthState::LoggedIn {
            token: response.token,
            refresh_token: response.refresh_token.filter(|t| !t.is_empty()),
            user,
        };
        let session = state.to_session();

        {
            let mut current = self.state.write().await;
            *current = state;
            self.persist(&session);
        }

        tracing::info!(email = %credentials.email, role = %credentials.role, "Signed in");
        Ok(session)
    }

    /// Sign out locally and notify the gateway.
    ///
    /// Already logged out: succeeds without a remote call. Otherwise the
    /// local session is cleared whatever the gateway answers, and any
    /// gateway failure is returned afterwards for reporting. A session that
    /// replaced the signed-out one while the gateway call was running is
    /// left in place.
    pub async fn deauthenticate(&self) -> Result<(), AuthError> {
        let Some(token) = self.token().await else {
            return Ok(());
        };

        let remote = self.call(self.gateway.logout(&token)).await;

        {
            let mut state = self.state.write().await;
            if state.token() == Some(token.as_str()) {
                *state = AuthState::LoggedOut;
                if let Err(e) = self.storage.remove(&self.storage_key) {
                    tracing::warn!(
                        key = %self.storage_key,
                        error = %e,
                        "Unable to clear stored session"
                    );
                }
            } else {
                tracing::debug!("Session replaced during sign-out, keeping the new one");
            }
        }

        match &remote {
            Ok(()) => tracing::info!("Signed out"),
            Err(e) => tracing::warn!(error = %e, "Failed to notify server of logout"),
        }
        remote
    }

    // ---- accessors ----

    pub async fn state(&self) -> AuthState {
        self.state.read().await.clone()
    }

    /// Persistable view of the current state.
    pub async fn session(&self) -> Session {
        self.state.read().await.to_session()
    }

    pub async fn token(&self) -> Option<String> {
        self.state.read().await.token().map(str::to_string)
    }

    pub async fn user(&self) -> Option<SessionUser> {
        self.state.read().await.user().cloned()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated.load(Ordering::Acquire)
    }

    /// Landing route for the signed-in user's role.
    pub async fn home_route(&self) -> Option<String> {
        self.user()
            .await
            .map(|user| self.routes.home_for(user.role).to_string())
    }

    // ---- private helpers ----

    async fn call<T>(
        &self,
        request: impl Future<Output = Result<T, AuthError>>,
    ) -> Result<T, AuthError> {
        match tokio::time::timeout(self.request_timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(AuthError::Network(format!(
                "request timed out after {}ms",
                self.request_timeout.as_millis()
            ))),
        }
    }

    fn persist(&self, session: &Session) {
        if let Err(e) = self.storage.write(&self.storage_key, session) {
            tracing::warn!(key = %self.storage_key, error = %e, "Unable to persist session");
        }
    }
}
