//! Test doubles shared by the client store tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::Router;
use conceptforge_core::credentials::Credentials;
use conceptforge_core::profile::{Profile, ProfilePatch};
use conceptforge_core::session::SessionUser;
use conceptforge_gateway::{AuthError, AuthGateway, LoginResponse, ProfileError, ProfileGateway};
use conceptforge_storage::{StorageBackend, StorageError};
use tokio::sync::Notify;

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Scripted [`AuthGateway`] that records every call.
pub struct MockAuth {
    login_result: Mutex<Result<LoginResponse, AuthError>>,
    logout_result: Mutex<Result<(), AuthError>>,
    pub logins: Mutex<Vec<Credentials>>,
    pub logouts: Mutex<Vec<String>>,
    /// When set, `login` signals `entered` and then waits on `release`.
    pub gate: Option<Gate>,
    /// Same as `gate`, for `logout`.
    pub logout_gate: Option<Gate>,
}

pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

impl Gate {
    fn new() -> Self {
        Self {
            entered: Notify::new(),
            release: Notify::new(),
        }
    }

    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

impl MockAuth {
    pub fn ok(token: &str, user: Option<SessionUser>) -> Self {
        Self::with_login(Ok(LoginResponse {
            token: token.into(),
            refresh_token: None,
            user,
        }))
    }

    pub fn with_login(result: Result<LoginResponse, AuthError>) -> Self {
        Self {
            login_result: Mutex::new(result),
            logout_result: Mutex::new(Ok(())),
            logins: Mutex::new(Vec::new()),
            logouts: Mutex::new(Vec::new()),
            gate: None,
            logout_gate: None,
        }
    }

    pub fn gated(mut self) -> Self {
        self.gate = Some(Gate::new());
        self
    }

    pub fn gated_logout(mut self) -> Self {
        self.logout_gate = Some(Gate::new());
        self
    }

    /// Make later logins succeed with `token`.
    pub fn set_token(&self, token: &str) {
        *self.login_result.lock().unwrap() = Ok(LoginResponse {
            token: token.into(),
            refresh_token: None,
            user: None,
        });
    }

    pub fn failing_logout(self, err: AuthError) -> Self {
        *self.logout_result.lock().unwrap() = Err(err);
        self
    }

    pub fn login_count(&self) -> usize {
        self.logins.lock().unwrap().len()
    }

    pub fn logout_count(&self) -> usize {
        self.logouts.lock().unwrap().len()
    }
}

#[async_trait]
impl AuthGateway for MockAuth {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError> {
        self.logins.lock().unwrap().push(credentials.clone());
        if let Some(gate) = &self.gate {
            gate.pass().await;
        }
        self.login_result.lock().unwrap().clone()
    }

    async fn logout(&self, token: &str) -> Result<(), AuthError> {
        self.logouts.lock().unwrap().push(token.to_string());
        if let Some(gate) = &self.logout_gate {
            gate.pass().await;
        }
        self.logout_result.lock().unwrap().clone()
    }
}

/// Gateway whose login never completes.
pub struct HangingAuth;

#[async_trait]
impl AuthGateway for HangingAuth {
    async fn login(&self, _credentials: &Credentials) -> Result<LoginResponse, AuthError> {
        std::future::pending().await
    }

    async fn logout(&self, _token: &str) -> Result<(), AuthError> {
        std::future::pending().await
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// In-memory [`ProfileGateway`] that applies patches like the real one and
/// can be told to fail.
pub struct MockProfiles {
    pub record: Mutex<Profile>,
    pub fail_fetch: Mutex<Option<ProfileError>>,
    pub fail_update: Mutex<Option<ProfileError>>,
    pub updates: Mutex<Vec<ProfilePatch>>,
    pub clears: AtomicUsize,
    /// When set, `update_profile` signals `entered` and then waits on `release`.
    pub update_gate: Option<Gate>,
}

impl MockProfiles {
    pub fn new(record: Profile) -> Self {
        Self {
            record: Mutex::new(record),
            fail_fetch: Mutex::new(None),
            fail_update: Mutex::new(None),
            updates: Mutex::new(Vec::new()),
            clears: AtomicUsize::new(0),
            update_gate: None,
        }
    }

    pub fn gated_update(mut self) -> Self {
        self.update_gate = Some(Gate::new());
        self
    }

    pub fn fail_fetch(&self, err: ProfileError) {
        *self.fail_fetch.lock().unwrap() = Some(err);
    }

    pub fn fail_update(&self, err: ProfileError) {
        *self.fail_update.lock().unwrap() = Some(err);
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }
}

#[async_trait]
impl ProfileGateway for MockProfiles {
    async fn fetch_profile(&self) -> Result<Profile, ProfileError> {
        if let Some(err) = self.fail_fetch.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.record.lock().unwrap().clone())
    }

    async fn update_profile(&self, patch: ProfilePatch) -> Result<Profile, ProfileError> {
        self.updates.lock().unwrap().push(patch.clone());
        if let Some(gate) = &self.update_gate {
            gate.pass().await;
        }
        // Yield so concurrent updates would interleave if not serialized.
        tokio::task::yield_now().await;
        if let Some(err) = self.fail_update.lock().unwrap().clone() {
            return Err(err);
        }
        let mut record = self.record.lock().unwrap();
        *record = record.apply(&patch, chrono::Utc::now());
        Ok(record.clone())
    }

    async fn clear_stored_profile(&self) -> Result<(), ProfileError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Backend that fails every operation.
pub struct BrokenBackend;

impl StorageBackend for BrokenBackend {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("disk on fire".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("disk on fire".into()))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("disk on fire".into()))
    }
}

pub fn broken_storage() -> conceptforge_storage::DurableStorage {
    conceptforge_storage::DurableStorage::new(Arc::new(BrokenBackend))
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

/// Start an API on `127.0.0.1:0` answering every request with `status` and
/// a JSON `body`. Returns its base URL.
pub async fn spawn_json_api(status: StatusCode, body: &'static str) -> String {
    let app = Router::new().fallback(move || async move {
        (status, [(CONTENT_TYPE, "application/json")], body)
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind should succeed");
    let addr = listener.local_addr().expect("listener has an address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake API should run");
    });

    format!("http://{addr}")
}
