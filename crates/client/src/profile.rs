//! Profile store: the editable account record and its load/update status.
//!
//! Operations here never return `Err`. [`ProfileStore::load`] reports
//! failure through [`ProfileSnapshot::status`] and
//! [`ProfileStore::update`] through an [`UpdateOutcome`], because both are
//! driven straight from UI lifecycle hooks and submit handlers.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use conceptforge_core::profile::{Profile, ProfilePatch};
use conceptforge_gateway::{ProfileError, ProfileGateway};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};

/// Gateway call timeout used unless overridden.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the profile record currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileStatus {
    Loading,
    Ready,
    Error,
    /// Cleared by an explicit logout; distinct from `Error`.
    LoggedOut,
}

/// Point-in-time view of the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSnapshot {
    pub status: ProfileStatus,
    pub user: Option<Profile>,
    /// Last failure, cleared when the next load or update starts.
    pub error: Option<ProfileError>,
    pub updating: bool,
}

impl Default for ProfileSnapshot {
    fn default() -> Self {
        Self {
            status: ProfileStatus::Loading,
            user: None,
            error: None,
            updating: false,
        }
    }
}

/// Result of [`ProfileStore::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Updated(Profile),
    Failed(ProfileError),
}

impl UpdateOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Updated(_))
    }

    pub fn profile(&self) -> Option<&Profile> {
        match self {
            Self::Updated(profile) => Some(profile),
            Self::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ProfileError> {
        match self {
            Self::Updated(_) => None,
            Self::Failed(err) => Some(err),
        }
    }
}

/// Owns the in-memory profile and drives the [`ProfileGateway`].
pub struct ProfileStore {
    gateway: Arc<dyn ProfileGateway>,
    request_timeout: Duration,
    state: RwLock<ProfileSnapshot>,
    /// Serializes updates and logout so each one sees the previous result.
    update_lock: Mutex<()>,
}

impl ProfileStore {
    pub fn new(gateway: Arc<dyn ProfileGateway>) -> Self {
        Self {
            gateway,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            state: RwLock::new(ProfileSnapshot::default()),
            update_lock: Mutex::new(()),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Fetch the profile. On failure the previous user is kept and the
    /// error is exposed through the snapshot.
    pub async fn load(&self) {
        {
            let mut state = self.state.write().await;
            state.status = ProfileStatus::Loading;
            state.error = None;
        }

        let result = self.call(self.gateway.fetch_profile()).await;

        let mut state = self.state.write().await;
        match result {
            Ok(profile) => {
                tracing::debug!(profile_id = %profile.id, "Profile loaded");
                state.user = Some(profile);
                state.status = ProfileStatus::Ready;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch profile");
                state.error = Some(e);
                state.status = ProfileStatus::Error;
            }
        }
    }

    /// Reload after a logout; with nothing stored this yields the demo
    /// fixture again.
    pub async fn restore_demo_profile(&self) {
        self.load().await;
    }

    /// Merge `patch` over the current user and save it through the gateway.
    ///
    /// The in-memory user is replaced only on success. Concurrent calls run
    /// one at a time.
    pub async fn update(&self, patch: ProfilePatch) -> UpdateOutcome {
        if let Err(e) = patch.ensure_valid() {
            let err = ProfileError::from(e);
            self.state.write().await.error = Some(err.clone());
            return UpdateOutcome::Failed(err);
        }

        let _serial = self.update_lock.lock().await;

        let merged = {
            let mut state = self.state.write().await;
            state.updating = true;
            state.error = None;
            match &state.user {
                Some(current) => ProfilePatch::from(current).overlay(patch),
                None => patch,
            }
        };

        let result = self.call(self.gateway.update_profile(merged)).await;

        let mut state = self.state.write().await;
        state.updating = false;
        match result {
            Ok(profile) => {
                tracing::info!(profile_id = %profile.id, "Profile updated");
                state.user = Some(profile.clone());
                state.status = ProfileStatus::Ready;
                UpdateOutcome::Updated(profile)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to update profile");
                state.error = Some(e.clone());
                UpdateOutcome::Failed(e)
            }
        }
    }

    /// Forget the stored record and enter [`ProfileStatus::LoggedOut`].
    ///
    /// Waits for a running update to finish first, so its result cannot
    /// land after the record is cleared.
    pub async fn logout(&self) {
        let _serial = self.update_lock.lock().await;

        if let Err(e) = self.call(self.gateway.clear_stored_profile()).await {
            tracing::warn!(error = %e, "Unable to clear stored profile");
        }

        let mut state = self.state.write().await;
        state.user = None;
        state.error = None;
        state.updating = false;
        state.status = ProfileStatus::LoggedOut;
    }

    // ---- accessors ----

    pub async fn snapshot(&self) -> ProfileSnapshot {
        self.state.read().await.clone()
    }

    pub async fn status(&self) -> ProfileStatus {
        self.state.read().await.status
    }

    pub async fn user(&self) -> Option<Profile> {
        self.state.read().await.user.clone()
    }

    // ---- private helpers ----

    async fn call<T>(
        &self,
        request: impl Future<Output = Result<T, ProfileError>>,
    ) -> Result<T, ProfileError> {
        tokio::time::timeout(self.request_timeout, request)
            .await
            .unwrap_or_else(|_| {
                Err(ProfileError::Timeout {
                    after_ms: self.request_timeout.as_millis() as u64,
                })
            })
    }
}
