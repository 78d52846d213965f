//! Profile Gateway: fetch, update, and clear the user's profile record.
//!
//! [`LocalProfileGateway`] is the demo implementation: it keeps the record
//! in [`DurableStorage`], seeds it from a fixture when nothing is stored,
//! and waits a configurable latency before answering so callers exercise
//! their loading states.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use conceptforge_core::profile::{default_profile, Profile, ProfilePatch};
use conceptforge_storage::DurableStorage;

use crate::error::ProfileError;

/// Latency of a simulated profile fetch.
pub const DEFAULT_FETCH_LATENCY: Duration = Duration::from_millis(350);

/// Latency of a simulated profile update.
pub const DEFAULT_UPDATE_LATENCY: Duration = Duration::from_millis(250);

/// Storage key used when none is configured.
pub const DEFAULT_PROFILE_KEY: &str = "concept-app-demo-profile";

/// Anything that can serve the current user's profile.
#[async_trait]
pub trait ProfileGateway: Send + Sync {
    /// The current profile.
    async fn fetch_profile(&self) -> Result<Profile, ProfileError>;

    /// Merge `patch` over the authoritative record, stamp `updated_at`,
    /// persist, and return the final record.
    async fn update_profile(&self, patch: ProfilePatch) -> Result<Profile, ProfileError>;

    /// Forget the stored record.
    async fn clear_stored_profile(&self) -> Result<(), ProfileError>;
}

/// Storage-backed profile gateway with simulated latency.
pub struct LocalProfileGateway {
    storage: DurableStorage,
    key: String,
    fixture: Profile,
    fetch_latency: Duration,
    update_latency: Duration,
}

impl LocalProfileGateway {
    pub fn new(storage: DurableStorage, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            fixture: default_profile(),
            fetch_latency: DEFAULT_FETCH_LATENCY,
            update_latency: DEFAULT_UPDATE_LATENCY,
        }
    }

    /// Override the simulated latencies. `Duration::ZERO` skips the wait.
    pub fn with_latency(mut self, fetch: Duration, update: Duration) -> Self {
        self.fetch_latency = fetch;
        self.update_latency = update;
        self
    }

    /// Seed record returned when storage holds nothing.
    pub fn with_fixture(mut self, fixture: Profile) -> Self {
        self.fixture = fixture;
        self
    }

    /// Stored record, or `None` if absent or unreadable.
    fn read_stored(&self) -> Option<Profile> {
        match self.storage.read::<Profile>(&self.key) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Unable to read stored profile");
                None
            }
        }
    }

    async fn simulate_latency(latency: Duration) {
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl ProfileGateway for LocalProfileGateway {
    async fn fetch_profile(&self) -> Result<Profile, ProfileError> {
        Self::simulate_latency(self.fetch_latency).await;
        Ok(self.read_stored().unwrap_or_else(|| self.fixture.clone()))
    }

    async fn update_profile(&self, patch: ProfilePatch) -> Result<Profile, ProfileError> {
        Self::simulate_latency(self.update_latency).await;

        let current = self.read_stored().unwrap_or_else(|| self.fixture.clone());
        let next = current.apply(&patch, Utc::now());

        if let Err(e) = self.storage.write(&self.key, &next) {
            tracing::warn!(key = %self.key, error = %e, "Unable to persist profile");
        }

        tracing::debug!(profile_id = %next.id, "Profile updated");
        Ok(next)
    }

    async fn clear_stored_profile(&self) -> Result<(), ProfileError> {
        if let Err(e) = self.storage.remove(&self.key) {
            tracing::warn!(key = %self.key, error = %e, "Unable to clear stored profile");
        }
        Ok(())
    }
}
