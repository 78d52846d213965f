//! Composition root: builds both stores once and hands them out.

use std::sync::Arc;

use conceptforge_gateway::{AuthGateway, HttpAuthGateway, LocalProfileGateway, ProfileGateway};
use conceptforge_storage::DurableStorage;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::profile::ProfileStore;
use crate::session::SessionStore;

/// The process-wide pair of stores, created at startup and passed
/// explicitly to whatever needs them.
#[derive(Clone)]
pub struct ClientContext {
    pub session: Arc<SessionStore>,
    pub profile: Arc<ProfileStore>,
}

impl ClientContext {
    /// Wire the stores to the given collaborators.
    pub fn new(
        config: &ClientConfig,
        storage: DurableStorage,
        auth: Arc<dyn AuthGateway>,
        profile: Arc<dyn ProfileGateway>,
    ) -> Self {
        let session = SessionStore::new(auth, storage)
            .with_storage_key(config.session_key.clone())
            .with_request_timeout(config.request_timeout)
            .with_routes(config.routes.clone());
        let profile = ProfileStore::new(profile).with_request_timeout(config.request_timeout);

        Self {
            session: Arc::new(session),
            profile: Arc::new(profile),
        }
    }

    /// Build the production wiring: file storage under
    /// `config.storage_dir`, HTTP auth against `config.api_base_url`, and
    /// the storage-backed profile gateway.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let storage = DurableStorage::file(&config.storage_dir);

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        let auth = HttpAuthGateway::with_client(http, config.api_base_url.clone());

        let profile = LocalProfileGateway::new(storage.clone(), config.profile_key.clone())
            .with_latency(config.profile_fetch_latency, config.profile_update_latency);

        Ok(Self::new(config, storage, Arc::new(auth), Arc::new(profile)))
    }

    /// Startup: hydrate the session, then load the profile.
    pub async fn init(&self) {
        self.session.initialize().await;
        self.profile.load().await;
    }
}
