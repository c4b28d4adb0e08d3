//! Application Context
//!
//! Bootstraps the client from configuration: one storage backend, one
//! session shared by every request wrapper, the domain clients on top, and
//! the UI collaborators.

use crate::api::{ApiResult, HttpClient};
use crate::clients::{AuthClient, TimelineClient};
use crate::config::Config;
use crate::session::{AuthManager, SessionPhase, SessionStore};
use crate::storage::{FileStore, KeyValueStore};
use crate::ui::{NotificationCenter, ThemePreference};
use std::sync::Arc;

/// Everything a front end needs, wired to a single session
#[derive(Clone)]
pub struct AppContext {
    /// Session/auth state manager
    pub auth: AuthManager,
    /// Timeline lookups
    pub timeline: TimelineClient,
    /// Outcome messages for the user
    pub notifications: Arc<NotificationCenter>,
    /// Persisted theme
    pub theme: ThemePreference,
}

impl AppContext {
    /// Build a context persisting state under the configured data directory
    pub fn from_config(config: &Config) -> ApiResult<Self> {
        let storage = Arc::new(FileStore::new(config.storage.data_path()));
        tracing::debug!(dir = ?storage.dir(), "Using client state directory");
        Self::with_storage(config, storage)
    }

    /// Build a context on an arbitrary storage backend
    pub fn with_storage(config: &Config, storage: Arc<dyn KeyValueStore>) -> ApiResult<Self> {
        let session = SessionStore::restore(Arc::clone(&storage));
        let timeout = config.api.request_timeout();

        let auth_http = HttpClient::new(&config.api.auth_url, session.clone(), timeout)?;
        let timeline_http = HttpClient::new(&config.api.timeline_url, session, timeout)?;

        Ok(Self {
            auth: AuthManager::new(AuthClient::new(auth_http)),
            timeline: TimelineClient::new(timeline_http),
            notifications: Arc::new(NotificationCenter::new()),
            theme: ThemePreference::new(storage),
        })
    }

    /// Read access to the shared session
    pub fn session(&self) -> &SessionStore {
        self.auth.session()
    }

    /// Reconcile any persisted credential with the server
    pub async fn init(&self) -> SessionPhase {
        self.auth.init().await
    }
}
