//! Session State
//!
//! The single owner of the credential and the user profile. Reads are
//! public; every mutator is crate-private so only the auth manager and the
//! request wrapper's 401 handling can change who is logged in, and both go
//! through [`SessionStore::clear`] to drop a credential.

use crate::clients::User;
use crate::storage::{KeyValueStore, StorageResult, AUTH_TOKEN_KEY};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Where the session sits in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No usable credential and profile
    Anonymous,
    /// A login, registration or verification call is in flight
    Authenticating,
    /// Credential and profile are both present
    Authenticated,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SessionPhase::Anonymous => "anonymous",
            SessionPhase::Authenticating => "authenticating",
            SessionPhase::Authenticated => "authenticated",
        };
        f.write_str(label)
    }
}

/// Point-in-time copy of the session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// Bearer credential
    pub token: Option<String>,
    /// Profile of the logged-in user
    pub user: Option<User>,
    /// Set while an authenticating call is in flight
    pub loading: bool,
}

impl SessionState {
    /// True iff both credential and profile are present and non-empty
    pub fn is_logged_in(&self) -> bool {
        let has_token = self.token.as_deref().is_some_and(|t| !t.is_empty());
        has_token && self.user.is_some()
    }

    /// Lifecycle phase derived from the fields
    pub fn phase(&self) -> SessionPhase {
        if self.loading {
            SessionPhase::Authenticating
        } else if self.is_logged_in() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        }
    }

    /// Whether the current user is an administrator
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin)
    }

    /// Whether the current user has verified their e-mail
    pub fn is_email_verified(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_email_verified)
    }

    /// Username, or "Guest" when nobody is logged in
    pub fn display_name(&self) -> &str {
        self.user.as_ref().map(|u| u.username.as_str()).unwrap_or("Guest")
    }
}

/// Shared handle to the session
///
/// Cloning is cheap; all clones observe the same state and storage.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<RwLock<SessionState>>,
    storage: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Open the session, picking up a credential persisted by a previous run
    ///
    /// An unreadable slot is logged and treated as no credential.
    pub fn restore(storage: Arc<dyn KeyValueStore>) -> Self {
        let token = match storage.get(AUTH_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted credential");
                None
            }
        };

        if token.is_some() {
            tracing::debug!("Restored persisted credential");
        }

        Self {
            state: Arc::new(RwLock::new(SessionState {
                token,
                user: None,
                loading: false,
            })),
            storage,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the whole session
    pub fn snapshot(&self) -> SessionState {
        self.read().clone()
    }

    /// Current bearer credential
    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    /// Whether a credential is held
    pub fn has_token(&self) -> bool {
        self.read().token.is_some()
    }

    /// Current user profile
    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    /// True iff both credential and profile are present
    pub fn is_logged_in(&self) -> bool {
        self.read().is_logged_in()
    }

    /// Lifecycle phase
    pub fn phase(&self) -> SessionPhase {
        self.read().phase()
    }

    /// Whether an authenticating call is in flight
    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    /// Whether the current user is an administrator
    pub fn is_admin(&self) -> bool {
        self.read().is_admin()
    }

    /// Whether the current user has verified their e-mail
    pub fn is_email_verified(&self) -> bool {
        self.read().is_email_verified()
    }

    /// Username, or "Guest"
    pub fn display_name(&self) -> String {
        self.read().display_name().to_string()
    }

    /// Persist and adopt a new credential
    ///
    /// Storage is written first; on failure the in-memory state is untouched.
    /// The write lock spans both so memory and storage never disagree.
    pub(crate) fn set_token(&self, token: &str) -> StorageResult<()> {
        let mut state = self.write();
        self.storage.set(AUTH_TOKEN_KEY, token)?;
        state.token = Some(token.to_string());
        drop(state);

        tracing::debug!("Credential stored");
        Ok(())
    }

    /// Adopt a profile; refused when no credential is held
    pub(crate) fn set_user(&self, user: User) -> bool {
        let mut state = self.write();
        if state.token.is_none() {
            tracing::debug!(user_id = user.id, "Dropping profile without a credential");
            return false;
        }
        state.user = Some(user);
        true
    }

    pub(crate) fn set_loading(&self, loading: bool) {
        self.write().loading = loading;
    }

    /// Drop the credential and profile from memory and from storage
    ///
    /// The only path that removes a credential. Idempotent.
    pub(crate) fn clear(&self) {
        let had_token = {
            let mut state = self.write();
            state.user = None;
            let had_token = state.token.take().is_some();

            if let Err(e) = self.storage.remove(AUTH_TOKEN_KEY) {
                tracing::warn!(error = %e, "Failed to remove persisted credential");
            }
            had_token
        };

        if had_token {
            tracing::info!("Session cleared");
        }
    }

    /// Marks the session as authenticating until dropped
    pub(crate) fn loading_guard(&self) -> LoadingGuard<'_> {
        self.set_loading(true);
        LoadingGuard { session: self }
    }
}

/// Resets the loading flag on drop, including on early return
pub(crate) struct LoadingGuard<'a> {
    session: &'a SessionStore,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.session.set_loading(false);
    }
}
