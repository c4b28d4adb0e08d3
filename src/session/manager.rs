//! Auth Manager
//!
//! Drives the session through its lifecycle:
//!
//! ```text
//!   Anonymous ──login/verify_email──▶ Authenticating ──ok──▶ Authenticated
//!       ▲                                   │                     │
//!       └──────────────fail─────────────────┘                     │
//!       └───────────logout / 401 / failed verify_token────────────┘
//! ```
//!
//! Flows without recovery semantics (`login`, `register`,
//! `change_password`) return their error after cleanup. Best-effort flows
//! (`logout`, `verify_token`, `check_auth_status`) log and carry on.

use super::error::AuthResult;
use super::state::{SessionPhase, SessionStore};
use crate::api::ApiError;
use crate::clients::{
    AuthClient, LoginResponse, MessageResponse, RegisterResponse, TokenStatus, User,
};

/// Outcome of e-mail verification, reported inline rather than as an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Verified and logged in
    Verified { message: String },
    /// Verification did not complete
    Failed { error: String },
}

impl VerificationOutcome {
    /// Whether verification completed and the user is logged in
    pub fn is_success(&self) -> bool {
        matches!(self, VerificationOutcome::Verified { .. })
    }

    /// Message to show the user either way
    pub fn message(&self) -> &str {
        match self {
            VerificationOutcome::Verified { message } => message,
            VerificationOutcome::Failed { error } => error,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        VerificationOutcome::Failed {
            error: error.into(),
        }
    }
}

/// Session/auth state manager
///
/// Shares its [`SessionStore`] with the auth client's request wrapper, so a
/// 401 seen by any request lands in the same state this manager reads.
#[derive(Debug, Clone)]
pub struct AuthManager {
    client: AuthClient,
    session: SessionStore,
}

impl AuthManager {
    /// Create a manager owning the session the client presents
    pub fn new(client: AuthClient) -> Self {
        let session = client.http().session().clone();
        Self { client, session }
    }

    /// Read access to the session
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Underlying auth API client
    pub fn client(&self) -> &AuthClient {
        &self.client
    }

    /// Log in, store the credential and fetch the profile
    ///
    /// Any failure leaves the session anonymous.
    pub async fn login(&self, username: &str, password: &str) -> AuthResult<LoginResponse> {
        let _loading = self.session.loading_guard();

        match self.login_and_fetch(username, password).await {
            Ok(response) => {
                tracing::info!(username, "Logged in");
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(username, error = %e, "Login failed");
                self.session.clear();
                Err(e)
            }
        }
    }

    async fn login_and_fetch(&self, username: &str, password: &str) -> AuthResult<LoginResponse> {
        let response = self.client.login(username, password).await?;
        if response.access_token.is_empty() {
            return Err(ApiError::Decode("empty access_token in login response".into()).into());
        }

        self.session.set_token(&response.access_token)?;
        self.current_user().await?;
        Ok(response)
    }

    /// Best-effort server logout, then an unconditional local clear
    pub async fn logout(&self) {
        if self.session.has_token() {
            if let Err(e) = self.client.logout().await {
                tracing::warn!(error = %e, "Server logout failed, clearing local session anyway");
            }
        }

        self.session.clear();
    }

    /// Fetch and cache the profile for the current credential
    ///
    /// `None` without a credential. A failed fetch clears the session.
    pub async fn current_user(&self) -> AuthResult<Option<User>> {
        if !self.session.has_token() {
            return Ok(None);
        }

        match self.client.current_user().await {
            Ok(user) => {
                if self.session.set_user(user.clone()) {
                    Ok(Some(user))
                } else {
                    Ok(None)
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch current user");
                self.session.clear();
                Err(e.into())
            }
        }
    }

    /// Create an account; the session is left as it was
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> AuthResult<RegisterResponse> {
        let _loading = self.session.loading_guard();
        let response = self.client.register(username, email, password).await?;
        tracing::info!(
            username,
            verification_sent = response.verification_sent,
            "Registered"
        );
        Ok(response)
    }

    /// Redeem a verification code; a response carrying a credential logs
    /// the user in
    pub async fn verify_email(&self, code: &str) -> VerificationOutcome {
        let _loading = self.session.loading_guard();

        let response = match self.client.verify_email(code).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Email verification failed");
                return VerificationOutcome::failed(
                    e.detail().unwrap_or("Email verification failed"),
                );
            }
        };

        let Some(token) = response.access_token.filter(|t| !t.is_empty()) else {
            return VerificationOutcome::failed("No access token received");
        };

        if let Err(e) = self.session.set_token(&token) {
            self.session.clear();
            return VerificationOutcome::failed(e.to_string());
        }

        match response.user {
            Some(user) => {
                self.session.set_user(user);
            }
            None => {
                if let Err(e) = self.current_user().await {
                    return VerificationOutcome::failed(e.user_message());
                }
            }
        }

        tracing::info!(user = %self.session.display_name(), "Email verified");
        VerificationOutcome::Verified {
            message: response.message,
        }
    }

    /// Ask for another verification e-mail; the session is untouched
    pub async fn resend_verification_email(&self, email: &str) -> AuthResult<MessageResponse> {
        Ok(self.client.resend_verification_email(email).await?)
    }

    /// Change the password; the stored credential is not rotated
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> AuthResult<MessageResponse> {
        Ok(self
            .client
            .change_password(current_password, new_password)
            .await?)
    }

    /// Probe the credential; anything but a positive answer clears the session
    pub async fn verify_token(&self) -> bool {
        if !self.session.has_token() {
            return false;
        }

        match self.client.verify_token().await {
            Ok(TokenStatus { valid: true }) => true,
            Ok(TokenStatus { valid: false }) => {
                tracing::info!("Server reports credential invalid");
                self.session.clear();
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token verification failed");
                self.session.clear();
                false
            }
        }
    }

    /// Reconcile a persisted credential with the server
    ///
    /// The profile is only fetched when the probe succeeds and none is
    /// cached yet.
    pub async fn check_auth_status(&self) {
        if !self.session.has_token() {
            return;
        }

        if self.verify_token().await && self.session.user().is_none() {
            if let Err(e) = self.current_user().await {
                tracing::warn!(error = %e, "Auth status check failed");
            }
        }
    }

    /// Startup entry point; the only place a persisted session is rehydrated
    pub async fn init(&self) -> SessionPhase {
        self.check_auth_status().await;
        let phase = self.session.phase();
        tracing::debug!(%phase, "Session initialised");
        phase
    }
}
