//! Auth API Client
//!
//! Binds the `/auth/*` endpoints to typed methods. Holds no session state
//! of its own and never catches: whatever the wrapper returns is returned.

use super::dto::{
    ChangePasswordRequest, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
    RegisterResponse, ResendVerificationRequest, TokenStatus, User, VerifyEmailRequest,
    VerifyEmailResponse,
};
use crate::api::{ApiError, ApiResult, HttpClient, RequestOptions};
use serde_json::Value;

/// Typed facade over the auth service
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: HttpClient,
}

impl AuthClient {
    /// Create a client on top of a request wrapper
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Underlying request wrapper
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Exchange credentials for a bearer token
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginResponse> {
        let options = RequestOptions::post().json(&LoginRequest { username, password })?;
        self.http.request("/auth/login", options).await
    }

    /// Create an account; the server may send a verification e-mail
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> ApiResult<RegisterResponse> {
        let options = RequestOptions::post().json(&RegisterRequest {
            username,
            email,
            password,
        })?;
        self.http.request("/auth/register", options).await
    }

    /// Invalidate the server-side session
    pub async fn logout(&self) -> ApiResult<Value> {
        self.http.request_json("/auth/logout", RequestOptions::post()).await
    }

    /// Profile of the user owning the current credential
    pub async fn current_user(&self) -> ApiResult<User> {
        self.http.request("/auth/me", RequestOptions::get()).await
    }

    /// Ask the server whether the current credential is still valid
    pub async fn verify_token(&self) -> ApiResult<TokenStatus> {
        self.http.request("/auth/verify-token", RequestOptions::get()).await
    }

    /// Change the password of the credential's owner
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> ApiResult<MessageResponse> {
        let options = RequestOptions::post().json(&ChangePasswordRequest {
            current_password,
            new_password,
        })?;
        self.request_message("/auth/change-password", options).await
    }

    /// Redeem an e-mail verification code
    pub async fn verify_email(&self, code: &str) -> ApiResult<VerifyEmailResponse> {
        let options = RequestOptions::post().json(&VerifyEmailRequest { token: code })?;
        self.http.request("/auth/verify-email", options).await
    }

    /// Ask the server to send another verification e-mail
    pub async fn resend_verification_email(&self, email: &str) -> ApiResult<MessageResponse> {
        let options = RequestOptions::post().json(&ResendVerificationRequest { email })?;
        self.request_message("/auth/resend-verification", options).await
    }

    /// Acknowledgement endpoints may answer with no body at all
    async fn request_message(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApiResult<MessageResponse> {
        match self.http.request_json(endpoint, options).await? {
            Value::Null => Ok(MessageResponse::default()),
            value => serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string())),
        }
    }
}
