//! Domain API Clients
//!
//! Typed facades binding fixed endpoints to methods:
//!
//! - **auth**: login, registration, profile, token and e-mail verification
//! - **timeline**: eras and sub-eras
//! - **dto**: request and response types
//!
//! Clients hold no session state and never persist credentials; they run
//! single calls through [`HttpClient`](crate::api::HttpClient) and return
//! its result unchanged.

mod auth;
pub mod dto;
mod timeline;

pub use auth::AuthClient;
pub use dto::{
    Era, LoginResponse, MessageResponse, RegisterResponse, TokenStatus, User,
    VerifyEmailResponse,
};
pub use timeline::{EraFilter, TimelineClient};

/// Append the non-empty parameters to `path` as a percent-encoded query string
pub(crate) fn with_query(path: &str, params: &[(&str, Option<String>)]) -> String {
    let query: Vec<String> = params
        .iter()
        .filter_map(|(name, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| format!("{}={}", name, urlencoding::encode(v)))
        })
        .collect();

    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query.join("&"))
    }
}
