//! Comics Timeline API Transport
//!
//! The request wrapper shared by every domain client.
//!
//! # Contract
//!
//! - `request(endpoint, options)` appends `endpoint` to the base address
//! - Headers: `Content-Type: application/json`, then
//!   `Authorization: Bearer <credential>` when the session holds one, then
//!   caller overrides (caller wins)
//! - Non-2xx responses become [`ApiError::Http`] with the status and the
//!   parsed error body (`{"detail": "Request failed"}` when unparseable)
//! - A 401 additionally clears the session
//! - Transport failures surface as [`ApiError::Transport`]
//!
//! # Example
//!
//! ```rust,no_run
//! use comics_timeline::api::{HttpClient, RequestOptions};
//! use comics_timeline::session::SessionStore;
//! use comics_timeline::storage::MemoryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = SessionStore::restore(Arc::new(MemoryStore::new()));
//!     let http = HttpClient::new("http://localhost:8000", session, None)?;
//!
//!     let eras = http.request_json("/timeline/eras", RequestOptions::get()).await?;
//!     println!("{}", eras);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;

pub use client::{HttpClient, RequestOptions};
pub use error::{ApiError, ApiResult, GENERIC_FAILURE_DETAIL};
