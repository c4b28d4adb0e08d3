//! # Comics Timeline
//!
//! Client core for the comics timeline service: session lifecycle, typed API
//! clients and the small amount of UI state a front end needs.
//!
//! ## Modules
//!
//! - [`storage`]: Durable named slots (`auth_token`, `theme`)
//! - [`api`]: HTTP request wrapper with bearer injection and error normalisation
//! - [`clients`]: Typed auth and timeline API facades
//! - [`session`]: Session state and the auth state manager
//! - [`ui`]: Notifications and theme preference
//! - [`context`]: Wires everything together from [`config`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use comics_timeline::{AppContext, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ctx = AppContext::from_config(&Config::load_default())?;
//!
//!     // Rehydrate any persisted session
//!     ctx.init().await;
//!
//!     match ctx.auth.login("alice", "hunter2").await {
//!         Ok(_) => ctx.notifications.show_success("Logged in"),
//!         Err(e) => ctx.notifications.show_error(e.user_message()),
//!     }
//!
//!     let eras = ctx.timeline.get_eras(Some("DC"), Some(1985), Some(1986)).await?;
//!     println!("Found {} eras", eras.len());
//!
//!     ctx.auth.logout().await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod clients;
pub mod config;
pub mod context;
pub mod session;
pub mod storage;
pub mod ui;

// Re-export top-level types for convenience
pub use api::{ApiError, ApiResult, HttpClient, RequestOptions};

pub use clients::{
    AuthClient, Era, EraFilter, LoginResponse, MessageResponse, RegisterResponse, TimelineClient,
    TokenStatus, User, VerifyEmailResponse,
};

pub use config::{Config, ConfigError};

pub use context::AppContext;

pub use session::{
    AuthError, AuthManager, AuthResult, SessionPhase, SessionState, SessionStore,
    VerificationOutcome,
};

pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError, StorageResult};

pub use ui::{Notification, NotificationCenter, NotificationKind, Theme, ThemePreference};
