//! Session/Auth State
//!
//! Who is logged in right now, and the flows that change it.
//!
//! - **state**: [`SessionStore`], the single owner of credential and profile
//! - **manager**: [`AuthManager`], login/logout/registration/verification
//! - **error**: Error types
//!
//! # Invariants
//!
//! - `is_logged_in` is true iff both credential and profile are present
//! - A profile never exists without a credential
//! - Every invalidation (401, failed token probe, failed profile fetch)
//!   goes through one clear operation, so memory and storage agree
//!
//! Concurrent flows on the same session are last-write-wins.

pub mod error;
pub mod manager;
pub mod state;

pub use error::{AuthError, AuthResult};
pub use manager::{AuthManager, VerificationOutcome};
pub use state::{SessionPhase, SessionState, SessionStore};
