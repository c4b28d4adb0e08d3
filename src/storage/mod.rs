//! Durable Client Storage
//!
//! Named string slots that outlive the process, the client-side
//! equivalent of browser local storage:
//!
//! - **file**: one file per slot under the configured data directory
//! - **memory**: process-local slots for tests and ephemeral sessions
//! - **error**: Error types
//!
//! Only two slots are ever written: [`AUTH_TOKEN_KEY`] (owned by the
//! session) and [`THEME_KEY`] (owned by the theme preference).
//!
//! # Example
//!
//! ```rust,no_run
//! use comics_timeline::storage::{FileStore, KeyValueStore, THEME_KEY};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = FileStore::new("./state");
//!     store.set(THEME_KEY, "dark")?;
//!     assert_eq!(store.get(THEME_KEY)?.as_deref(), Some("dark"));
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod file;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Slot holding the bearer credential
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Slot holding the theme preference
pub const THEME_KEY: &str = "theme";

/// Durable key/value slots
///
/// Removing an absent key succeeds.
pub trait KeyValueStore: Send + Sync {
    /// Read a slot, `None` when it was never written or has been removed
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a slot, replacing any previous value
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a slot
    fn remove(&self, key: &str) -> StorageResult<()>;
}
