//! Namespaced key-value persistence
//!
//! A small synchronous string store used for client-side state (the session
//! token and its expiry). Two backends are provided:
//! - [`MemoryStore`]: process-local, used in tests and for ephemeral sessions
//! - [`FileStore`]: a JSON object on disk, rewritten atomically on every
//!   mutation

pub mod error;
pub mod file;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::MemoryStore;

/// String key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, if any.
    ///
    /// # Errors
    /// Returns an error when the backing medium cannot be read.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns an error when the backing medium cannot be written.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    /// Returns an error when the backing medium cannot be written.
    fn remove(&self, key: &str) -> StorageResult<()>;
}
