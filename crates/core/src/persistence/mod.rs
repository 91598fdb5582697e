//! Key-value persistence of the tracker state.

/// File-per-key backend rooted in a data directory.
pub mod file;
/// Load/save orchestration over any backend.
pub mod gateway;
/// Process-local backend used by tests and ephemeral sessions.
pub mod memory;

pub use file::FileStore;
pub use gateway::Gateway;
pub use memory::MemoryStore;

use thiserror::Error;

/// Failure of a key-value backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read key '{key}'")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write key '{key}'")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to remove key '{key}'")]
    Remove {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
}

/// String-keyed storage of serialized JSON blobs.
pub trait KeyValueStore {
    /// Raw value stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Remove `key`; removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}
