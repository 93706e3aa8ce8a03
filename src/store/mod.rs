//! Persistent key-value store module.
//!
//! The checklist persists its state as a single string record under a fixed
//! key. This module abstracts the backing store behind [`KeyValueStore`] so
//! the session layer never touches the filesystem directly.
//!
//! # Architecture
//!
//! * [`file`]: JSON-file backed store under the platform data directory.
//! * [`memory`]: In-process store for tests and `--ephemeral` runs.

pub mod file;
pub mod memory;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read.
    #[error("failed to read store {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backing file could not be written.
    #[error("failed to write store {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backing file is not a JSON object of strings.
    #[error("store {path} is corrupted: {source}")]
    Corrupted {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Synchronous string key-value store.
///
/// Mirrors the contract of a browser's local storage: values are opaque
/// strings, reads of absent keys return `None`, removal of an absent key is
/// not an error.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn remove(&mut self, key: &str) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}
