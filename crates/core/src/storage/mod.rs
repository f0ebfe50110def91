//! Key-value storage adapter for the request list.
//!
//! # Architecture
//!
//! Persistence is a single serialized array under one well-known key, the
//! same shape a browser keeps in local storage. The backing store is injected
//! as a [`KeyValueStore`] so tests run against [`MemoryStore`] and the
//! binaries use [`FileStore`] (feature `fs`).
//!
//! Writes are always a full overwrite of the key. There is no transaction:
//! two writers doing read-modify-write at the same time can lose an update.
//! The application assumes a single writer.

mod memory;

#[cfg(feature = "fs")]
mod file;

use std::sync::Arc;

use thiserror::Error;

use crate::types::Request;

pub use memory::MemoryStore;

#[cfg(feature = "fs")]
pub use file::FileStore;

/// Key the request list is stored under unless configured otherwise.
pub const DEFAULT_REQUESTS_KEY: &str = "requests";

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Another thread panicked while holding the store lock.
    #[error("Store lock poisoned")]
    Poisoned,
}

/// String key-value storage, modelled on browser local storage.
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be written.
    fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// The persisted request list, bound to one key of a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct RequestStore<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> RequestStore<S> {
    /// Bind to [`DEFAULT_REQUESTS_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_REQUESTS_KEY)
    }

    /// Bind to a custom key.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Key this list is stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the request list in insertion order.
    ///
    /// Never fails: a missing key, an unreadable store, or a value that is not
    /// a JSON array of requests all load as an empty list. The last two are
    /// logged, since the next [`save`](Self::save) overwrites whatever was
    /// stored.
    #[must_use]
    pub fn load(&self) -> Vec<Request> {
        self.try_load().unwrap_or_else(|e| {
            tracing::warn!(
                key = %self.key,
                error = %e,
                "Stored request list is unusable, treating it as empty"
            );
            Vec::new()
        })
    }

    /// Load the request list, reporting unreadable or malformed data.
    ///
    /// A missing key is an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read or the stored value
    /// is not a JSON array of requests.
    pub fn try_load(&self) -> Result<Vec<Request>, StorageError> {
        match self.store.get(&self.key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Serialize `requests` and overwrite the stored list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the store write fails.
    pub fn save(&self, requests: &[Request]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(requests)?;
        self.store.set(&self.key, raw)
    }
}
