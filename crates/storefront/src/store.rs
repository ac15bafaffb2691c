//! Local persistent storage for the cart and saved contact details.
//!
//! Two independent records are kept under fixed keys:
//!
//! - [`CART_KEY`] - the cart, as a JSON array of cart lines
//! - [`CONTACT_KEY`] - the customer's contact details
//!
//! Reads fail open: a record that is missing, unreadable, or malformed loads
//! as its default value and never surfaces an error to the caller. Writes are
//! full overwrites and do report errors.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;
use telecart_core::{Cart, ContactInfo};
use thiserror::Error;
use tracing::{debug, warn};

/// Key of the persisted cart record.
pub const CART_KEY: &str = "cart";

/// Key of the persisted contact record.
pub const CONTACT_KEY: &str = "user_info";

/// Errors that can occur when writing to storage.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage medium could not be read or written.
    #[error("storage I/O error for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A value could not be serialized.
    #[error("failed to serialize '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory backend's lock was poisoned.
    #[error("storage lock poisoned")]
    Poisoned,

    /// The blocking task running the operation panicked or was cancelled.
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A string key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete the value under `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

// =============================================================================
// Backends
// =============================================================================

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a temporary file in the same directory and are then renamed
/// over the target, so a crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// Directory holding the records.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            key: key.to_string(),
            source,
        };
        let target = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));

        let mut file = std::fs::File::create(&tmp).map_err(io_err)?;
        file.write_all(value.as_bytes()).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        drop(file);
        std::fs::rename(&tmp, &target).map_err(io_err)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// In-memory backend, for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        values.remove(key);
        Ok(())
    }
}

// =============================================================================
// Typed records
// =============================================================================

/// Parse a stored record, falling back to `T::default()`.
///
/// `None` (no record) yields the default silently; malformed JSON, or JSON
/// that violates the type's invariants, is logged and also yields the default.
pub fn parse_or_default<T>(key: &str, raw: Option<&str>) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = raw else {
        return T::default();
    };
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "Discarding malformed stored record");
            T::default()
        }
    }
}

/// Typed access to the cart and contact records.
pub struct PersistentStore {
    backend: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentStore").finish_non_exhaustive()
    }
}

impl PersistentStore {
    /// Wrap a key-value backend.
    #[must_use]
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Load the saved cart; empty if absent, unreadable, or malformed.
    #[must_use]
    pub fn load_cart(&self) -> Cart {
        parse_or_default(CART_KEY, self.read(CART_KEY).as_deref())
    }

    /// Overwrite the saved cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be written.
    pub fn save_cart(&self, cart: &Cart) -> Result<(), StoreError> {
        self.write(CART_KEY, cart)
    }

    /// Load the saved contact details; `None` if absent, unreadable, or malformed.
    #[must_use]
    pub fn load_contact_info(&self) -> Option<ContactInfo> {
        parse_or_default::<Option<ContactInfo>>(CONTACT_KEY, self.read(CONTACT_KEY).as_deref())
    }

    /// Overwrite the saved contact details.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    pub fn save_contact_info(&self, info: &ContactInfo) -> Result<(), StoreError> {
        self.write(CONTACT_KEY, info)
    }

    /// Remove the saved contact details.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be removed.
    pub fn clear_contact_info(&self) -> Result<(), StoreError> {
        self.backend.remove(CONTACT_KEY)?;
        debug!("Saved contact info cleared");
        Ok(())
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Failed to read stored record");
                None
            }
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.backend.set(key, &json)?;
        debug!(key, bytes = json.len(), "Stored record written");
        Ok(())
    }
}
