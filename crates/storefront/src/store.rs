//! Local persisted state.
//!
//! A single JSON object file holding the signed-in token, the cart and the
//! last checkout draft between runs. Writes go to a sibling temp file which
//! is then renamed over the original, so a crash mid-write never leaves a
//! truncated state file behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

/// Bearer token of the signed-in user.
pub const AUTH_TOKEN_KEY: &str = "auth_token";
/// Cart lines.
pub const CART_KEY: &str = "elegance_cart";
/// Checkout form draft.
pub const CHECKOUT_DRAFT_KEY: &str = "checkout_form_data";

const STATE_FILE: &str = "state.json";

/// Errors reading or writing the state file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("State file I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Key/value state persisted as one JSON file.
///
/// Cheap to clone; clones share a lock so read-modify-write cycles from
/// different handles do not interleave.
///
/// Every call does synchronous file I/O while holding a `std::sync::Mutex`,
/// including calls made from the async workflows. The file is a few
/// kilobytes, so this is fine on a CLI runtime. A server embedding the
/// store should call it through `tokio::task::spawn_blocking`.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl LocalStore {
    /// Open (creating if needed) the state directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: dir.join(STATE_FILE),
            lock: Arc::new(Mutex::new(())),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a value. Missing keys and values that no longer decode as `T`
    /// both yield `None`; the latter is logged.
    ///
    /// # Errors
    ///
    /// Returns an error only if the file exists but cannot be read.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(value) = self.load()?.remove(key) else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(decoded) => Ok(Some(decoded)),
            Err(e) => {
                warn!(key, error = %e, "Ignoring undecodable stored value");
                Ok(None)
            }
        }
    }

    /// Store a value under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be encoded or the file written.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value)?;
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut state = self.load()?;
        state.insert(key.to_owned(), value);
        self.save(&state)
    }

    /// Delete a key. Returns whether it was present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or written.
    pub fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut state = self.load()?;
        if state.remove(key).is_none() {
            return Ok(false);
        }
        self.save(&state)?;
        Ok(true)
    }

    fn load(&self) -> Result<Map<String, Value>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) | Err(_) => {
                warn!(path = %self.path.display(), "State file is corrupt, starting empty");
                Ok(Map::new())
            }
        }
    }

    fn save(&self, state: &Map<String, Value>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        fs::write(&tmp, bytes).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("state")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_set_get_remove() {
        let (_dir, store) = store();
        assert_eq!(store.get::<String>(AUTH_TOKEN_KEY).unwrap(), None);

        store.set(AUTH_TOKEN_KEY, "jwt-123").unwrap();
        assert_eq!(
            store.get::<String>(AUTH_TOKEN_KEY).unwrap().as_deref(),
            Some("jwt-123")
        );

        assert!(store.remove(AUTH_TOKEN_KEY).unwrap());
        assert!(!store.remove(AUTH_TOKEN_KEY).unwrap());
        assert_eq!(store.get::<String>(AUTH_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let (dir, store) = store();
        store.set(CART_KEY, &vec![1, 2, 3]).unwrap();
        store.set(AUTH_TOKEN_KEY, "t").unwrap();

        let reopened = LocalStore::open(dir.path().join("state")).unwrap();
        assert_eq!(reopened.get::<Vec<u32>>(CART_KEY).unwrap(), Some(vec![1, 2, 3]));
        assert!(!reopened.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_treated_as_empty() {
        let (_dir, store) = store();
        fs::write(store.path(), b"{ not json").unwrap();

        assert_eq!(store.get::<String>(AUTH_TOKEN_KEY).unwrap(), None);
        store.set(AUTH_TOKEN_KEY, "fresh").unwrap();
        assert_eq!(
            store.get::<String>(AUTH_TOKEN_KEY).unwrap().as_deref(),
            Some("fresh")
        );
    }

    #[tokio::test]
    async fn test_usable_from_blocking_pool() {
        let (_dir, store) = store();
        let writer = store.clone();
        tokio::task::spawn_blocking(move || writer.set(AUTH_TOKEN_KEY, "pooled"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            store.get::<String>(AUTH_TOKEN_KEY).unwrap().as_deref(),
            Some("pooled")
        );
    }

    #[test]
    fn test_wrong_type_reads_as_none() {
        let (_dir, store) = store();
        store.set(CART_KEY, "not a list").unwrap();
        assert_eq!(store.get::<Vec<u32>>(CART_KEY).unwrap(), None);
    }
}
