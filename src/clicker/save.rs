//! Card Clicker save/load.
//!
//! ## Versioning policy
//!
//! - `SAVE_VERSION`: current save format. Bump it when fields are added.
//! - `MIN_COMPATIBLE_VERSION`: oldest format still readable.
//!   Bump it only for breaking changes.
//!
//! Saves without a `version` field count as version 1.
//! Legacy field names (`money`, `cards`) and the old `novice` unit id are
//! accepted on load.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::EconomyState;

/// Format version written into every save.
pub const SAVE_VERSION: u32 = 1;

/// Oldest save version that still loads.
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

/// localStorage key.
pub const STORAGE_KEY: &str = "card_clicker_save_v1";

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to encode save: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode save: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("storage is not available")]
    Unavailable,
    #[error("save version {found} is older than the minimum supported {min}")]
    Incompatible { found: u32, min: u32 },
}

/// Key-value storage the save is written to.
pub trait StorageBackend {
    fn read(&self, key: &str) -> Result<Option<String>, SaveError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), SaveError>;
    fn remove(&mut self, key: &str) -> Result<(), SaveError>;
}

/// In-process storage for tests and non-browser hosts.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose writes always fail, like a full or disabled localStorage.
    pub fn failing() -> Self {
        Self {
            entries: HashMap::new(),
            fail_writes: true,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, SaveError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        if self.fail_writes {
            return Err(SaveError::Storage("quota exceeded".into()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SaveError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// The browser's localStorage. Only available on wasm.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, SaveError> {
        web_sys::window()
            .ok_or(SaveError::Unavailable)?
            .local_storage()
            .map_err(|e| SaveError::Storage(format!("{e:?}")))?
            .ok_or(SaveError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl StorageBackend for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>, SaveError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }

    fn remove(&mut self, key: &str) -> Result<(), SaveError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }
}

/// Serialization wrapper: `version` alongside the wire fields.
#[derive(Serialize)]
struct SaveData<'a> {
    version: u32,
    #[serde(flatten)]
    state: &'a EconomyState,
}

#[derive(Deserialize)]
struct SaveHeader {
    #[serde(default = "legacy_version")]
    version: u32,
}

fn legacy_version() -> u32 {
    1
}

pub fn encode(state: &EconomyState) -> Result<String, SaveError> {
    let data = SaveData {
        version: SAVE_VERSION,
        state,
    };
    serde_json::to_string(&data).map_err(SaveError::Encode)
}

/// Parse a snapshot from JSON. Values are validated by `Economy::restore`.
pub fn decode(json: &str) -> Result<EconomyState, SaveError> {
    let header: SaveHeader = serde_json::from_str(json).map_err(SaveError::Decode)?;
    if header.version < MIN_COMPATIBLE_VERSION {
        return Err(SaveError::Incompatible {
            found: header.version,
            min: MIN_COMPATIBLE_VERSION,
        });
    }
    serde_json::from_str(json).map_err(SaveError::Decode)
}

/// Best-effort persistence over a `StorageBackend`. Failures are logged and
/// never reach the engine.
pub struct SaveStore<B: StorageBackend> {
    backend: B,
    key: String,
}

impl<B: StorageBackend> SaveStore<B> {
    pub fn new(backend: B) -> Self {
        Self::with_key(backend, STORAGE_KEY)
    }

    pub fn with_key(backend: B, key: &str) -> Self {
        Self {
            backend,
            key: key.to_string(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Read the stored snapshot. `None` when there is no save or it cannot
    /// be decoded, which starts a fresh game. Undecodable saves are removed.
    pub fn load(&mut self) -> Option<EconomyState> {
        let json = match self.backend.read(&self.key) {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Card Clicker: failed to read save: {e}");
                return None;
            }
        };
        match decode(&json) {
            Ok(state) => Some(state),
            Err(e) => {
                log::warn!("Card Clicker: discarding save: {e}");
                if let Err(e) = self.backend.remove(&self.key) {
                    log::warn!("Card Clicker: failed to remove save: {e}");
                }
                None
            }
        }
    }

    pub fn try_save(&mut self, state: &EconomyState) -> Result<(), SaveError> {
        let json = encode(state)?;
        self.backend.write(&self.key, &json)
    }

    /// Failures are only logged.
    pub fn save(&mut self, state: &EconomyState) {
        if let Err(e) = self.try_save(state) {
            log::warn!("Card Clicker: failed to write save: {e}");
        }
    }

    pub fn reset(&mut self) {
        if let Err(e) = self.backend.remove(&self.key) {
            log::warn!("Card Clicker: failed to remove save: {e}");
        }
    }
}
