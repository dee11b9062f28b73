//! Opaque key-value storage for persisted app state.
//!
//! [`FileStore`] keeps one JSON record per key under
//! `dirs::data_dir()/<namespace>/`. The file name is a hash of the key, so
//! arbitrary keys are safe on disk. Writes go through a temp file and a
//! rename. Each record carries a SHA-256 digest of its value, checked on load to
//! catch corrupt or half-written files.

use crate::clock::{Clock, SystemClock};
use crate::GateError;
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Minimal string key-value storage.
pub trait KeyValueStore {
    /// Read the value for `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, GateError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), GateError>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), GateError>;
}

/// In-memory store, for tests and previews.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, GateError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), GateError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), GateError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// On-disk record for one key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    /// The key this record belongs to.
    pub key: String,

    /// The stored value.
    pub value: String,

    /// `sha-256=<base64>` of `value`.
    pub digest: String,

    /// When the record was written.
    pub saved_at: DateTime<Utc>,
}

impl StoredRecord {
    /// Build a record for `value`, stamped with the clock's time.
    pub fn new(key: &str, value: &str, clock: &dyn Clock) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
            digest: format_digest(value.as_bytes()),
            saved_at: clock.now_utc(),
        }
    }

    /// Check the digest and the key against what was requested.
    pub fn verify(&self, key: &str) -> Result<(), GateError> {
        if self.key != key || self.digest != format_digest(self.value.as_bytes()) {
            return Err(GateError::StoreIntegrity);
        }
        Ok(())
    }

    fn to_json(&self) -> Result<String, GateError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GateError::StoreIO(format!("Failed to serialize record: {}", e)))
    }

    fn from_json(json: &str) -> Result<Self, GateError> {
        serde_json::from_str(json)
            .map_err(|e| GateError::StoreIO(format!("Failed to deserialize record: {}", e)))
    }
}

/// Format a value digest as `sha-256=<base64>`.
pub fn format_digest(bytes: &[u8]) -> String {
    format!("sha-256={}", STANDARD.encode(Sha256::digest(bytes)))
}

/// Hex SHA-256 of a key, used to derive file names.
pub fn hash_key(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}

/// File-backed store.
pub struct FileStore {
    dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl FileStore {
    /// Open the store for `namespace` under the platform data directory.
    pub fn new(namespace: &str) -> Result<Self, GateError> {
        let base_dir = dirs::data_dir()
            .ok_or_else(|| GateError::StoreIO("Could not find data directory".to_string()))?;
        Self::at_path(base_dir.join(namespace))
    }

    /// Open a store rooted at `dir`, such as a container shared with the
    /// widget extension.
    pub fn at_path(dir: PathBuf) -> Result<Self, GateError> {
        Self::with_clock(dir, Arc::new(SystemClock))
    }

    /// Open a store with a custom clock for record timestamps.
    pub fn with_clock(dir: PathBuf, clock: Arc<dyn Clock>) -> Result<Self, GateError> {
        fs::create_dir_all(&dir)
            .map_err(|e| GateError::StoreIO(format!("Failed to create store dir: {}", e)))?;
        Ok(Self { dir, clock })
    }

    /// Root directory of this store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, key: &str) -> PathBuf {
        let hash = hash_key(key);
        self.dir.join(format!("{}.json", &hash[..16]))
    }

    /// Load the full record for `key`, verifying its digest.
    pub fn load_record(&self, key: &str) -> Result<Option<StoredRecord>, GateError> {
        let path = self.record_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)
            .map_err(|e| GateError::StoreIO(format!("Failed to read record: {}", e)))?;
        let record = StoredRecord::from_json(&json)?;
        record.verify(key)?;
        Ok(Some(record))
    }

    /// Delete every record in the store.
    pub fn clear(&mut self) -> Result<(), GateError> {
        let entries = fs::read_dir(&self.dir)
            .map_err(|e| GateError::StoreIO(format!("Failed to read store dir: {}", e)))?;
        for entry in entries {
            let path = entry
                .map_err(|e| GateError::StoreIO(format!("Failed to read entry: {}", e)))?
                .path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(&path)
                    .map_err(|e| GateError::StoreIO(format!("Failed to delete: {}", e)))?;
            }
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, GateError> {
        Ok(self.load_record(key)?.map(|record| record.value))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), GateError> {
        let target = self.record_path(key);
        let temp = target.with_extension("tmp");
        let json = StoredRecord::new(key, value, self.clock.as_ref()).to_json()?;

        fs::write(&temp, &json)
            .map_err(|e| GateError::StoreIO(format!("Failed to write temp file: {}", e)))?;
        fs::rename(&temp, &target)
            .map_err(|e| GateError::StoreIO(format!("Failed to rename record: {}", e)))?;

        tracing::debug!(key, bytes = value.len(), "stored value");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), GateError> {
        let path = self.record_path(key);
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| GateError::StoreIO(format!("Failed to delete record: {}", e)))?;
            tracing::debug!(key, "removed value");
        }
        Ok(())
    }
}
