//! Typed JSON access over an optional [`StorageBackend`].

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::backend::{FileBackend, MemoryBackend, StorageBackend};
use crate::error::StorageError;

/// Reads and writes one JSON blob per key.
///
/// When built with [`DurableStorage::unavailable`] there is no backend and
/// every operation is a successful no-op: reads return `Ok(None)`, writes
/// and removals return `Ok(())`.
#[derive(Clone)]
pub struct DurableStorage {
    backend: Option<Arc<dyn StorageBackend>>,
}

impl DurableStorage {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// File-backed storage rooted at `dir`.
    pub fn file(dir: impl Into<std::path::PathBuf>) -> Self {
        Self::new(Arc::new(FileBackend::new(dir)))
    }

    /// Fresh in-memory storage.
    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Storage with no backend at all.
    pub fn unavailable() -> Self {
        Self { backend: None }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    /// Read and decode the value under `key`.
    ///
    /// Returns `Ok(None)` when nothing is stored, the stored string is empty,
    /// or there is no backend.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(backend) = &self.backend else {
            return Ok(None);
        };

        match backend.get(key)? {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StorageError::Serialization {
                    key: key.to_string(),
                    source,
                }),
            _ => Ok(None),
        }
    }

    /// Encode `value` and store it under `key`, replacing the previous value.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let Some(backend) = &self.backend else {
            return Ok(());
        };

        let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialization {
            key: key.to_string(),
            source,
        })?;
        backend.set(key, &raw)?;
        tracing::debug!(key, bytes = raw.len(), "Stored value");
        Ok(())
    }

    /// Delete the value under `key`.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        let Some(backend) = &self.backend else {
            return Ok(());
        };

        backend.remove(key)?;
        tracing::debug!(key, "Removed stored value");
        Ok(())
    }
}

impl std::fmt::Debug for DurableStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DurableStorage")
            .field("available", &self.is_available())
            .finish()
    }
}
