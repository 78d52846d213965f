use std::path::PathBuf;

/// Errors from the durable storage layer.
///
/// Callers above the adapter log these and fall back to "nothing stored";
/// they are never surfaced to end users.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backend exists but cannot currently be used (e.g. a poisoned lock).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The key is empty or contains characters outside `[A-Za-z0-9._-]`.
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    /// Reading, writing, or removing the backing file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored value is not valid JSON for the requested type.
    #[error("Serialization error for key '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
