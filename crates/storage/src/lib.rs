//! Durable client-side key-value storage.
//!
//! Plays the role a browser's `localStorage` plays for a web client: a
//! rehydration cache holding one JSON blob per key. It is never the system
//! of record, so callers treat every [`StorageError`] as "nothing stored".

pub mod adapter;
pub mod backend;
pub mod error;

pub use adapter::DurableStorage;
pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use error::StorageError;
