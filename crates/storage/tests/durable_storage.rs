//! Integration tests for [`DurableStorage`] over file, memory, and absent
//! backends.

use std::sync::Arc;

use assert_matches::assert_matches;
use conceptforge_storage::{DurableStorage, FileBackend, StorageBackend, StorageError};
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Blob {
    token: String,
    count: u32,
}

fn blob() -> Blob {
    Blob {
        token: "t1".into(),
        count: 3,
    }
}

// ---------------------------------------------------------------------------
// File backend
// ---------------------------------------------------------------------------

#[test]
fn file_storage_round_trips_a_value() {
    let dir = tempfile::tempdir().unwrap();
    let storage = DurableStorage::file(dir.path().join("state"));

    storage.write("concept_app_auth", &blob()).unwrap();
    let read: Option<Blob> = storage.read("concept_app_auth").unwrap();

    assert_eq!(read, Some(blob()));
    assert!(dir.path().join("state/concept_app_auth.json").is_file());
}

/// A second storage instance over the same directory sees earlier writes.
#[test]
fn file_storage_survives_a_new_instance() {
    let dir = tempfile::tempdir().unwrap();
    DurableStorage::file(dir.path()).write("k", &blob()).unwrap();

    let reopened = DurableStorage::file(dir.path());
    assert_eq!(reopened.read::<Blob>("k").unwrap(), Some(blob()));
}

#[test]
fn file_storage_missing_key_reads_none() {
    let dir = tempfile::tempdir().unwrap();
    let storage = DurableStorage::file(dir.path());
    assert_eq!(storage.read::<Blob>("absent").unwrap(), None);
}

#[test]
fn file_storage_remove_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let storage = DurableStorage::file(dir.path());

    storage.write("k", &blob()).unwrap();
    storage.remove("k").unwrap();
    storage.remove("k").unwrap();

    assert_eq!(storage.read::<Blob>("k").unwrap(), None);
}

/// Atomic writes leave no temp files behind.
#[test]
fn file_storage_leaves_only_the_final_file() {
    let dir = tempfile::tempdir().unwrap();
    let storage = DurableStorage::file(dir.path());

    storage.write("k", &blob()).unwrap();
    storage.write("k", &blob()).unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["k.json".to_string()]);
}

#[test]
fn malformed_json_is_a_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("k.json"), "{not json").unwrap();

    let storage = DurableStorage::file(dir.path());
    let err = storage.read::<Blob>("k").unwrap_err();
    assert_matches!(err, StorageError::Serialization { ref key, .. } if key == "k");
}

#[test]
fn empty_file_reads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("k.json"), "").unwrap();

    let storage = DurableStorage::file(dir.path());
    assert_eq!(storage.read::<Blob>("k").unwrap(), None);
}

#[test]
fn invalid_key_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let storage = DurableStorage::file(dir.path());
    let err = storage.write("../escape", &blob()).unwrap_err();
    assert_matches!(err, StorageError::InvalidKey(_));
}

/// Pointing the backend at a regular file makes every write fail with I/O.
#[test]
fn unwritable_directory_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let not_a_dir = dir.path().join("plain-file");
    std::fs::write(&not_a_dir, "x").unwrap();

    let backend = FileBackend::new(&not_a_dir);
    let err = backend.set("k", "{}").unwrap_err();
    assert_matches!(err, StorageError::Io { .. });
}

// ---------------------------------------------------------------------------
// Memory and absent backends
// ---------------------------------------------------------------------------

#[test]
fn memory_storage_is_shared_between_clones() {
    let storage = DurableStorage::memory();
    let clone = storage.clone();

    storage.write("k", &blob()).unwrap();
    assert_eq!(clone.read::<Blob>("k").unwrap(), Some(blob()));
}

#[test]
fn unavailable_storage_is_a_no_op() {
    let storage = DurableStorage::unavailable();
    assert!(!storage.is_available());

    storage.write("k", &blob()).unwrap();
    assert_eq!(storage.read::<Blob>("k").unwrap(), None);
    storage.remove("k").unwrap();
}

#[test]
fn custom_backend_plugs_in() {
    struct Fixed;

    impl StorageBackend for Fixed {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(Some(r#"{"token":"t1","count":3}"#.into()))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Ok(())
        }
        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    let storage = DurableStorage::new(Arc::new(Fixed));
    assert_eq!(storage.read::<Blob>("any").unwrap(), Some(blob()));
}
