//! Domain types shared by the ConceptForge client crates.
//!
//! Pure data and validation only: no I/O, no async.

pub mod credentials;
pub mod error;
pub mod profile;
pub mod roles;
pub mod session;
pub mod types;
