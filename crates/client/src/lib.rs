//! `conceptforge-client` library crate.
//!
//! Session and profile stores for the ConceptForge client, plus the
//! configuration and composition root that wire them to storage and
//! gateways. The `conceptforge` binary lives in `main.rs`.

pub mod config;
pub mod context;
pub mod error;
pub mod profile;
pub mod session;

pub use config::{ClientConfig, RoleRoutes};
pub use context::ClientContext;
pub use error::ClientError;
pub use profile::{ProfileSnapshot, ProfileStatus, ProfileStore, UpdateOutcome};
pub use session::SessionStore;
