//! External collaborators of the client stores.
//!
//! Provides the Auth Gateway (HTTP login/logout via `reqwest`) and the
//! Profile Gateway (storage-backed demo record), each behind a trait so
//! stores can be driven by test doubles.

pub mod auth;
pub mod error;
pub mod profile;

pub use auth::{AuthEndpoints, AuthGateway, HttpAuthGateway, LoginResponse};
pub use error::{AuthError, ProfileError};
pub use profile::{LocalProfileGateway, ProfileGateway};
