use conceptforge_core::error::CoreError;

/// Failures of sign-in and sign-out.
///
/// `Authentication` is the user-facing "wrong credentials" case; `Network`
/// is kept separate so a UI can say "check your connection" instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The credentials failed client-side validation; nothing was sent.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Another sign-in on the same store has not finished yet.
    #[error("A sign-in request is already in progress")]
    InFlight,

    /// The gateway rejected the login (non-2xx).
    #[error("{message}")]
    Authentication {
        /// HTTP status code.
        status: u16,
        /// Server-supplied message, or the default sign-in failure text.
        message: String,
    },

    /// The gateway answered 2xx but the body broke the contract.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// A non-2xx answer to a request other than login.
    #[error("{message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Server-supplied message, or a default.
        message: String,
    },
}

impl From<CoreError> for AuthError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => AuthError::Validation(msg),
        }
    }
}

/// Failures of profile reads and writes. Cheap to clone so the profile
/// store can both record and return it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    /// The patch failed client-side validation; nothing was sent.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The profile gateway could not serve the request.
    #[error("Profile service unavailable: {0}")]
    Unavailable(String),

    /// The gateway did not answer within the configured timeout.
    #[error("Profile request timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },
}

impl From<CoreError> for ProfileError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => ProfileError::Validation(msg),
        }
    }
}
