use crate::config::ConfigError;

/// Failures while assembling the client; store operations report through
/// their own error types.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client could not be constructed (e.g. TLS backend init).
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}
