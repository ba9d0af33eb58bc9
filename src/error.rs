//! Error taxonomy shared by the provider clients and the HTTP layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A required credential is missing or a client could not be built.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The provider answered with a non-success status, or a fallback failed.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Network failure, timeout or an undecodable response body.
    #[error("transport fault: {0}")]
    Transport(String),

    /// Rejected request input. Only raised at the HTTP boundary.
    #[error("invalid request: {0}")]
    Validation(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Transport(format!("request timed out: {err}"))
        } else {
            Error::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Transport(format!("malformed response body: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
