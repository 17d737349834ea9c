use thiserror::Error;

use crate::client::ApiError;

#[derive(Error, Debug)]
pub enum KeyControllerError {
    #[error("Client session error: {0}")]
    ClientSession(String),

    #[error("Invalid or unsupported service instance: {0}")]
    UnsupportedService(String),

    #[error("Error parsing endpoint URL: {0}")]
    UrlParse(String),

    #[error("{context}: {source}")]
    Remote {
        context: String,
        #[source]
        source: ApiError,
    },

    #[error("Invalid CRN: {0}")]
    InvalidCrn(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Field '{0}' cannot be changed in place, the key must be replaced")]
    RequiresReplacement(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("State file error: {0}")]
    State(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl KeyControllerError {
    /// Wrap an API failure with a short description of the operation that failed
    pub fn remote(context: impl Into<String>, source: ApiError) -> Self {
        KeyControllerError::Remote {
            context: context.into(),
            source,
        }
    }
}

impl From<anyhow::Error> for KeyControllerError {
    fn from(err: anyhow::Error) -> Self {
        KeyControllerError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for KeyControllerError {
    fn from(err: serde_json::Error) -> Self {
        KeyControllerError::State(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for KeyControllerError {
    fn from(err: std::io::Error) -> Self {
        KeyControllerError::State(err.to_string())
    }
}
