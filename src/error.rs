// file: src/error.rs
// description: Custom error types, status mapping and result type aliases
// reference: https://docs.rs/thiserror

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServiceError>;

pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred while processing the request.";
pub const UPSTREAM_ERROR_MESSAGE: &str = "The upstream lookup service could not be reached.";

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Extraction fault: {0}")]
    Extraction(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Upstream lookup failed: {0}")]
    Upstream(String),

    #[error("Upstream transport failure: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ServiceError {
    /// 400 for caller mistakes and well-formed upstream refusals, 500 otherwise.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::InvalidInput(_) | ServiceError::Upstream(_) => 400,
            ServiceError::Extraction(_)
            | ServiceError::Configuration(_)
            | ServiceError::Transport(_)
            | ServiceError::Io(_)
            | ServiceError::Serialization(_) => 500,
        }
    }

    /// Message that is safe to hand back to a caller. Internal detail stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::InvalidInput(message) | ServiceError::Upstream(message) => {
                message.clone()
            }
            ServiceError::Configuration(message) => message.clone(),
            ServiceError::Transport(_) => UPSTREAM_ERROR_MESSAGE.to_string(),
            ServiceError::Extraction(_) | ServiceError::Io(_) | ServiceError::Serialization(_) => {
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Serialization(err.to_string())
    }
}
