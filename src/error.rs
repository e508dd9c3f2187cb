//! Error handling for rest-harness

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for rest-harness operations
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot read upload file {path:?}: {source}")]
    ResourceAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("SSL/TLS error: {0}")]
    Ssl(String),

    #[error("Network timeout")]
    Timeout,

    #[error("Request cancelled")]
    Cancelled,

    #[error("Cannot deserialize response (status {status}): {source}")]
    Deserialization {
        status: StatusCode,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The four failure families a caller has to tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Builder state was invalid; nothing was sent.
    Configuration,
    /// An upload file could not be read; nothing was sent.
    ResourceAccess,
    /// The transport failed to produce a response.
    Transport,
    /// A response arrived but did not match the expected type.
    Deserialization,
}

impl HarnessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HarnessError::Config(_) | HarnessError::InvalidUrl(_) | HarnessError::Json(_) => {
                ErrorKind::Configuration
            }
            HarnessError::ResourceAccess { .. } => ErrorKind::ResourceAccess,
            HarnessError::Http(_)
            | HarnessError::Ssl(_)
            | HarnessError::Timeout
            | HarnessError::Cancelled => ErrorKind::Transport,
            HarnessError::Deserialization { .. } => ErrorKind::Deserialization,
        }
    }

    /// HTTP status received before the failure, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HarnessError::Deserialization { status, .. } => Some(*status),
            HarnessError::Http(err) => err.status(),
            _ => None,
        }
    }
}

/// Result type alias for rest-harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;
