//! Error types
//!
//! Validation failures are returned to the caller so a view can show them.
//! Remote failures are logged by the store and otherwise absorbed.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Input rejected before any request is made
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Task text is empty or whitespace-only
    #[error("Task cannot be empty!")]
    EmptyText,
}

/// Errors talking to the remote task collection
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Server answered with a non-2xx status
    #[error("HTTP {status} from {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    /// Request never completed (connection refused, DNS, TLS, ...)
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response body did not match the expected shape
    #[error("Invalid response from {url}: {details}")]
    Decode { url: String, details: String },

    /// Base URL could not be used to build a client
    #[error("Invalid API base URL '{0}'")]
    InvalidBaseUrl(String),
}

impl RemoteError {
    /// Whether the server was reached and rejected the request
    pub fn is_status(&self) -> bool {
        matches!(self, RemoteError::Status { .. })
    }

    /// HTTP status code, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors reading or writing persisted preferences
#[derive(Error, Debug)]
pub enum PreferenceError {
    /// Failed to read the preference file
    #[error("Failed to read preferences '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write the preference file
    #[error("Failed to write preferences '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to encode preferences as JSON
    #[error("Failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}
