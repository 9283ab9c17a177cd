//! Errors returned by the API client and workflows.

use thiserror::Error;

use crate::store::StoreError;

/// Message used when a failed response carries no explanation.
pub const FALLBACK_ERROR_MESSAGE: &str = "Something went wrong";

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The backend answered 404.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend answered 401; the token is missing or expired.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Any other failure envelope.
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    /// A request was rejected before being sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Reading or writing local state failed.
    #[error("Local state error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Build the error for a failed response.
    #[must_use]
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => Self::Unauthorized(message),
            404 => Self::NotFound(message),
            _ => Self::Api { status, message },
        }
    }

    /// The message to show the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(message)
            | Self::Unauthorized(message)
            | Self::Api { message, .. }
            | Self::InvalidRequest(message) => message.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status of a failure envelope, if the backend answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound(_) => Some(404),
            Self::Unauthorized(_) => Some(401),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
