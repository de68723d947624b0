//! Error types for the Wintender API client.
//!
//! # Design
//! Failures are classified by HTTP status only. `NotFound` keeps its own
//! variant, every other non-2xx response lands in `HttpError`, and a request
//! that never produced a response is a `Transport` error. The server's
//! `message` field is extracted once here so notification code never
//! re-parses bodies.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound { message: Option<String> },

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError {
        status: u16,
        message: Option<String>,
        body: String,
    },

    /// No response object: connection refused, timeout, DNS failure.
    #[error("transport failed: {0}")]
    Transport(String),

    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl ApiError {
    /// Build the error for a non-success status and raw body.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = server_message(body);
        if status == 404 {
            return ApiError::NotFound { message };
        }
        ApiError::HttpError {
            status,
            message,
            body: body.to_string(),
        }
    }

    /// HTTP status carried by the failure, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message supplied by the server in the error body.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::NotFound { message } | ApiError::HttpError { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Whether a response object exists for this failure.
    pub fn has_response(&self) -> bool {
        !matches!(self, ApiError::Transport(_))
    }
}

/// Pull `message` (or `error`) out of a JSON error body.
fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .filter_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|m| !m.is_empty())
        .map(str::to_string)
}
