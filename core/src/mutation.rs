//! Write operations with standard notifications.
//!
//! # Design
//! A `Mutation` wraps one write operation. Every outcome produces exactly
//! one toast: the server's message when it sent one, otherwise a fixed
//! fallback chosen by HTTP status. A 401 additionally clears the session in
//! the `AppContext`; no other status has a side effect. Mutations are never
//! cached.

use serde_json::Value;

use crate::error::ApiError;
use crate::notify::Notifier;
use crate::session::AppContext;
use crate::types::ApiAck;

pub const SUCCESS_FALLBACK: &str = "Operation completed successfully.";

/// Failure classes, one per row of the status table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    ServerError,
    /// A response arrived with any other status, or could not be read.
    Unknown,
    /// No response object at all.
    NoResponse,
}

impl FailureKind {
    pub fn classify(err: &ApiError) -> Self {
        match err {
            ApiError::Transport(_) | ApiError::SerializationError(_) => FailureKind::NoResponse,
            ApiError::DeserializationError(_) => FailureKind::Unknown,
            ApiError::NotFound { .. } => FailureKind::NotFound,
            ApiError::HttpError { status, .. } => match status {
                400 => FailureKind::BadRequest,
                401 => FailureKind::Unauthorized,
                403 => FailureKind::Forbidden,
                404 => FailureKind::NotFound,
                500 => FailureKind::ServerError,
                _ => FailureKind::Unknown,
            },
        }
    }

    pub fn fallback_message(self) -> &'static str {
        match self {
            FailureKind::BadRequest => "Bad Request...",
            FailureKind::Unauthorized => "Unauthorized...",
            FailureKind::Forbidden => "Forbidden...",
            FailureKind::NotFound => "Resource not found.",
            FailureKind::ServerError => "Server error...",
            FailureKind::Unknown => "Unknown error occurred.",
            FailureKind::NoResponse => "An unexpected error occurred.",
        }
    }

    pub fn clears_session(self) -> bool {
        self == FailureKind::Unauthorized
    }
}

/// The user-visible message for a failed mutation.
pub fn failure_message(err: &ApiError) -> String {
    err.server_message()
        .map(str::to_string)
        .unwrap_or_else(|| FailureKind::classify(err).fallback_message().to_string())
}

/// Results that may carry a server-provided success message.
pub trait ServerMessage {
    fn server_message(&self) -> Option<&str> {
        None
    }
}

impl<T> ServerMessage for ApiAck<T> {
    fn server_message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }
}

impl ServerMessage for Value {
    fn server_message(&self) -> Option<&str> {
        self.get("message")?.as_str().filter(|m| !m.trim().is_empty())
    }
}

impl ServerMessage for () {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStatus {
    Idle,
    Pending,
    Success,
    Error,
}

type Operation<'a, I, O> = Box<dyn FnMut(I) -> Result<O, ApiError> + 'a>;

/// An invocable write operation.
pub struct Mutation<'a, I, O> {
    operation: Operation<'a, I, O>,
    context: AppContext,
    notifier: &'a dyn Notifier,
    success_fallback: String,
    status: MutationStatus,
    last_error: Option<String>,
}

impl<'a, I, O: ServerMessage> Mutation<'a, I, O> {
    pub fn new<F>(context: AppContext, notifier: &'a dyn Notifier, operation: F) -> Self
    where
        F: FnMut(I) -> Result<O, ApiError> + 'a,
    {
        Self {
            operation: Box::new(operation),
            context,
            notifier,
            success_fallback: SUCCESS_FALLBACK.to_string(),
            status: MutationStatus::Idle,
            last_error: None,
        }
    }

    /// Override the toast shown when the server sends no success message.
    pub fn success_fallback(mut self, message: impl Into<String>) -> Self {
        self.success_fallback = message.into();
        self
    }

    pub fn status(&self) -> MutationStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == MutationStatus::Pending
    }

    /// Message of the most recent failure, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn mutate(&mut self, input: I) -> Result<O, ApiError> {
        self.status = MutationStatus::Pending;
        match (self.operation)(input) {
            Ok(output) => {
                let message = output.server_message().unwrap_or(self.success_fallback.as_str());
                self.notifier.success(message);
                self.status = MutationStatus::Success;
                self.last_error = None;
                Ok(output)
            }
            Err(err) => {
                let kind = FailureKind::classify(&err);
                let message = failure_message(&err);
                tracing::warn!(kind = ?kind, status = ?err.status(), error = %err, "mutation failed");
                self.notifier.error(&message);
                if kind.clears_session() {
                    if let Err(e) = self.context.clear() {
                        tracing::error!(error = %e, "failed to clear persisted session");
                    }
                }
                self.status = MutationStatus::Error;
                self.last_error = Some(message);
                Err(err)
            }
        }
    }
}
