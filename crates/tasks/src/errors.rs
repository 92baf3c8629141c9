//! Error and retry-decision types for the Horizon client.
//!
//! [`HorizonError`] is the only error type surfaced to callers. Each variant
//! maps to one [`ErrorKind`], which is what retry decisions are made on.
//! [`RetryPolicy`] is the answer to "may this failed call be attempted again,
//! and after how long".

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Contact address included in terminal retry failures.
pub const SUPPORT_CONTACT: &str = "team@gethorizon.ai";

/// Result type for every client operation.
pub type HorizonResult<T> = Result<T, HorizonError>;

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether a failed call is safe to retry and, if so, after what delay.
///
/// Produced by [`crate::DeployRetryPolicy::next_attempt`] for each failed
/// deployment attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The call may be retried.
    Retryable {
        /// Delay before the next attempt. `None` means retry immediately.
        after: Option<Duration>,
    },
    /// The call must not be retried.
    NonRetryable,
}

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Which credential a call found missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredCredential {
    /// The Horizon API key sent as `X-Api-Key`.
    ApiKey,
    /// At least one of the OpenAI or Anthropic API keys.
    ProviderKey,
}

impl std::fmt::Display for RequiredCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequiredCredential::ApiKey => write!(f, "Must set Horizon API key"),
            RequiredCredential::ProviderKey => write!(f, "Must set LLM provider API key"),
        }
    }
}

/// Discriminant of [`HorizonError`], used to express which failures a retry
/// policy treats as transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`HorizonError::MissingCredential`].
    MissingCredential,
    /// See [`HorizonError::InvalidArgument`].
    InvalidArgument,
    /// See [`HorizonError::Connection`].
    Connection,
    /// See [`HorizonError::RetriesExhausted`].
    RetriesExhausted,
    /// See [`HorizonError::RemoteApi`].
    RemoteApi,
    /// See [`HorizonError::Transport`].
    Transport,
    /// See [`HorizonError::Decode`].
    Decode,
}

/// Errors returned by client operations.
///
/// Credential and argument errors are raised before any request is sent.
/// Only [`HorizonError::Connection`] is ever retried, and only by
/// `deploy_task`.
#[derive(Debug, Error)]
pub enum HorizonError {
    /// A required key is absent from the credential context.
    #[error("{credential}")]
    MissingCredential {
        /// The credential that must be set before this call.
        credential: RequiredCredential,
    },

    /// Caller input was rejected before anything was sent.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of what was wrong with the input.
        message: String,
    },

    /// The service could not be reached, or dropped the connection before
    /// answering (refused, DNS failure, reset, connect timeout).
    #[error("Connection error: {message}")]
    Connection {
        /// Description from the underlying transport.
        message: String,
    },

    /// `deploy_task` hit connection failures on every permitted attempt.
    #[error(
        "Max retries exceeded after {attempts} attempts ({last_error}). \
         Please contact support at {support}",
        support = SUPPORT_CONTACT
    )]
    RetriesExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// Rendering of the final connection failure.
        last_error: String,
    },

    /// The service answered with a non-success HTTP status.
    #[error("Horizon API returned HTTP {status}: {body}")]
    RemoteApi {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Any other transport failure (timeout, malformed request, broken body stream).
    #[error("Transport error: {message}")]
    Transport {
        /// Description from the underlying transport.
        message: String,
    },

    /// A success response whose body is not valid JSON.
    #[error("Failed to parse response: {message}")]
    Decode {
        /// Description of the parse failure.
        message: String,
    },
}

impl HorizonError {
    /// Creates a [`HorizonError::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Returns the discriminant of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            HorizonError::MissingCredential { .. } => ErrorKind::MissingCredential,
            HorizonError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            HorizonError::Connection { .. } => ErrorKind::Connection,
            HorizonError::RetriesExhausted { .. } => ErrorKind::RetriesExhausted,
            HorizonError::RemoteApi { .. } => ErrorKind::RemoteApi,
            HorizonError::Transport { .. } => ErrorKind::Transport,
            HorizonError::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// Check if this is a connection-level failure.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, HorizonError::Connection { .. })
    }

    /// Returns the HTTP status for [`HorizonError::RemoteApi`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            HorizonError::RemoteApi { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_messages() {
        let err = HorizonError::MissingCredential {
            credential: RequiredCredential::ApiKey,
        };
        assert_eq!(err.to_string(), "Must set Horizon API key");
        assert_eq!(err.kind(), ErrorKind::MissingCredential);
    }

    #[test]
    fn test_retries_exhausted_points_to_support() {
        let err = HorizonError::RetriesExhausted {
            attempts: 10,
            last_error: "Connection error: refused".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("10 attempts"));
        assert!(rendered.ends_with("Please contact support at team@gethorizon.ai"));
    }

    #[test]
    fn test_status_only_for_remote_errors() {
        let remote = HorizonError::RemoteApi {
            status: 404,
            body: "{}".to_string(),
        };
        assert_eq!(remote.status(), Some(404));
        assert!(!remote.is_connection_error());

        let conn = HorizonError::Connection {
            message: "refused".to_string(),
        };
        assert_eq!(conn.status(), None);
        assert!(conn.is_connection_error());
    }
}
