//! Error types for the instantgram client.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, protocol, storage and input validation errors.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The unified error type for instantgram operations.
///
/// Only authentication failures are produced by the client itself; transport
/// and protocol errors are handed back exactly as the backend produced them
/// so callers can decide their own user-facing messaging.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The session could not be recovered; the caller must log in again.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-success responses from the backend.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The request was resubmitted after a token refresh and failed again.
    #[error("request failed after token refresh: {0}")]
    RetryFailed(#[source] Box<Error>),

    /// Credential storage could not be read or written.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Input validation errors (invalid ids, URLs, headers).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// A response body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Error {
    /// HTTP status of the failed response, looking through a failed retry.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Protocol(err) => Some(err.status),
            Error::RetryFailed(inner) => inner.status(),
            _ => None,
        }
    }

    /// Whether the session is gone and the user has to log in again.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Error::Auth(_))
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

/// Unrecoverable authentication errors.
///
/// `Clone` because a single refresh outcome is handed to every request
/// that was waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No refresh token is stored.
    #[error("no refresh token available")]
    NoRefreshToken,

    /// The backend reported the access token as invalid, or could not check it.
    #[error("access token failed validation")]
    TokenInvalid,

    /// The backend refused the refresh token, or the refresh call failed.
    #[error("token refresh rejected: {message}")]
    RefreshRejected {
        /// HTTP status of the refresh response, `None` for network failures.
        status: Option<u16>,
        message: String,
    },
}

/// Protocol-level errors from backend responses.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Error code from the response body (if present).
    pub error: Option<String>,
    /// Error message from the server.
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref error) = self.error {
            write!(f, " [{}]", error)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, error: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            error,
            message,
        }
    }
}

/// Credential storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the token file failed.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The token file exists but cannot be parsed.
    #[error("corrupt token file {path}: {message}")]
    Corrupt { path: PathBuf, message: String },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid entity id.
    #[error("invalid {kind} '{value}': {reason}")]
    Id {
        kind: &'static str,
        value: String,
        reason: String,
    },

    /// Invalid backend base URL.
    #[error("invalid base URL '{value}': {reason}")]
    BaseUrl { value: String, reason: String },

    /// A value cannot be used as an HTTP header.
    #[error("invalid {name} header: {reason}")]
    Header { name: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
