//! Error types for the authwire workspace.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, protocol, credential storage and input
//! validation errors.

use std::fmt;
use thiserror::Error;

use crate::types::HttpResponse;

/// The unified error type for authwire operations.
///
/// Transport, client (4xx) and server (5xx) failures are surfaced exactly as
/// the transport reported them. Authentication errors are produced by the
/// refresh machinery once a credential problem can no longer be absorbed.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (expired credential, failed refresh).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-success HTTP status that this layer does not handle itself.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Credential store failures.
    #[error("credential store error: {0}")]
    Store(#[from] StoreError),

    /// Input validation errors (URL, header, body encoding).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Returns true if this error ended the authenticated session.
    pub fn is_session_terminal(&self) -> bool {
        matches!(
            self,
            Error::Auth(AuthError::RefreshFailed { .. } | AuthError::SessionEnded)
        )
    }

    /// Returns the HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Protocol(err) => Some(err.status),
            Error::Auth(AuthError::CredentialExpired) => Some(401),
            _ => None,
        }
    }
}

/// Transport-level errors: no response reached the caller.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// DNS resolution failed.
    #[error("DNS resolution failed: {host}")]
    Dns { host: String },

    /// TLS/SSL error.
    #[error("TLS error: {message}")]
    Tls { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl TransportError {
    /// A timeout after `duration`, saturating at `u64::MAX` milliseconds.
    pub fn timeout(duration: std::time::Duration) -> Self {
        TransportError::Timeout {
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Authentication-related errors.
///
/// `Clone` because a single refresh outcome is fanned out to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The credential was rejected again after a refresh-and-retry.
    #[error("credential expired")]
    CredentialExpired,

    /// The refresh call failed; the session has been cleared.
    #[error("credential refresh failed: {reason}")]
    RefreshFailed { reason: String },

    /// Refresh is not possible (stay-signed-in is off or no refresh token).
    #[error("session ended")]
    SessionEnded,

    /// The refresh episode went away without reporting an outcome.
    #[error("credential refresh abandoned")]
    RefreshAbandoned,
}

/// Protocol-level errors from non-success responses.
#[derive(Debug, Clone)]
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

/// Error body shapes commonly returned by JSON APIs.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(default, alias = "detail")]
    message: Option<String>,
}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, error: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            error,
            message,
        }
    }

    /// Build a protocol error from a completed response, reading a JSON
    /// `{"error", "message"}` body when one is present.
    pub fn from_response(response: &HttpResponse) -> Self {
        match serde_json::from_slice::<ErrorBody>(&response.body) {
            Ok(body) => {
                let error = body.error.map(|value| match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                });
                Self::new(response.status, error, body.message)
            }
            Err(_) => Self::new(response.status, None, None),
        }
    }

    /// 4xx status.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// 5xx status.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

/// Credential store errors.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Underlying storage could not be read or written.
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Stored data could not be decoded.
    #[error("corrupt credential data: {message}")]
    Corrupt { message: String },

    /// The store is not reachable.
    #[error("credential store unavailable: {message}")]
    Unavailable { message: String },
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io {
            message: err.to_string(),
        }
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid base URL.
    #[error("invalid URL '{value}': {reason}")]
    Url { value: String, reason: String },

    /// Invalid HTTP method name.
    #[error("invalid method '{value}'")]
    Method { value: String },

    /// Header name or value not representable on the wire.
    #[error("invalid header '{name}': {reason}")]
    Header { name: String, reason: String },

    /// Request body could not be encoded.
    #[error("invalid body: {message}")]
    Body { message: String },

    /// Response body could not be decoded.
    #[error("undecodable response: {message}")]
    Decode { message: String },
}
