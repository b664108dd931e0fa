//! Error types for the vault-link client library.

use thiserror::Error;

/// Errors returned by vault-link operations.
///
/// Transport and decode failures on the real-time channel are handled inside
/// the connection manager (they drive the reconnect path or are dropped with a
/// log line) and never reach callers; the caller-observable outcomes there are
/// [`NotConnected`](VaultLinkError::NotConnected),
/// [`RetryExhausted`](VaultLinkError::RetryExhausted) and
/// [`ManagerClosed`](VaultLinkError::ManagerClosed).
#[derive(Debug, Error)]
pub enum VaultLinkError {
    /// The client was constructed or configured incorrectly.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// HTTP transport failure (connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The server answered an API request with a non-success status.
    #[error("Server error ({status_code}): {message}")]
    ServerError {
        /// HTTP status code returned by the server.
        status_code: u16,
        /// Error message extracted from the response body.
        message: String,
    },

    /// Authentication or token refresh failed.
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// WebSocket transport failure: open failure or abrupt close.
    #[error("Transport error: {0}")]
    TransportError(String),

    /// An inbound frame could not be decoded. Recovered locally; the
    /// connection stays open.
    #[error("Failed to decode server frame: {0}")]
    DecodeError(String),

    /// `send` was attempted while the connection is not open.
    #[error("Connection is not open")]
    NotConnected,

    /// The reconnect budget was exhausted; the connection stays in the Failed
    /// state until an explicit restart.
    #[error("Reconnect attempts exhausted after {0} failures")]
    RetryExhausted(u32),

    /// The connection manager was shut down; no further operations are
    /// accepted.
    #[error("Connection manager is closed")]
    ManagerClosed,

    /// An operation exceeded its configured timeout.
    #[error("Timeout: {0}")]
    TimeoutError(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, VaultLinkError>;
