//! Connection lifecycle event handlers.
//!
//! Callback-based hooks for monitoring the real-time connection:
//!
//! - [`on_connect`](EventHandlers::on_connect): the channel reached Open
//! - [`on_disconnect`](EventHandlers::on_disconnect): the transport closed
//! - [`on_error`](EventHandlers::on_error): connection-level error, with a
//!   recoverability flag (`recoverable == false` means the reconnect budget
//!   is exhausted and the connection is Failed)
//! - [`on_state_change`](EventHandlers::on_state_change): every lifecycle
//!   transition; this is how a UI observes the Failed state to show a
//!   persistent "disconnected" indicator
//!
//! # Example
//!
//! ```rust
//! use vault_link::{ConnectionState, EventHandlers};
//!
//! let handlers = EventHandlers::new()
//!     .on_connect(|| println!("realtime channel up"))
//!     .on_state_change(|state| {
//!         if state == ConnectionState::Failed {
//!             eprintln!("realtime channel gave up; manual restart required");
//!         }
//!     });
//! ```

use std::fmt;
use std::sync::Arc;

use crate::models::ConnectionState;

/// Reason for a disconnect event.
#[derive(Debug, Clone)]
pub struct DisconnectReason {
    /// Human-readable description of why the connection closed.
    pub message: String,
    /// WebSocket close code, if the peer sent one.
    pub code: Option<u16>,
}

impl DisconnectReason {
    /// Create a disconnect reason with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    /// Create a disconnect reason with a message and close code.
    pub fn with_code(message: impl Into<String>, code: u16) -> Self {
        Self {
            message: message.into(),
            code: Some(code),
        }
    }
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = self.code {
            write!(f, "{} (code: {})", self.message, code)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

/// Error information passed to the `on_error` handler.
#[derive(Debug, Clone)]
pub struct ConnectionError {
    /// Human-readable error message.
    pub message: String,
    /// Whether auto-reconnect may still recover the connection.
    pub recoverable: bool,
}

impl ConnectionError {
    /// Create a connection error.
    pub fn new(message: impl Into<String>, recoverable: bool) -> Self {
        Self {
            message: message.into(),
            recoverable,
        }
    }
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

type OnConnectCallback = Arc<dyn Fn() + Send + Sync>;
type OnDisconnectCallback = Arc<dyn Fn(DisconnectReason) + Send + Sync>;
type OnErrorCallback = Arc<dyn Fn(ConnectionError) + Send + Sync>;
type OnStateChangeCallback = Arc<dyn Fn(ConnectionState) + Send + Sync>;

/// Connection lifecycle event handlers.
///
/// All handlers are optional; register only what you need. Handlers are
/// invoked from the connection's background task and must not block.
#[derive(Clone, Default)]
pub struct EventHandlers {
    on_connect: Option<OnConnectCallback>,
    on_disconnect: Option<OnDisconnectCallback>,
    on_error: Option<OnErrorCallback>,
    on_state_change: Option<OnStateChangeCallback>,
}

impl fmt::Debug for EventHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandlers")
            .field("on_connect", &self.on_connect.is_some())
            .field("on_disconnect", &self.on_disconnect.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_state_change", &self.on_state_change.is_some())
            .finish()
    }
}

impl EventHandlers {
    /// Create an empty `EventHandlers` (no callbacks registered).
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked each time the connection reaches Open.
    pub fn on_connect(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_connect = Some(Arc::new(f));
        self
    }

    /// Register a callback invoked when the transport closes, intentionally
    /// or not.
    pub fn on_disconnect(mut self, f: impl Fn(DisconnectReason) + Send + Sync + 'static) -> Self {
        self.on_disconnect = Some(Arc::new(f));
        self
    }

    /// Register a callback invoked on connection-level errors.
    pub fn on_error(mut self, f: impl Fn(ConnectionError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(f));
        self
    }

    /// Register a callback invoked on every lifecycle state transition.
    pub fn on_state_change(
        mut self,
        f: impl Fn(ConnectionState) + Send + Sync + 'static,
    ) -> Self {
        self.on_state_change = Some(Arc::new(f));
        self
    }

    pub(crate) fn emit_connect(&self) {
        if let Some(cb) = &self.on_connect {
            cb();
        }
    }

    pub(crate) fn emit_disconnect(&self, reason: DisconnectReason) {
        if let Some(cb) = &self.on_disconnect {
            cb(reason);
        }
    }

    pub(crate) fn emit_error(&self, error: ConnectionError) {
        if let Some(cb) = &self.on_error {
            cb(error);
        }
    }

    pub(crate) fn emit_state_change(&self, state: ConnectionState) {
        if let Some(cb) = &self.on_state_change {
            cb(state);
        }
    }
}
