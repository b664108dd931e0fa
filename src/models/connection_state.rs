use std::fmt;

/// Lifecycle state of the real-time connection.
///
/// ```text
/// Idle ──start──▶ Connecting ──opened──▶ Authenticating ──sent──▶ Open
///                     ▲                                            │
///                     │ delay elapsed                   error/close│
///                     └────────────── Reconnecting ◀───────────────┘
///                                          │ budget exhausted
///                                          ▼
///                                        Failed
///
/// any state ──shutdown──▶ Closed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Constructed but not started.
    Idle,
    /// Opening the transport.
    Connecting,
    /// Transport open; sending the authentication handshake.
    Authenticating,
    /// Live: sends are accepted and inbound events flow.
    Open,
    /// Transport lost; a reconnect attempt is scheduled.
    Reconnecting,
    /// Reconnect budget exhausted. Stays Failed until an explicit `start()`.
    Failed,
    /// Shut down by the caller. No further operations are accepted.
    Closed,
}

impl ConnectionState {
    /// Whether this state accepts no further automatic transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed | Self::Closed)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Authenticating => "authenticating",
            Self::Open => "open",
            Self::Reconnecting => "reconnecting",
            Self::Failed => "failed",
            Self::Closed => "closed",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(ConnectionState::Failed.is_terminal());
        assert!(ConnectionState::Closed.is_terminal());
        assert!(!ConnectionState::Idle.is_terminal());
        assert!(!ConnectionState::Open.is_terminal());
        assert!(!ConnectionState::Reconnecting.is_terminal());
    }
}
