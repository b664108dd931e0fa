//! Timeout configuration for vault-link client operations.

use std::time::Duration;

/// Timeouts and keepalive tuning for HTTP requests and the real-time channel.
///
/// # Examples
///
/// ```rust
/// use vault_link::VaultLinkTimeouts;
/// use std::time::Duration;
///
/// // Defaults (recommended for most cases)
/// let timeouts = VaultLinkTimeouts::default();
///
/// // Custom tuning
/// let timeouts = VaultLinkTimeouts::builder()
///     .connection_timeout(Duration::from_secs(60))
///     .keepalive_interval(Duration::from_secs(15))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct VaultLinkTimeouts {
    /// Timeout for establishing connections (TCP + TLS + WebSocket handshake).
    /// Default: 10 seconds.
    pub connection_timeout: Duration,

    /// Timeout for an HTTP request end to end.
    /// Default: 30 seconds.
    pub request_timeout: Duration,

    /// Keepalive Ping interval on an idle WebSocket connection.
    /// Set to 0 to disable keepalive pings.
    /// Default: 30 seconds.
    pub keepalive_interval: Duration,

    /// Maximum wait for any frame after a keepalive Ping. When nothing
    /// arrives within this window the connection is treated as dead and
    /// torn down into the reconnect path. Set to 0 to disable.
    /// Default: 5 seconds.
    pub pong_timeout: Duration,
}

impl Default for VaultLinkTimeouts {
    fn default() -> Self {
        Self {
            connection_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            keepalive_interval: Duration::from_secs(30),
            pong_timeout: Duration::from_secs(5),
        }
    }
}

impl VaultLinkTimeouts {
    /// Create a new builder for custom timeout configuration.
    pub fn builder() -> VaultLinkTimeoutsBuilder {
        VaultLinkTimeoutsBuilder::new()
    }

    /// Timeouts suited to fast local development.
    pub fn fast() -> Self {
        Self {
            connection_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(5),
            keepalive_interval: Duration::from_secs(10),
            pong_timeout: Duration::from_secs(3),
        }
    }

    /// Check if a duration represents "no timeout" (zero or absurdly large).
    pub fn is_no_timeout(duration: Duration) -> bool {
        duration.is_zero() || duration > Duration::from_secs(86400 * 365)
    }
}

/// Builder for [`VaultLinkTimeouts`].
#[derive(Debug, Clone)]
pub struct VaultLinkTimeoutsBuilder {
    timeouts: VaultLinkTimeouts,
}

impl VaultLinkTimeoutsBuilder {
    fn new() -> Self {
        Self {
            timeouts: VaultLinkTimeouts::default(),
        }
    }

    /// Set the connection timeout (TCP + TLS + WebSocket handshake).
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.connection_timeout = timeout;
        self
    }

    /// Set the end-to-end HTTP request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.request_timeout = timeout;
        self
    }

    /// Set the keepalive ping interval. Zero disables keepalive.
    pub fn keepalive_interval(mut self, interval: Duration) -> Self {
        self.timeouts.keepalive_interval = interval;
        self
    }

    /// Set the pong timeout. Zero disables pong timeout checking.
    pub fn pong_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.pong_timeout = timeout;
        self
    }

    /// Build the timeout configuration.
    pub fn build(self) -> VaultLinkTimeouts {
        self.timeouts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeouts() {
        let timeouts = VaultLinkTimeouts::default();
        assert_eq!(timeouts.connection_timeout, Duration::from_secs(10));
        assert_eq!(timeouts.request_timeout, Duration::from_secs(30));
        assert_eq!(timeouts.keepalive_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_builder() {
        let timeouts = VaultLinkTimeouts::builder()
            .connection_timeout(Duration::from_secs(60))
            .keepalive_interval(Duration::ZERO)
            .build();

        assert_eq!(timeouts.connection_timeout, Duration::from_secs(60));
        assert!(timeouts.keepalive_interval.is_zero());
    }

    #[test]
    fn test_is_no_timeout() {
        assert!(VaultLinkTimeouts::is_no_timeout(Duration::ZERO));
        assert!(!VaultLinkTimeouts::is_no_timeout(Duration::from_secs(1)));
    }
}
