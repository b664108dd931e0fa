use serde::{Deserialize, Serialize};

/// Reconnection behavior for the real-time channel.
///
/// Separate from [`VaultLinkTimeouts`](crate::VaultLinkTimeouts), which tunes
/// per-operation timeouts and keepalive.
///
/// # Example
///
/// ```rust
/// use vault_link::ConnectionOptions;
///
/// let options = ConnectionOptions::default()
///     .with_reconnect_base_delay_ms(2000)
///     .with_max_reconnect_attempts(10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionOptions {
    /// Reconnect automatically on connection loss.
    /// When `false`, a transport loss moves the connection straight to the
    /// Failed state. Default: `true`.
    #[serde(default = "default_auto_reconnect")]
    pub auto_reconnect: bool,

    /// Base delay in milliseconds before the first reconnect attempt.
    /// The n-th attempt waits `base × 2^(n−1)`. Default: 1000.
    #[serde(default = "default_reconnect_base_delay_ms")]
    pub reconnect_base_delay_ms: u64,

    /// Cap on the computed backoff delay in milliseconds. Default: 30000.
    #[serde(default = "default_max_reconnect_delay_ms")]
    pub max_reconnect_delay_ms: u64,

    /// Consecutive failed attempts tolerated before the connection gives up
    /// and enters the Failed state. Default: 5.
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,
}

fn default_auto_reconnect() -> bool {
    true
}

fn default_reconnect_base_delay_ms() -> u64 {
    1000
}

fn default_max_reconnect_delay_ms() -> u64 {
    30_000
}

fn default_max_reconnect_attempts() -> u32 {
    5
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            auto_reconnect: true,
            reconnect_base_delay_ms: 1000,
            max_reconnect_delay_ms: 30_000,
            max_reconnect_attempts: 5,
        }
    }
}

impl ConnectionOptions {
    /// Create new connection options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to automatically reconnect on connection loss.
    pub fn with_auto_reconnect(mut self, enabled: bool) -> Self {
        self.auto_reconnect = enabled;
        self
    }

    /// Set the base delay before the first reconnect attempt (milliseconds).
    pub fn with_reconnect_base_delay_ms(mut self, delay_ms: u64) -> Self {
        self.reconnect_base_delay_ms = delay_ms;
        self
    }

    /// Set the cap on the computed backoff delay (milliseconds).
    pub fn with_max_reconnect_delay_ms(mut self, max_delay_ms: u64) -> Self {
        self.max_reconnect_delay_ms = max_delay_ms;
        self
    }

    /// Set the number of consecutive failed attempts tolerated before the
    /// connection enters the Failed state.
    pub fn with_max_reconnect_attempts(mut self, max_attempts: u32) -> Self {
        self.max_reconnect_attempts = max_attempts;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ConnectionOptions::default();
        assert!(options.auto_reconnect);
        assert_eq!(options.reconnect_base_delay_ms, 1000);
        assert_eq!(options.max_reconnect_delay_ms, 30_000);
        assert_eq!(options.max_reconnect_attempts, 5);
    }

    #[test]
    fn test_builder_style() {
        let options = ConnectionOptions::new()
            .with_auto_reconnect(false)
            .with_reconnect_base_delay_ms(250)
            .with_max_reconnect_attempts(2);
        assert!(!options.auto_reconnect);
        assert_eq!(options.reconnect_base_delay_ms, 250);
        assert_eq!(options.max_reconnect_attempts, 2);
    }
}
