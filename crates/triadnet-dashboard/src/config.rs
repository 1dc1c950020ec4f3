//! Session configuration.

use std::time::Duration;

/// Configuration for one dashboard session.
///
/// Defaults mirror the reference cadence: poll every 3 seconds, retry a lost
/// connection after 5 seconds, park the session after 5 failed closes.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// WebSocket endpoint of the node's dashboard service.
    pub url: String,
    /// Interval between snapshot requests while connected.
    pub poll_interval: Duration,
    /// Delay before an automatic reconnection attempt.
    pub reconnect_delay: Duration,
    /// Unsolicited closes tolerated before giving up.
    pub max_reconnect_attempts: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:8765".to_string(),
            poll_interval: Duration::from_secs(3),
            reconnect_delay: Duration::from_secs(5),
            max_reconnect_attempts: 5,
        }
    }
}

impl DashboardConfig {
    /// Config pointing at the given endpoint, reference cadence otherwise.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }

    /// The endpoint to dial: scheme defaulted to `ws://`, localhost pinned to
    /// 127.0.0.1 to avoid IPv6 resolution surprises.
    pub fn endpoint(&self) -> String {
        let mut url = self.url.clone();
        if !url.starts_with("ws://") && !url.starts_with("wss://") {
            url = format!("ws://{}", url);
        }
        if url.contains("localhost") {
            url = url.replace("localhost", "127.0.0.1");
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_cadence_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(3));
        assert_eq!(config.reconnect_delay, Duration::from_secs(5));
        assert_eq!(config.max_reconnect_attempts, 5);
    }

    #[test]
    fn endpoint_defaults_scheme() {
        let config = DashboardConfig::new("example.com:8765");
        assert_eq!(config.endpoint(), "ws://example.com:8765");
    }

    #[test]
    fn endpoint_keeps_explicit_scheme() {
        let config = DashboardConfig::new("wss://example.com:8765");
        assert_eq!(config.endpoint(), "wss://example.com:8765");
    }

    #[test]
    fn endpoint_normalizes_localhost() {
        let config = DashboardConfig::new("ws://localhost:8765");
        assert_eq!(config.endpoint(), "ws://127.0.0.1:8765");
    }
}
