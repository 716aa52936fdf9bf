use crate::http::transaction::DEFAULT_MAX_REDIRECTS;
use std::time::Duration;

/// User agent sent when the embedder does not supply one.
pub const DEFAULT_USER_AGENT: &str = concat!("cookiesource/", env!("CARGO_PKG_VERSION"));

/// Configuration shared by the HTTP data sources and the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpDataSourceConfig {
    /// User-Agent string to use for requests.
    pub user_agent: String,

    /// Time allowed for DNS, TCP and TLS setup.
    pub connect_timeout: Duration,

    /// Time allowed for each wait on the server once connected.
    pub read_timeout: Duration,

    /// Follow redirects that switch between http and https.
    pub allow_cross_protocol_redirects: bool,

    /// Maximum number of redirects per request.
    pub max_redirects: u8,
}

impl Default for HttpDataSourceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_USER_AGENT)
    }
}

impl HttpDataSourceConfig {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            connect_timeout: Duration::from_secs(8),
            read_timeout: Duration::from_secs(8),
            allow_cross_protocol_redirects: false,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_cross_protocol_redirects(mut self, allow: bool) -> Self {
        self.allow_cross_protocol_redirects = allow;
        self
    }

    pub fn with_max_redirects(mut self, max_redirects: u8) -> Self {
        self.max_redirects = max_redirects;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HttpDataSourceConfig::default();
        assert!(config.user_agent.starts_with("cookiesource/"));
        assert_eq!(config.connect_timeout, Duration::from_secs(8));
        assert_eq!(config.read_timeout, Duration::from_secs(8));
        assert!(!config.allow_cross_protocol_redirects);
        assert_eq!(config.max_redirects, 20);
    }

    #[test]
    fn test_builder_methods() {
        let config = HttpDataSourceConfig::new("Player/1.0")
            .with_read_timeout(Duration::from_millis(250))
            .with_cross_protocol_redirects(true)
            .with_max_redirects(3);
        assert_eq!(config.user_agent, "Player/1.0");
        assert_eq!(config.read_timeout, Duration::from_millis(250));
        assert!(config.allow_cross_protocol_redirects);
        assert_eq!(config.max_redirects, 3);
    }
}
