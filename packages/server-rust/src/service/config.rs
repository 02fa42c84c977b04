use std::time::Duration;

/// Server-level configuration for the movement request pipeline.
///
/// Controls per-request deadlines and the concurrency budget shared by all
/// movement endpoints.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Unique identifier for this server node, attached to log output.
    pub node_id: String,
    /// Deadline applied to requests whose caller did not set one, in milliseconds.
    pub default_request_timeout_ms: u64,
    /// Maximum number of concurrent endpoint calls before load shedding.
    pub max_concurrent_requests: u32,
}

impl ServerConfig {
    #[must_use]
    pub fn default_request_timeout(&self) -> Duration {
        Duration::from_millis(self.default_request_timeout_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            node_id: String::new(),
            default_request_timeout_ms: 30_000,
            max_concurrent_requests: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_defaults() {
        let config = ServerConfig::default();
        assert!(config.node_id.is_empty());
        assert_eq!(config.default_request_timeout(), Duration::from_secs(30));
        assert_eq!(config.max_concurrent_requests, 1000);
    }
}
