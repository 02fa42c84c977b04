//! Listener and lifecycle settings for the HTTP binding.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8070;

#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub host: String,
    /// 0 lets the OS pick; `NetworkModule::start()` reports the bound port.
    pub port: u16,
    /// Serve HTTPS when set.
    pub tls: Option<TlsConfig>,
    /// `"*"` allows any origin.
    pub cors_origins: Vec<String>,
    /// Upper bound on one HTTP exchange. RPC deadlines are enforced
    /// separately by the endpoint pipeline and should stay below this.
    pub request_timeout: Duration,
    /// Grace period for in-flight RPCs once shutdown starts.
    pub drain_timeout: Duration,
}

impl NetworkConfig {
    /// Loopback on an OS-assigned port.
    #[must_use]
    pub fn loopback() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            tls: None,
            cors_origins: vec!["*".to_string()],
            request_timeout: Duration::from_secs(30),
            drain_timeout: Duration::from_secs(30),
        }
    }
}

/// PEM-encoded certificate chain and private key.
#[derive(Debug, Clone)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}
