//! Process-wide log output setup.
//!
//! Local and dev deployments get human-readable output at `debug`; qa, uat,
//! and prod get JSON lines at `info`. `RUST_LOG`, when set, replaces the
//! default filter.

use std::fmt;
use std::str::FromStr;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as layer_fmt, EnvFilter};

/// Deployment environment selecting the log format and default level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Local,
    Dev,
    Qa,
    Uat,
    Prod,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown environment {name:?} (expected local, dev, qa, uat or prod)")]
pub struct UnknownEnvironment {
    pub name: String,
}

impl Environment {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Dev => "dev",
            Self::Qa => "qa",
            Self::Uat => "uat",
            Self::Prod => "prod",
        }
    }

    /// Whether log lines are emitted as JSON.
    #[must_use]
    pub fn structured(self) -> bool {
        matches!(self, Self::Qa | Self::Uat | Self::Prod)
    }

    #[must_use]
    pub fn default_filter(self) -> &'static str {
        if self.structured() {
            "info"
        } else {
            "debug"
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "dev" => Ok(Self::Dev),
            "qa" => Ok(Self::Qa),
            "uat" => Ok(Self::Uat),
            "prod" => Ok(Self::Prod),
            _ => Err(UnknownEnvironment {
                name: s.to_string(),
            }),
        }
    }
}

fn filter_for(env: Environment) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env.default_filter()))
}

/// Installs the global subscriber for `env`.
///
/// Returns `false` when a subscriber was already installed, in which case
/// the existing one is left in place.
pub fn init(env: Environment) -> bool {
    let registry = tracing_subscriber::registry().with(filter_for(env));
    let installed = if env.structured() {
        registry
            .with(layer_fmt::layer().json().with_current_span(true))
            .try_init()
    } else {
        registry.with(layer_fmt::layer().with_target(true)).try_init()
    };
    installed.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_environments() {
        for env in [
            Environment::Local,
            Environment::Dev,
            Environment::Qa,
            Environment::Uat,
            Environment::Prod,
        ] {
            assert_eq!(env.as_str().parse::<Environment>(), Ok(env));
        }
        assert_eq!(" PROD ".parse::<Environment>(), Ok(Environment::Prod));
    }

    #[test]
    fn rejects_unknown_environment() {
        let err = "staging".parse::<Environment>().unwrap_err();
        assert_eq!(err.name, "staging");
        assert!(err.to_string().contains("staging"));
    }

    #[test]
    fn format_and_level_follow_environment() {
        assert!(!Environment::Local.structured());
        assert_eq!(Environment::Dev.default_filter(), "debug");
        assert!(Environment::Prod.structured());
        assert_eq!(Environment::Uat.default_filter(), "info");
    }

    #[test]
    fn init_is_idempotent() {
        let _first = init(Environment::Local);
        assert!(!init(Environment::Prod));
    }
}
