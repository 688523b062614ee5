//! Tracing subscriber setup
//!
//! `RUST_LOG` wins over [`LoggingConfig::level`]. Output goes to stderr so
//! that command output on stdout stays machine-readable.

use crate::config::LoggingConfig;
use crate::error::DashboardError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`, falling back to the configured level
///
/// # Errors
/// Returns [`DashboardError::Logging`] if the configured directive is invalid
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, DashboardError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| DashboardError::Logging(format!("bad level `{}`: {e}", config.level))),
    }
}

/// Install the global subscriber
///
/// # Errors
/// Returns [`DashboardError::Logging`] on a bad filter or when a subscriber
/// is already installed
pub fn init_tracing(config: &LoggingConfig) -> Result<(), DashboardError> {
    let filter = env_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    result.map_err(|e| DashboardError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_level() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig {
            level: "garden=verbose".to_string(),
            json: false,
        };
        assert!(matches!(env_filter(&config), Err(DashboardError::Logging(_))));
    }

    #[test]
    fn second_init_fails() {
        let config = LoggingConfig::default();
        let _ = init_tracing(&config);
        assert!(init_tracing(&config).is_err());
    }
}
