//! Dashboard configuration
//!
//! Loaded from TOML; every field has a default, so an empty file is valid.
//!
//! ```toml
//! data_dir = "/var/lib/garden"
//! create_routine_todos = true
//!
//! [retry]
//! max_attempts = 5
//!
//! [streak]
//! mode = "fixed"
//! value = 3
//!
//! [logging]
//! level = "debug"
//! json = true
//! ```

use crate::error::ConfigError;
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How the streak fed into evaluation is obtained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum StreakMode {
    /// Computed from task history
    #[default]
    History,
    /// Constant value
    Fixed {
        /// Streak reported for every evaluation
        value: u32,
    },
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Root directory of the file store
    pub data_dir: PathBuf,
    /// Retry policy for store calls
    pub retry: RetryPolicy,
    /// Streak source
    pub streak: StreakMode,
    /// Create to-dos for active routines on refresh
    pub create_routine_todos: bool,
    /// Give users without routines the default routine chain
    pub seed_default_routines: bool,
    /// Logging
    pub logging: LoggingConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("garden-data"),
            retry: RetryPolicy::default(),
            streak: StreakMode::default(),
            create_routine_todos: true,
            seed_default_routines: true,
            logging: LoggingConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] or [`ConfigError::Invalid`]
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Self::from_toml_str`]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first bad field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "retry.max_attempts",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.retry.multiplier >= 1.0) {
            return Err(ConfigError::Invalid {
                field: "retry.multiplier",
                reason: format!("must be >= 1.0, got {}", self.retry.multiplier),
            });
        }
        Ok(())
    }

    /// With data directory
    #[inline]
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// With retry policy
    #[inline]
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// With streak source
    #[inline]
    #[must_use]
    pub fn with_streak(mut self, streak: StreakMode) -> Self {
        self.streak = streak;
        self
    }

    /// With routine to-do creation toggled
    #[inline]
    #[must_use]
    pub fn with_routine_todos(mut self, enabled: bool) -> Self {
        self.create_routine_todos = enabled;
        self
    }

    /// With default routine seeding toggled
    #[inline]
    #[must_use]
    pub fn with_default_routines(mut self, enabled: bool) -> Self {
        self.seed_default_routines = enabled;
        self
    }
}
