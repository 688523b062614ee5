//! Garden Dashboard - refresh orchestration
//!
//! The [`Dashboard`] owns all I/O around the pure evaluator:
//! 1. Load tasks and routines
//! 2. Roll routines over and create missing routine to-dos
//! 3. Ensure the garden grid exists
//! 4. Build an activity snapshot and evaluate it
//! 5. Persist the grid only when a cell was earned
//!
//! # Example
//!
//! ```rust,ignore
//! use garden_dashboard::{Dashboard, DashboardConfig};
//! use garden_store::MemoryStore;
//! use std::sync::Arc;
//!
//! let dashboard = Dashboard::new(Arc::new(MemoryStore::new()), DashboardConfig::default());
//! let view = dashboard.refresh(&"ana".into(), today, chrono::Utc::now()).await?;
//! println!("{}", garden_dashboard::render_grid(&view.grid, 4));
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod render;
pub mod retry;

pub use config::{DashboardConfig, LoggingConfig, StreakMode};
pub use error::{ConfigError, DashboardError};
pub use logging::{env_filter, init_tracing};
pub use orchestrator::{Dashboard, DashboardStore, DashboardView};
pub use render::{describe_cells, render_grid};
pub use retry::{with_retry, RetryPolicy};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
