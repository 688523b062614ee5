//! Garden Core - achievement model and evaluator
//!
//! The pure part of the garden:
//! - [`GardenCell`] / [`GardenGrid`]: the fixed-order reward board
//! - [`RuleCatalog`]: the static list of achievements and their predicates
//! - [`Evaluator`]: single-pass, deterministic rule matching over a grid
//! - [`ActivitySnapshot`]: the transient input built from tasks and routines
//!
//! Nothing in this crate performs I/O. Persistence lives in `garden-store`,
//! and the dashboard orchestrator wires both together.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use garden_core::{evaluate, ActivitySnapshot, GardenGrid, Task};
//!
//! let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
//! let grid = GardenGrid::initial();
//! let snapshot = ActivitySnapshot::new(today)
//!     .with_tasks(vec![Task::new("water plants", today).completed()]);
//!
//! let evaluation = evaluate(&grid, &snapshot);
//! assert!(evaluation.is_updated());
//! ```

#![warn(unreachable_pub)]

pub mod activity;
pub mod catalog;
pub mod error;
pub mod evaluator;
pub mod types;

pub use activity::{ActivitySnapshot, Priority, Routine, Task, TaskId, TaskKind};
pub use catalog::{AchievementRule, Predicate, RuleCatalog, RuleCatalogBuilder};
pub use error::{CatalogError, CellDecodeError, PredicateError};
pub use evaluator::{evaluate, Award, Evaluation, EvaluationOutcome, Evaluator, RuleFault};
pub use types::{AchievementId, GardenCell, GardenGrid, Reward, RewardLevel, Suggestion, UserId};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the garden core
    pub use crate::{
        evaluate, AchievementId, ActivitySnapshot, Evaluation, EvaluationOutcome, Evaluator,
        GardenCell, GardenGrid, Reward, RewardLevel, Routine, RuleCatalog, Task, UserId,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
