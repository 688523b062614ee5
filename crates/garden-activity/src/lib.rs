//! Garden Activity - rules over tasks and routines
//!
//! Everything the dashboard needs to turn stored records into an
//! [`ActivitySnapshot`](garden_core::ActivitySnapshot):
//! - [`day`]: which tasks belong to a day, and in what order
//! - [`routines`]: completion, daily roll-over and unlock progression
//! - [`streak`]: consecutive fully-completed days
//! - [`todos`]: to-dos generated for active routines
//!
//! All functions are synchronous and pure apart from logging.

#![warn(unreachable_pub)]

pub mod day;
pub mod error;
pub mod routines;
pub mod streak;
pub mod todos;

pub use day::{tasks_for_day, today_tasks, upcoming_tasks, DayTask};
pub use error::ActivityError;
pub use routines::{
    complete_routine, default_routines, progress, required_routine, roll_over, Completion,
    CompletionReport, DEFAULT_CHAIN,
};
pub use streak::{completed_days, FixedStreak, StreakCalculator, StreakSource, StreakSummary};
pub use todos::routine_todos_needed;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
