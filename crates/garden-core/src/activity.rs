//! Activity records and the evaluation snapshot
//!
//! [`Task`] and [`Routine`] mirror the stored user records. An
//! [`ActivitySnapshot`] bundles the slice of them relevant to one evaluation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Task identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    /// Generate a new sortable id
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Ulid::new().to_string())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::generate()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Default priority
    #[default]
    Normal,
    /// Sorted ahead of normal tasks
    High,
}

/// Where a task came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Entered by the user
    #[default]
    Manual,
    /// Generated for an active routine
    Routine,
}

/// A dated to-do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Identifier
    #[serde(default)]
    pub id: TaskId,
    /// Title
    pub title: String,
    /// Completion flag
    #[serde(default)]
    pub completed: bool,
    /// Day the task is planned for
    pub date: NaiveDate,
    /// Priority
    #[serde(default)]
    pub priority: Priority,
    /// Free-form category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Origin
    #[serde(rename = "type", default)]
    pub kind: TaskKind,
    /// Routine this task was generated for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routine_name: Option<String>,
    /// Creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create an open task for `date`
    #[must_use]
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: TaskId::generate(),
            title: title.into(),
            completed: false,
            date,
            priority: Priority::Normal,
            category: None,
            kind: TaskKind::Manual,
            routine_name: None,
            created_at: None,
        }
    }

    /// Mark completed
    #[inline]
    #[must_use]
    pub fn completed(mut self) -> Self {
        self.completed = true;
        self
    }

    /// With priority
    #[inline]
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// With category
    #[inline]
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// With a fixed id
    #[inline]
    #[must_use]
    pub fn with_id(mut self, id: impl Into<TaskId>) -> Self {
        self.id = id.into();
        self
    }

    /// Check if the task is still open on a day after its date
    #[inline]
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.date < today
    }

    /// Flip completion
    ///
    /// Completing an overdue task moves it to `today`, so it counts towards
    /// the day it was actually done.
    pub fn toggle(&mut self, today: NaiveDate) {
        if self.is_overdue(today) {
            self.date = today;
        }
        self.completed = !self.completed;
    }
}

/// A recurring habit with a completion streak
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    /// Display name
    pub name: String,
    /// Difficulty tier
    #[serde(default = "default_routine_level")]
    pub level: u8,
    /// Consecutive completions
    #[serde(default)]
    pub streak: u32,
    /// Streak length that completes the routine
    #[serde(default = "default_routine_goal")]
    pub goal: u32,
    /// Completed today
    #[serde(default)]
    pub done_today: bool,
    /// Available to the user
    #[serde(default)]
    pub unlocked: bool,
    /// Human-readable unlock hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlock_condition: Option<String>,
    /// Routine whose goal unlocks this one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<String>,
    /// Last completion day
    #[serde(default)]
    pub last_completed_date: Option<NaiveDate>,
    /// Unlock time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_routine_level() -> u8 {
    1
}

fn default_routine_goal() -> u32 {
    3
}

impl Routine {
    /// Create a locked routine with the default goal
    #[must_use]
    pub fn new(name: impl Into<String>, level: u8) -> Self {
        Self {
            name: name.into(),
            level,
            streak: 0,
            goal: default_routine_goal(),
            done_today: false,
            unlocked: false,
            unlock_condition: None,
            requires: None,
            last_completed_date: None,
            created_at: None,
        }
    }

    /// Mark unlocked
    #[inline]
    #[must_use]
    pub fn unlocked(mut self) -> Self {
        self.unlocked = true;
        self
    }

    /// With streak
    #[inline]
    #[must_use]
    pub fn with_streak(mut self, streak: u32) -> Self {
        self.streak = streak;
        self
    }

    /// With goal
    #[inline]
    #[must_use]
    pub fn with_goal(mut self, goal: u32) -> Self {
        self.goal = goal;
        self
    }

    /// Mark done today
    #[inline]
    #[must_use]
    pub fn done_today(mut self) -> Self {
        self.done_today = true;
        self
    }

    /// Unlocked once `dependency` reaches its goal
    #[must_use]
    pub fn requires(mut self, dependency: impl Into<String>) -> Self {
        let dependency = dependency.into();
        self.unlock_condition = Some(format!(
            "Complete {dependency} for {} days",
            self.goal
        ));
        self.requires = Some(dependency);
        self
    }

    /// Check if the streak reached the goal
    #[inline]
    #[must_use]
    pub fn reached_goal(&self) -> bool {
        self.streak >= self.goal
    }

    /// Check if the routine is unlocked and still working towards its goal
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.unlocked && !self.reached_goal()
    }
}

/// Input to one evaluation pass
///
/// Built fresh for every pass and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySnapshot {
    /// Tasks considered "today"
    pub tasks: Vec<Task>,
    /// Consecutive fully-completed days
    pub streak: u32,
    /// The user's routines
    pub routines: Vec<Routine>,
    /// Date stamped on newly earned cells
    pub today: NaiveDate,
    /// Distinct days the garden grew on, when known
    #[serde(default)]
    pub garden_days: Option<u32>,
    /// Fully completed task days, when known
    #[serde(default)]
    pub daily_task_completions: Option<u32>,
}

impl ActivitySnapshot {
    /// Empty snapshot for `today`
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            tasks: Vec::new(),
            streak: 0,
            routines: Vec::new(),
            today,
            garden_days: None,
            daily_task_completions: None,
        }
    }

    /// With today's tasks
    #[inline]
    #[must_use]
    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    /// With streak
    #[inline]
    #[must_use]
    pub fn with_streak(mut self, streak: u32) -> Self {
        self.streak = streak;
        self
    }

    /// With routines
    #[inline]
    #[must_use]
    pub fn with_routines(mut self, routines: Vec<Routine>) -> Self {
        self.routines = routines;
        self
    }

    /// With garden day count
    #[inline]
    #[must_use]
    pub fn with_garden_days(mut self, days: u32) -> Self {
        self.garden_days = Some(days);
        self
    }

    /// With fully completed task day count
    #[inline]
    #[must_use]
    pub fn with_daily_task_completions(mut self, days: u32) -> Self {
        self.daily_task_completions = Some(days);
        self
    }

    /// Number of completed tasks
    #[must_use]
    pub fn completed_tasks(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }
}
