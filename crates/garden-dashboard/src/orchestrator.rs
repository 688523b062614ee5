//! Refresh orchestration
//!
//! [`Dashboard::refresh`] is the only place where evaluation meets I/O:
//!
//! 1. Load tasks and routines concurrently
//! 2. Roll routines over to `today`, seeding defaults for new users
//! 3. Create missing routine to-dos (when enabled)
//! 4. Ensure the grid exists
//! 5. Build the [`ActivitySnapshot`] and evaluate
//! 6. Save the grid only when the evaluation is `Updated`
//!
//! Every store call goes through [`with_retry`]; retryable failures are
//! retried per the configured [`RetryPolicy`](crate::RetryPolicy).

use crate::config::{DashboardConfig, StreakMode};
use crate::error::DashboardError;
use crate::retry::with_retry;
use chrono::{DateTime, NaiveDate, Utc};
use futures::try_join;
use garden_activity::{
    complete_routine, completed_days, default_routines, roll_over, routine_todos_needed,
    tasks_for_day, today_tasks, CompletionReport, DayTask, FixedStreak, StreakCalculator,
    StreakSource, StreakSummary,
};
use garden_core::{
    ActivitySnapshot, Award, EvaluationOutcome, Evaluator, GardenCell, GardenGrid, Routine,
    RuleCatalog, RuleFault, Task, TaskId, UserId,
};
use garden_store::{ActivityStore, GardenService, GridStore};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A store serving both grids and activity
pub trait DashboardStore: GridStore + ActivityStore {}

impl<T: GridStore + ActivityStore + ?Sized> DashboardStore for T {}

/// What the dashboard shows after a refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// Whose dashboard
    pub user: UserId,
    /// Day the view was computed for
    pub today: NaiveDate,
    /// Current grid
    pub grid: GardenGrid,
    /// Cells filled by this refresh
    pub awarded: Vec<Award>,
    /// Rules that could not be checked
    pub faults: Vec<RuleFault>,
    /// Whether the grid was written
    pub persisted: bool,
    /// Today's list, overdue tasks included
    pub today_tasks: Vec<DayTask>,
    /// Routines after roll-over
    pub routines: Vec<Routine>,
    /// Streak statistics
    pub streak: StreakSummary,
}

/// Dashboard bound to a store
pub struct Dashboard<S: ?Sized> {
    store: Arc<S>,
    garden: GardenService<S>,
    catalog: Arc<RuleCatalog>,
    streak: Box<dyn StreakSource>,
    config: DashboardConfig,
}

impl<S: ?Sized> fmt::Debug for Dashboard<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dashboard")
            .field("rules", &self.catalog.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S: DashboardStore + ?Sized> Dashboard<S> {
    /// Create a dashboard with the standard catalog
    ///
    /// The streak source follows `config.streak`.
    #[must_use]
    pub fn new(store: Arc<S>, config: DashboardConfig) -> Self {
        let streak: Box<dyn StreakSource> = match config.streak {
            StreakMode::History => Box::new(StreakCalculator::new()),
            StreakMode::Fixed { value } => Box::new(FixedStreak(value)),
        };
        Self {
            garden: GardenService::new(Arc::clone(&store)),
            store,
            catalog: Arc::new(RuleCatalog::standard().clone()),
            streak,
            config,
        }
    }

    /// With a custom rule catalog
    #[inline]
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<RuleCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    /// With a custom streak source
    #[inline]
    #[must_use]
    pub fn with_streak_source(mut self, source: impl StreakSource + 'static) -> Self {
        self.streak = Box::new(source);
        self
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Rule catalog in use
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// Grid service over the same store
    #[inline]
    #[must_use]
    pub fn garden(&self) -> &GardenService<S> {
        &self.garden
    }

    /// Refresh the user's dashboard for `today`
    ///
    /// # Errors
    /// Returns [`DashboardError::Store`] when a store call fails for good.
    /// Rule faults are not errors; they are reported in the view.
    #[tracing::instrument(skip(self, user, now), fields(user = %user))]
    pub async fn refresh(
        &self,
        user: &UserId,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<DashboardView, DashboardError> {
        let retry = &self.config.retry;
        let (mut tasks, mut routines) = try_join!(
            with_retry(retry, "load_tasks", || self.store.load_tasks(user)),
            with_retry(retry, "load_routines", || self.store.load_routines(user)),
        )?;

        let mut routines_changed = false;
        if routines.is_empty() && self.config.seed_default_routines {
            routines = default_routines(now);
            routines_changed = true;
            tracing::info!(count = routines.len(), "default routines seeded");
        }
        if roll_over(&mut routines, today) > 0 {
            routines_changed = true;
        }
        if routines_changed {
            with_retry(retry, "save_routines", || self.store.save_routines(user, &routines)).await?;
        }

        if self.config.create_routine_todos {
            for task in routine_todos_needed(&routines, &tasks, today, now) {
                with_retry(retry, "add_task", || self.store.add_task(user, task.clone())).await?;
                tracing::debug!(routine = ?task.routine_name, "routine to-do created");
                tasks.push(task);
            }
        }

        let grid = with_retry(retry, "ensure_grid", || self.garden.ensure_grid(user)).await?;

        let snapshot = self.snapshot(&grid, &tasks, &routines, today);
        let evaluation = Evaluator::new(&self.catalog).evaluate(&grid, &snapshot);
        let faults = evaluation.faults;

        let (grid, awarded, persisted) = match evaluation.outcome {
            EvaluationOutcome::NoChange => (grid, Vec::new(), false),
            EvaluationOutcome::Updated { grid, awarded } => {
                with_retry(retry, "save_grid", || self.store.save_grid(user, &grid)).await?;
                tracing::info!(awarded = awarded.len(), "garden updated");
                (grid, awarded, true)
            }
        };

        Ok(DashboardView {
            user: user.clone(),
            today,
            grid,
            awarded,
            faults,
            persisted,
            today_tasks: tasks_for_day(&tasks, today, today),
            streak: self.streak_summary(&tasks, today),
            routines,
        })
    }

    /// Current dashboard without evaluating or writing anything
    ///
    /// A user without a grid is shown the initial grid.
    ///
    /// # Errors
    /// Propagates store failures
    pub async fn show(&self, user: &UserId, today: NaiveDate) -> Result<DashboardView, DashboardError> {
        let retry = &self.config.retry;
        let (grid, tasks, mut routines) = try_join!(
            with_retry(retry, "load_grid", || self.store.load_grid(user)),
            with_retry(retry, "load_tasks", || self.store.load_tasks(user)),
            with_retry(retry, "load_routines", || self.store.load_routines(user)),
        )?;
        roll_over(&mut routines, today);

        Ok(DashboardView {
            user: user.clone(),
            today,
            grid: grid.filter(|g| !g.is_empty()).unwrap_or_else(GardenGrid::initial),
            awarded: Vec::new(),
            faults: Vec::new(),
            persisted: false,
            today_tasks: tasks_for_day(&tasks, today, today),
            streak: self.streak_summary(&tasks, today),
            routines,
        })
    }

    /// Mark a routine done for `today`
    ///
    /// # Errors
    /// - [`DashboardError::Activity`] for unknown or locked routines
    /// - [`DashboardError::Store`] on store failure
    pub async fn complete_routine(
        &self,
        user: &UserId,
        name: &str,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<CompletionReport, DashboardError> {
        let retry = &self.config.retry;
        let mut routines = with_retry(retry, "load_routines", || self.store.load_routines(user)).await?;
        roll_over(&mut routines, today);
        let report = complete_routine(&mut routines, name, today, now)?;
        with_retry(retry, "save_routines", || self.store.save_routines(user, &routines)).await?;
        Ok(report)
    }

    /// Add a task
    ///
    /// # Errors
    /// Propagates store failures
    pub async fn add_task(&self, user: &UserId, task: Task) -> Result<Task, DashboardError> {
        with_retry(&self.config.retry, "add_task", || {
            self.store.add_task(user, task.clone())
        })
        .await?;
        tracing::debug!(user = %user, task = %task.id, "task added");
        Ok(task)
    }

    /// Flip a task's completion, returning the updated task
    ///
    /// # Errors
    /// - [`DashboardError::TaskNotFound`] if the user has no such task
    /// - [`DashboardError::Store`] on store failure
    pub async fn toggle_task(
        &self,
        user: &UserId,
        id: &TaskId,
        today: NaiveDate,
    ) -> Result<Task, DashboardError> {
        let retry = &self.config.retry;
        let tasks = with_retry(retry, "load_tasks", || self.store.load_tasks(user)).await?;
        let mut task = tasks
            .into_iter()
            .find(|t| &t.id == id)
            .ok_or_else(|| DashboardError::TaskNotFound(id.clone()))?;
        task.toggle(today);
        with_retry(retry, "update_task", || self.store.update_task(user, task.clone())).await?;
        Ok(task)
    }

    /// Drop an earned cell into the first free slot, see
    /// [`GardenService::add_garden_point`]
    ///
    /// # Errors
    /// Propagates store failures
    pub async fn add_garden_point(&self, user: &UserId, cell: GardenCell) -> Result<GardenGrid, DashboardError> {
        Ok(with_retry(&self.config.retry, "add_garden_point", || {
            self.garden.add_garden_point(user, cell.clone())
        })
        .await?)
    }

    fn snapshot(
        &self,
        grid: &GardenGrid,
        tasks: &[Task],
        routines: &[Routine],
        today: NaiveDate,
    ) -> ActivitySnapshot {
        let garden_days = u32::try_from(grid.growing_days().len()).unwrap_or(u32::MAX);
        ActivitySnapshot::new(today)
            .with_tasks(today_tasks(tasks, today))
            .with_streak(self.streak.current_streak(tasks, today))
            .with_routines(routines.to_vec())
            .with_garden_days(garden_days)
            .with_daily_task_completions(completed_days(tasks, today))
    }

    fn streak_summary(&self, tasks: &[Task], today: NaiveDate) -> StreakSummary {
        StreakSummary {
            current: self.streak.current_streak(tasks, today),
            ..StreakCalculator::new().summarize(tasks, today)
        }
    }
}
