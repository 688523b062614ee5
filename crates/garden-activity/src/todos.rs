//! To-dos generated for active routines

use chrono::{DateTime, NaiveDate, Utc};
use garden_core::{Routine, Task, TaskKind};

/// Routine tasks missing for `today`
///
/// One task per unlocked routine still below its goal, unless a routine task
/// for it already exists today.
#[must_use]
pub fn routine_todos_needed(
    routines: &[Routine],
    existing: &[Task],
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Vec<Task> {
    let present: Vec<&str> = existing
        .iter()
        .filter(|t| t.date == today && t.kind == TaskKind::Routine)
        .filter_map(|t| t.routine_name.as_deref())
        .collect();

    routines
        .iter()
        .filter(|r| r.is_active() && !present.contains(&r.name.as_str()))
        .map(|r| {
            let mut task = Task::new(r.name.clone(), today);
            task.kind = TaskKind::Routine;
            task.routine_name = Some(r.name.clone());
            task.created_at = Some(now);
            task
        })
        .collect()
}
