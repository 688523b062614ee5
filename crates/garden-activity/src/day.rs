//! Day view over tasks
//!
//! Today's list also carries every still-open task from earlier days, so
//! nothing overdue drops out of sight.

use chrono::NaiveDate;
use garden_core::{Priority, Task};
use serde::Serialize;

/// A task as shown on a given day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTask {
    /// The task
    #[serde(flatten)]
    pub task: Task,
    /// Days past its date, for overdue tasks carried into today
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_overdue: Option<i64>,
}

/// Tasks shown on `day`
///
/// Open tasks first, then high priority first; otherwise stored order.
#[must_use]
pub fn tasks_for_day(tasks: &[Task], day: NaiveDate, today: NaiveDate) -> Vec<DayTask> {
    let mut view: Vec<DayTask> = tasks
        .iter()
        .filter_map(|task| {
            if task.date == day {
                Some(DayTask {
                    task: task.clone(),
                    days_overdue: None,
                })
            } else if day == today && task.is_overdue(today) {
                Some(DayTask {
                    task: task.clone(),
                    days_overdue: Some((today - task.date).num_days()),
                })
            } else {
                None
            }
        })
        .collect();

    view.sort_by_key(|t| (t.task.completed, t.task.priority != Priority::High));
    view
}

/// Today's tasks, as fed into an evaluation
#[must_use]
pub fn today_tasks(tasks: &[Task], today: NaiveDate) -> Vec<Task> {
    tasks_for_day(tasks, today, today)
        .into_iter()
        .map(|t| t.task)
        .collect()
}

/// Tasks planned after `today`, earliest first
#[must_use]
pub fn upcoming_tasks(tasks: &[Task], today: NaiveDate) -> Vec<&Task> {
    let mut upcoming: Vec<&Task> = tasks.iter().filter(|t| t.date > today).collect();
    upcoming.sort_by_key(|t| t.date);
    upcoming
}
