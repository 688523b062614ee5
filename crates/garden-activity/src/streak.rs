//! Completion streaks over task history
//!
//! A day is *complete* when it has at least one task and every task dated
//! that day is completed. Days without tasks break a streak.

use chrono::NaiveDate;
use garden_core::Task;
use serde::Serialize;
use std::collections::BTreeMap;

/// Source of the streak fed into evaluation
pub trait StreakSource: Send + Sync {
    /// Current streak as of `today`
    fn current_streak(&self, tasks: &[Task], today: NaiveDate) -> u32;
}

/// Streak statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    /// Run of complete days ending today (or yesterday while today is open)
    pub current: u32,
    /// Longest run of complete days up to today
    pub longest: u32,
    /// Complete days up to today
    pub completed_days: u32,
}

/// History-based streak
#[derive(Debug, Clone, Copy, Default)]
pub struct StreakCalculator;

impl StreakCalculator {
    /// Create a calculator
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Compute every streak statistic for `tasks` as of `today`
    #[must_use]
    pub fn summarize(&self, tasks: &[Task], today: NaiveDate) -> StreakSummary {
        let days = day_states(tasks, today);

        let completed_days = days.values().filter(|&&done| done).count();
        let mut longest = 0u32;
        let mut run = 0u32;
        let mut previous: Option<NaiveDate> = None;
        for (&date, &done) in &days {
            let consecutive = previous.and_then(|d| d.succ_opt()) == Some(date);
            run = match (done, consecutive) {
                (false, _) => 0,
                (true, true) => run + 1,
                (true, false) => 1,
            };
            longest = longest.max(run);
            previous = Some(date);
        }

        StreakSummary {
            current: current_run(&days, today),
            longest,
            completed_days: u32::try_from(completed_days).unwrap_or(u32::MAX),
        }
    }
}

impl StreakSource for StreakCalculator {
    fn current_streak(&self, tasks: &[Task], today: NaiveDate) -> u32 {
        current_run(&day_states(tasks, today), today)
    }
}

/// Constant streak, ignoring history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedStreak(pub u32);

impl StreakSource for FixedStreak {
    fn current_streak(&self, _tasks: &[Task], _today: NaiveDate) -> u32 {
        self.0
    }
}

/// Number of complete days up to `today`
#[must_use]
pub fn completed_days(tasks: &[Task], today: NaiveDate) -> u32 {
    let count = day_states(tasks, today).values().filter(|&&done| done).count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Completion state of every day up to `today` that has tasks
fn day_states(tasks: &[Task], today: NaiveDate) -> BTreeMap<NaiveDate, bool> {
    let mut days: BTreeMap<NaiveDate, bool> = BTreeMap::new();
    for task in tasks.iter().filter(|t| t.date <= today) {
        let done = days.entry(task.date).or_insert(true);
        *done &= task.completed;
    }
    days
}

fn current_run(days: &BTreeMap<NaiveDate, bool>, today: NaiveDate) -> u32 {
    // Today still counts as in progress until it is complete.
    let start = if days.get(&today).copied().unwrap_or(false) {
        Some(today)
    } else {
        today.pred_opt()
    };

    let mut run = 0;
    let mut cursor = start;
    while let Some(date) = cursor {
        if days.get(&date).copied().unwrap_or(false) {
            run += 1;
            cursor = date.pred_opt();
        } else {
            break;
        }
    }
    run
}
