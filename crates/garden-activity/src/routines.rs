//! Routine completion and progression
//!
//! Routines form an unlock chain: each locked routine names the routine it
//! `requires`, and unlocks once that routine's streak reaches its goal.
//! Routines stored without `requires` follow [`DEFAULT_CHAIN`].

use crate::error::ActivityError;
use chrono::{DateTime, NaiveDate, Utc};
use garden_core::Routine;
use serde::Serialize;

/// Unlock order of the default routines
pub const DEFAULT_CHAIN: [&str; 6] = [
    "Drink Water",
    "Stretching",
    "Wake Up Early",
    "5-min Meditation",
    "No Sugar Today",
    "Read 10 min",
];

/// Routine that must reach its goal before `routine` unlocks
///
/// The explicit `requires` wins; otherwise the predecessor in
/// [`DEFAULT_CHAIN`], if the name appears there.
#[must_use]
pub fn required_routine(routine: &Routine) -> Option<&str> {
    if let Some(dependency) = routine.requires.as_deref() {
        return Some(dependency);
    }
    let position = DEFAULT_CHAIN.iter().position(|name| *name == routine.name)?;
    position.checked_sub(1).map(|previous| DEFAULT_CHAIN[previous])
}

/// Default routine chain for a new user
#[must_use]
pub fn default_routines(now: DateTime<Utc>) -> Vec<Routine> {
    let mut first = Routine::new("Drink Water", 1).unlocked();
    first.created_at = Some(now);

    vec![
        first,
        Routine::new("Stretching", 1).requires("Drink Water"),
        Routine::new("Wake Up Early", 2).requires("Stretching"),
        Routine::new("5-min Meditation", 2).requires("Wake Up Early"),
        Routine::new("No Sugar Today", 3).requires("5-min Meditation"),
        Routine::new("Read 10 min", 3).requires("No Sugar Today"),
    ]
}

/// Bring routines up to `today`
///
/// Clears `done_today` for routines not completed today. A routine that
/// missed a whole day before reaching its goal starts its streak over.
/// Returns the number of routines changed.
pub fn roll_over(routines: &mut [Routine], today: NaiveDate) -> usize {
    let yesterday = today.pred_opt();
    let mut changed = 0;

    for routine in routines.iter_mut() {
        let before = (routine.done_today, routine.streak);
        let last = routine.last_completed_date;

        if last != Some(today) {
            routine.done_today = false;
        }
        let missed_day = match last {
            Some(date) => Some(date) < yesterday,
            None => false,
        };
        if missed_day && !routine.reached_goal() {
            routine.streak = 0;
        }

        if (routine.done_today, routine.streak) != before {
            tracing::debug!(routine = %routine.name, streak = routine.streak, "routine rolled over");
            changed += 1;
        }
    }
    changed
}

/// What happened when a routine was marked done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum Completion {
    /// Streak advanced
    Recorded {
        /// New streak
        streak: u32,
    },
    /// Already marked done today; nothing changed
    AlreadyDone,
    /// Goal already reached; nothing changed
    GoalReached,
}

/// Result of [`complete_routine`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionReport {
    /// Effect on the routine itself
    pub completion: Completion,
    /// Routines unlocked as a consequence
    pub unlocked: Vec<String>,
}

/// Mark the routine `name` done for `today`, then run [`progress`]
///
/// # Errors
/// - [`ActivityError::UnknownRoutine`] if no routine has that name
/// - [`ActivityError::RoutineLocked`] if it is still locked
pub fn complete_routine(
    routines: &mut [Routine],
    name: &str,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<CompletionReport, ActivityError> {
    let routine = routines
        .iter_mut()
        .find(|r| r.name == name)
        .ok_or_else(|| ActivityError::UnknownRoutine(name.to_string()))?;

    if !routine.unlocked {
        return Err(ActivityError::RoutineLocked {
            name: routine.name.clone(),
            condition: routine.unlock_condition.clone().unwrap_or_default(),
        });
    }

    let completion = if routine.last_completed_date == Some(today) {
        Completion::AlreadyDone
    } else if routine.reached_goal() {
        Completion::GoalReached
    } else {
        routine.streak += 1;
        routine.done_today = true;
        routine.last_completed_date = Some(today);
        tracing::info!(routine = %routine.name, streak = routine.streak, "routine completed");
        Completion::Recorded {
            streak: routine.streak,
        }
    };

    let unlocked = progress(routines, now);
    Ok(CompletionReport {
        completion,
        unlocked,
    })
}

/// Unlock every locked routine whose required routine reached its goal
///
/// Returns the names unlocked, in routine order.
pub fn progress(routines: &mut [Routine], now: DateTime<Utc>) -> Vec<String> {
    let finished: Vec<String> = routines
        .iter()
        .filter(|r| r.reached_goal())
        .map(|r| r.name.clone())
        .collect();

    let mut unlocked = Vec::new();
    for routine in routines.iter_mut().filter(|r| !r.unlocked) {
        let ready = required_routine(routine)
            .is_some_and(|dep| finished.iter().any(|name| name == dep));
        if ready {
            routine.unlocked = true;
            routine.created_at = Some(now);
            tracing::info!(routine = %routine.name, "routine unlocked");
            unlocked.push(routine.name.clone());
        }
    }
    unlocked
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_714_550_400, 0).unwrap()
    }

    #[test]
    fn default_chain() {
        let routines = default_routines(now());
        assert_eq!(routines.len(), 6);
        assert!(routines[0].unlocked);
        assert!(routines[1..].iter().all(|r| !r.unlocked));
        assert_eq!(routines[2].requires.as_deref(), Some("Stretching"));
        assert_eq!(routines[5].level, 3);
    }

    #[test]
    fn completing_three_days_unlocks_next() {
        let mut routines = default_routines(now());
        for d in 1..=2 {
            let report = complete_routine(&mut routines, "Drink Water", day(d), now()).unwrap();
            assert!(report.unlocked.is_empty());
        }
        let report = complete_routine(&mut routines, "Drink Water", day(3), now()).unwrap();
        assert_eq!(report.completion, Completion::Recorded { streak: 3 });
        assert_eq!(report.unlocked, vec!["Stretching".to_string()]);
        assert!(routines[1].unlocked);
        assert_eq!(routines[1].created_at, Some(now()));
    }

    #[test]
    fn second_completion_same_day_is_ignored() {
        let mut routines = default_routines(now());
        complete_routine(&mut routines, "Drink Water", day(1), now()).unwrap();
        let report = complete_routine(&mut routines, "Drink Water", day(1), now()).unwrap();
        assert_eq!(report.completion, Completion::AlreadyDone);
        assert_eq!(routines[0].streak, 1);
    }

    #[test]
    fn goal_caps_streak() {
        let mut routines = vec![Routine::new("Drink Water", 1).unlocked().with_streak(3)];
        let report = complete_routine(&mut routines, "Drink Water", day(4), now()).unwrap();
        assert_eq!(report.completion, Completion::GoalReached);
        assert_eq!(routines[0].streak, 3);
    }

    #[test]
    fn locked_and_unknown_routines_fail() {
        let mut routines = default_routines(now());
        assert_eq!(
            complete_routine(&mut routines, "Stretching", day(1), now()),
            Err(ActivityError::RoutineLocked {
                name: "Stretching".into(),
                condition: "Complete Drink Water for 3 days".into(),
            })
        );
        assert_eq!(
            complete_routine(&mut routines, "Juggling", day(1), now()),
            Err(ActivityError::UnknownRoutine("Juggling".into()))
        );
    }

    #[test]
    fn stored_routines_without_requires_follow_default_chain() {
        let mut routines: Vec<Routine> = serde_json::from_value(serde_json::json!([
            {"name": "Drink Water", "level": 1, "streak": 3, "goal": 3, "doneToday": true,
             "unlocked": true, "lastCompletedDate": "2024-05-03"},
            {"name": "Stretching", "level": 1, "streak": 0, "goal": 3, "doneToday": false,
             "unlocked": false, "unlockCondition": "Complete Drink Water for 3 days"},
            {"name": "Wake Up Early", "level": 2, "streak": 0, "goal": 3, "doneToday": false,
             "unlocked": false, "unlockCondition": "Complete Stretching for 3 days"}
        ]))
        .unwrap();

        assert_eq!(progress(&mut routines, now()), vec!["Stretching".to_string()]);
        assert!(routines[1].unlocked);
        assert!(!routines[2].unlocked);
    }

    #[test]
    fn required_routine_prefers_explicit_dependency() {
        assert_eq!(required_routine(&Routine::new("Stretching", 1)), Some("Drink Water"));
        assert_eq!(required_routine(&Routine::new("Drink Water", 1)), None);
        assert_eq!(required_routine(&Routine::new("Juggling", 1)), None);
        assert_eq!(
            required_routine(&Routine::new("Stretching", 1).requires("Juggling")),
            Some("Juggling")
        );
    }

    #[test]
    fn roll_over_clears_done_flag() {
        let mut routines = default_routines(now());
        complete_routine(&mut routines, "Drink Water", day(1), now()).unwrap();

        assert_eq!(roll_over(&mut routines, day(1)), 0);
        assert!(routines[0].done_today);

        assert_eq!(roll_over(&mut routines, day(2)), 1);
        assert!(!routines[0].done_today);
        assert_eq!(routines[0].streak, 1);
    }

    #[test]
    fn roll_over_resets_broken_streak() {
        let mut routines = default_routines(now());
        complete_routine(&mut routines, "Drink Water", day(1), now()).unwrap();
        complete_routine(&mut routines, "Drink Water", day(2), now()).unwrap();

        roll_over(&mut routines, day(4));
        assert_eq!(routines[0].streak, 0);
    }

    #[test]
    fn roll_over_keeps_finished_streak() {
        let mut routine = Routine::new("Drink Water", 1).unlocked().with_streak(3);
        routine.last_completed_date = Some(day(1));
        let mut routines = vec![routine];

        roll_over(&mut routines, day(10));
        assert_eq!(routines[0].streak, 3);
    }
}
