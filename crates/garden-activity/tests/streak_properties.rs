use chrono::{Days, NaiveDate};
use garden_activity::{roll_over, tasks_for_day, StreakCalculator, StreakSource};
use garden_core::{Routine, Task};
use proptest::prelude::*;

fn base_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

fn history_strategy() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec((0u64..20, any::<bool>()), 0..40).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(offset, done)| {
                let task = Task::new("t", base_day() + Days::new(offset));
                if done {
                    task.completed()
                } else {
                    task
                }
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_streak_bounds(tasks in history_strategy(), offset in 0u64..25) {
        let today = base_day() + Days::new(offset);
        let summary = StreakCalculator.summarize(&tasks, today);
        prop_assert!(summary.current <= summary.longest);
        prop_assert!(summary.longest <= summary.completed_days);
        prop_assert_eq!(summary.current, StreakCalculator.current_streak(&tasks, today));
    }

    #[test]
    fn prop_day_view_keeps_only_relevant_tasks(tasks in history_strategy(), offset in 0u64..25) {
        let today = base_day() + Days::new(offset);
        for shown in tasks_for_day(&tasks, today, today) {
            prop_assert!(shown.task.date == today || shown.task.is_overdue(today));
        }
    }

    #[test]
    fn prop_roll_over_is_idempotent(streak in 0u32..5, last in prop::option::of(0u64..10), offset in 0u64..12) {
        let today = base_day() + Days::new(offset);
        let mut routine = Routine::new("Drink Water", 1).unlocked().with_streak(streak);
        routine.last_completed_date = last.map(|d| base_day() + Days::new(d));
        routine.done_today = routine.last_completed_date.is_some();

        let mut once = vec![routine];
        roll_over(&mut once, today);
        let mut twice = once.clone();
        prop_assert_eq!(roll_over(&mut twice, today), 0);
        prop_assert_eq!(once, twice);
    }
}
