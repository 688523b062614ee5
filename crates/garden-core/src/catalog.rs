//! Achievement rule catalog
//!
//! Provides [`RuleCatalog`], the static mapping from [`AchievementId`] to a
//! predicate over an [`ActivitySnapshot`] and the [`Reward`] it grants.

use crate::activity::ActivitySnapshot;
use crate::error::{CatalogError, PredicateError};
use crate::types::{AchievementId, Reward, RewardLevel};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Rule predicate
///
/// Must be pure: the same snapshot always yields the same answer.
pub type Predicate =
    Arc<dyn Fn(&ActivitySnapshot) -> Result<bool, PredicateError> + Send + Sync>;

/// One catalog entry
#[derive(Clone)]
pub struct AchievementRule {
    id: AchievementId,
    check: Predicate,
    reward: Reward,
}

impl AchievementRule {
    /// Create a rule
    pub fn new<F>(id: AchievementId, check: F, reward: Reward) -> Self
    where
        F: Fn(&ActivitySnapshot) -> Result<bool, PredicateError> + Send + Sync + 'static,
    {
        Self {
            id,
            check: Arc::new(check),
            reward,
        }
    }

    /// Achievement this rule grants
    #[inline]
    #[must_use]
    pub fn id(&self) -> AchievementId {
        self.id
    }

    /// Reward stamped on success
    #[inline]
    #[must_use]
    pub fn reward(&self) -> &Reward {
        &self.reward
    }

    /// Run the predicate
    ///
    /// # Errors
    /// Returns the predicate's fault when the snapshot cannot be judged
    pub fn check(&self, snapshot: &ActivitySnapshot) -> Result<bool, PredicateError> {
        (self.check)(snapshot)
    }
}

impl std::fmt::Debug for AchievementRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AchievementRule")
            .field("id", &self.id)
            .field("reward", &self.reward)
            .finish_non_exhaustive()
    }
}

static STANDARD: Lazy<RuleCatalog> = Lazy::new(RuleCatalog::build_standard);

/// Immutable, ordered set of achievement rules
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    rules: IndexMap<AchievementId, AchievementRule>,
}

impl RuleCatalog {
    /// The built-in catalog, one rule per [`AchievementId`]
    #[must_use]
    pub fn standard() -> &'static RuleCatalog {
        &STANDARD
    }

    /// Start building a custom catalog
    #[inline]
    #[must_use]
    pub fn builder() -> RuleCatalogBuilder {
        RuleCatalogBuilder::default()
    }

    /// Look up the rule for an achievement
    #[inline]
    #[must_use]
    pub fn find(&self, id: AchievementId) -> Option<&AchievementRule> {
        self.rules.get(&id)
    }

    /// Look up by suggestion text (exact, case-sensitive)
    #[must_use]
    pub fn find_by_text(&self, text: &str) -> Option<&AchievementRule> {
        AchievementId::from_suggestion(text).and_then(|id| self.find(id))
    }

    /// Check if the catalog has a rule for `id`
    #[inline]
    #[must_use]
    pub fn contains(&self, id: AchievementId) -> bool {
        self.rules.contains_key(&id)
    }

    /// Number of rules
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the catalog is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over rules in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &AchievementRule> {
        self.rules.values()
    }

    fn build_standard() -> Self {
        use AchievementId as A;
        use RewardLevel::{Flower, Leaf, Sprout};

        let entries = [
            AchievementRule::new(
                A::CompleteAllTasksToday,
                |s| Ok(!s.tasks.is_empty() && s.tasks.iter().all(|t| t.completed)),
                Reward::new(Sprout, "Daily Task Completion", "All tasks completed today"),
            ),
            AchievementRule::new(
                A::StickToRoutine,
                |s| Ok(s.routines.iter().any(|r| r.streak >= 3)),
                Reward::new(Sprout, "Routine Consistency", "Completed a routine for 3 days"),
            ),
            AchievementRule::new(
                A::ThreeDayStreak,
                |s| Ok(s.streak >= 3),
                Reward::new(Sprout, "3-Day Streak", "3 days of all tasks completed"),
            ),
            AchievementRule::new(
                A::UnlockSecondRoutine,
                |s| Ok(s.routines.iter().filter(|r| r.unlocked).count() >= 2),
                Reward::new(Sprout, "Routine Unlocked", "Unlocked 2 routines"),
            ),
            AchievementRule::new(
                A::StretchThreeDays,
                |s| Ok(routine_streak(s, |name| name == "Stretching", 3)),
                Reward::new(Sprout, "Stretch Champion", "Did stretching 3 days in a row"),
            ),
            AchievementRule::new(
                A::DrinkWaterThreeDays,
                |s| Ok(routine_streak(s, |name| name == "Drink Water", 3)),
                Reward::new(Sprout, "Hydration Hero", "Drank water for 3 days"),
            ),
            AchievementRule::new(
                A::FiveTasksInOneDay,
                |s| Ok(s.completed_tasks() >= 5),
                Reward::new(Leaf, "Heavy Task Day", "Completed 5+ tasks in one day"),
            ),
            AchievementRule::new(
                A::MaintainLevelTwoRoutine,
                |s| Ok(s.routines.iter().any(|r| r.level >= 2 && r.streak >= 3)),
                Reward::new(Leaf, "Advanced Routine", "Maintained a level 2 routine"),
            ),
            AchievementRule::new(
                A::SevenDayStreak,
                |s| Ok(s.streak >= 7),
                Reward::new(Leaf, "7-Day Streak", "Stayed consistent for 7 days"),
            ),
            AchievementRule::new(
                A::UnlockLevelThreeRoutine,
                |s| Ok(s.routines.iter().any(|r| r.level >= 3 && r.unlocked)),
                Reward::new(Leaf, "Routine Mastery", "Unlocked a level 3 routine"),
            ),
            AchievementRule::new(
                A::StartNewRoutine,
                |s| Ok(!s.routines.is_empty()),
                Reward::new(Sprout, "Routine Beginner", "Started a new routine"),
            ),
            AchievementRule::new(
                A::GardenGreenFiveDays,
                |s| {
                    let days = s
                        .garden_days
                        .ok_or(PredicateError::MissingInput("gardenDays"))?;
                    Ok(days >= 5)
                },
                Reward::new(Leaf, "Garden Keeper", "Kept your garden growing for 5 days"),
            ),
            AchievementRule::new(
                A::AllTasksThreeDays,
                |s| {
                    let days = s
                        .daily_task_completions
                        .ok_or(PredicateError::MissingInput("dailyTaskCompletions"))?;
                    Ok(days >= 3)
                },
                Reward::new(Leaf, "Task Pro", "3 full days of tasks completed"),
            ),
            AchievementRule::new(
                A::WakeUpEarlyThreeDays,
                |s| {
                    let early = |name: &str| name.eq_ignore_ascii_case("Wake up early");
                    Ok(routine_streak(s, early, 3))
                },
                Reward::new(Sprout, "Early Riser", "Woke up early 3 days in a row"),
            ),
            AchievementRule::new(
                A::FinishAllRoutines,
                |s| Ok(!s.routines.is_empty() && s.routines.iter().all(|r| r.done_today)),
                Reward::new(Leaf, "Routine Perfection", "Completed all routines today"),
            ),
            AchievementRule::new(
                A::FiveDayStreak,
                |s| Ok(s.streak >= 5),
                Reward::new(Flower, "5-Day Streak", "Completed all tasks for 5 days in a row"),
            ),
        ];

        let mut builder = Self::builder();
        for rule in entries {
            builder = builder.rule(rule);
        }
        // Ids in the table above are distinct.
        builder.build().unwrap_or_default()
    }
}

/// Some routine whose name satisfies `matches` has a streak of at least `min`
fn routine_streak(snapshot: &ActivitySnapshot, matches: impl Fn(&str) -> bool, min: u32) -> bool {
    snapshot
        .routines
        .iter()
        .any(|r| matches(&r.name) && r.streak >= min)
}

/// Builder for [`RuleCatalog`]
#[derive(Debug, Default)]
pub struct RuleCatalogBuilder {
    rules: Vec<AchievementRule>,
}

impl RuleCatalogBuilder {
    /// Add a rule
    #[must_use]
    pub fn rule(mut self, rule: AchievementRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Add every rule of `catalog`
    #[must_use]
    pub fn extend_from(mut self, catalog: &RuleCatalog) -> Self {
        self.rules.extend(catalog.iter().cloned());
        self
    }

    /// Finish the catalog
    ///
    /// # Errors
    /// Returns [`CatalogError::DuplicateRule`] if two rules share an id
    pub fn build(self) -> Result<RuleCatalog, CatalogError> {
        let mut rules = IndexMap::with_capacity(self.rules.len());
        for rule in self.rules {
            let id = rule.id();
            if rules.insert(id, rule).is_some() {
                return Err(CatalogError::DuplicateRule(id));
            }
        }
        Ok(RuleCatalog { rules })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{Routine, Task};
    use crate::evaluator::Evaluator;
    use crate::types::{GardenCell, GardenGrid};
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn check(id: AchievementId, snapshot: &ActivitySnapshot) -> Result<bool, PredicateError> {
        RuleCatalog::standard().find(id).unwrap().check(snapshot)
    }

    #[test]
    fn standard_covers_every_achievement_in_order() {
        let catalog = RuleCatalog::standard();
        assert_eq!(catalog.len(), AchievementId::ALL.len());
        let ids: Vec<_> = catalog.iter().map(AchievementRule::id).collect();
        assert_eq!(ids, AchievementId::ALL.to_vec());
    }

    #[test]
    fn find_by_text_is_exact() {
        let catalog = RuleCatalog::standard();
        assert!(catalog.find_by_text("Drink water for 3 days in a row").is_some());
        assert!(catalog.find_by_text("Drink water for 3 days in a row ").is_none());
        assert!(catalog.find_by_text("DRINK WATER FOR 3 DAYS IN A ROW").is_none());
    }

    #[test]
    fn all_tasks_rule_excludes_empty_day() {
        let empty = ActivitySnapshot::new(today());
        assert_eq!(check(AchievementId::CompleteAllTasksToday, &empty), Ok(false));

        let done = ActivitySnapshot::new(today()).with_tasks(vec![
            Task::new("a", today()).completed(),
            Task::new("b", today()).completed(),
        ]);
        assert_eq!(check(AchievementId::CompleteAllTasksToday, &done), Ok(true));
    }

    #[test]
    fn named_routine_rules() {
        let snapshot = ActivitySnapshot::new(today()).with_routines(vec![
            Routine::new("Drink Water", 1).unlocked().with_streak(3),
            Routine::new("Wake Up Early", 2).unlocked().with_streak(3),
            Routine::new("Stretching", 1).unlocked().with_streak(2),
        ]);
        assert_eq!(check(AchievementId::DrinkWaterThreeDays, &snapshot), Ok(true));
        assert_eq!(check(AchievementId::WakeUpEarlyThreeDays, &snapshot), Ok(true));
        assert_eq!(check(AchievementId::StretchThreeDays, &snapshot), Ok(false));
        assert_eq!(check(AchievementId::MaintainLevelTwoRoutine, &snapshot), Ok(true));
    }

    #[test]
    fn only_wake_up_early_ignores_case() {
        let shouted = ActivitySnapshot::new(today()).with_routines(vec![
            Routine::new("DRINK WATER", 1).unlocked().with_streak(3),
            Routine::new("stretching", 1).unlocked().with_streak(3),
            Routine::new("WAKE UP EARLY", 2).unlocked().with_streak(3),
        ]);
        assert_eq!(check(AchievementId::DrinkWaterThreeDays, &shouted), Ok(false));
        assert_eq!(check(AchievementId::StretchThreeDays, &shouted), Ok(false));
        assert_eq!(check(AchievementId::WakeUpEarlyThreeDays, &shouted), Ok(true));

        let grid = GardenGrid::from_cells(vec![GardenCell::empty(AchievementId::DrinkWaterThreeDays)]);
        let evaluation = Evaluator::new(RuleCatalog::standard()).evaluate(&grid, &shouted);
        assert!(!evaluation.is_updated());
    }

    #[test]
    fn optional_counters_fault_when_absent() {
        let snapshot = ActivitySnapshot::new(today());
        assert_eq!(
            check(AchievementId::GardenGreenFiveDays, &snapshot),
            Err(PredicateError::MissingInput("gardenDays"))
        );
        assert_eq!(
            check(AchievementId::AllTasksThreeDays, &snapshot),
            Err(PredicateError::MissingInput("dailyTaskCompletions"))
        );

        let counted = snapshot
            .with_garden_days(5)
            .with_daily_task_completions(2);
        assert_eq!(check(AchievementId::GardenGreenFiveDays, &counted), Ok(true));
        assert_eq!(check(AchievementId::AllTasksThreeDays, &counted), Ok(false));
    }

    #[test]
    fn streak_thresholds() {
        let snapshot = ActivitySnapshot::new(today()).with_streak(5);
        assert_eq!(check(AchievementId::ThreeDayStreak, &snapshot), Ok(true));
        assert_eq!(check(AchievementId::FiveDayStreak, &snapshot), Ok(true));
        assert_eq!(check(AchievementId::SevenDayStreak, &snapshot), Ok(false));
    }

    #[test]
    fn builder_rejects_duplicates() {
        let reward = Reward::new(RewardLevel::Sprout, "t", "d");
        let result = RuleCatalog::builder()
            .rule(AchievementRule::new(AchievementId::StartNewRoutine, |_| Ok(true), reward.clone()))
            .rule(AchievementRule::new(AchievementId::StartNewRoutine, |_| Ok(false), reward))
            .build();
        assert_eq!(
            result.unwrap_err(),
            CatalogError::DuplicateRule(AchievementId::StartNewRoutine)
        );
    }

    #[test]
    fn catalog_may_be_partial() {
        let catalog = RuleCatalog::builder()
            .rule(AchievementRule::new(
                AchievementId::StartNewRoutine,
                |_| Ok(true),
                Reward::new(RewardLevel::Sprout, "t", "d"),
            ))
            .build()
            .unwrap();
        assert!(catalog.contains(AchievementId::StartNewRoutine));
        assert!(catalog.find(AchievementId::FiveDayStreak).is_none());
    }
}
