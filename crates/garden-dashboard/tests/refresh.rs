use async_trait::async_trait;
use garden_core::{
    AchievementId, GardenCell, GardenGrid, Reward, RewardLevel, Routine, Task, UserId,
};
use garden_dashboard::{Dashboard, DashboardConfig, DashboardError, RetryPolicy};
use garden_store::{ActivityStore, FileStore, GridStore, MemoryStore, StoreError};
use garden_test_utils::{day, day_offset, done_tasks, now, seeded_store, streak_history, user, FlakyStore};
use mockall::mock;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

mock! {
    Store {}

    #[async_trait]
    impl GridStore for Store {
        async fn load_grid(&self, user: &UserId) -> Result<Option<GardenGrid>, StoreError>;
        async fn save_grid(&self, user: &UserId, grid: &GardenGrid) -> Result<(), StoreError>;
    }

    #[async_trait]
    impl ActivityStore for Store {
        async fn load_tasks(&self, user: &UserId) -> Result<Vec<Task>, StoreError>;
        async fn load_routines(&self, user: &UserId) -> Result<Vec<Routine>, StoreError>;
        async fn save_routines(&self, user: &UserId, routines: &[Routine]) -> Result<(), StoreError>;
        async fn add_task(&self, user: &UserId, task: Task) -> Result<(), StoreError>;
        async fn update_task(&self, user: &UserId, task: Task) -> Result<(), StoreError>;
    }
}

fn quiet() -> DashboardConfig {
    DashboardConfig::default()
        .with_routine_todos(false)
        .with_default_routines(false)
        .with_retry(RetryPolicy::default().with_initial_backoff(Duration::from_millis(1)))
}

fn awarded_ids(view: &garden_dashboard::DashboardView) -> Vec<AchievementId> {
    view.awarded.iter().map(|a| a.achievement).collect()
}

#[tokio::test]
async fn five_day_history_earns_streak_cells() {
    let today = day(5);
    let store = seeded_store(streak_history(5, today), Vec::new(), None);
    let dashboard = Dashboard::new(store, quiet());

    let view = dashboard.refresh(&user(), today, now()).await.unwrap();
    assert_eq!(view.streak.current, 5);
    assert_eq!(
        awarded_ids(&view),
        vec![
            AchievementId::CompleteAllTasksToday,
            AchievementId::ThreeDayStreak,
            AchievementId::AllTasksThreeDays,
            AchievementId::FiveDayStreak,
        ]
    );
    assert!(view.faults.is_empty());
}

#[tokio::test]
async fn garden_days_come_from_earned_dates() {
    let mut cells = GardenGrid::initial().into_cells();
    for (i, cell) in cells.iter_mut().take(5).enumerate() {
        *cell = Reward::new(RewardLevel::Sprout, "old", "earlier").earn(day_offset(i as u64));
    }
    let store = seeded_store(Vec::new(), Vec::new(), Some(GardenGrid::from_cells(cells)));
    let dashboard = Dashboard::new(store, quiet());

    let view = dashboard.refresh(&user(), day(20), now()).await.unwrap();
    assert_eq!(awarded_ids(&view), vec![AchievementId::GardenGreenFiveDays]);
    assert_eq!(view.awarded[0].index, 11);
}

#[tokio::test]
async fn earned_cells_survive_later_refreshes() {
    let store = seeded_store(done_tasks(5, day(1)), Vec::new(), None);
    let dashboard = Dashboard::new(Arc::clone(&store), quiet());

    let first = dashboard.refresh(&user(), day(1), now()).await.unwrap();
    assert!(awarded_ids(&first).contains(&AchievementId::FiveTasksInOneDay));

    // Next day: nothing is done, yet the earned cells keep their dates
    let second = dashboard.refresh(&user(), day(2), now()).await.unwrap();
    for (before, after) in first.grid.iter().zip(second.grid.iter()) {
        if before.is_earned() {
            assert_eq!(before, after);
        }
    }
    assert_eq!(store.document(&user()).unwrap().garden_grid, Some(second.grid));
}

#[tokio::test(start_paused = true)]
async fn transient_store_failures_are_retried() {
    let inner = MemoryStore::new();
    inner.insert(
        user(),
        garden_store::UserDocument {
            todos: done_tasks(1, day(1)),
            ..Default::default()
        },
    );
    let store = Arc::new(FlakyStore::new(inner, 2));
    let dashboard = Dashboard::new(Arc::clone(&store), quiet());

    let view = dashboard.refresh(&user(), day(1), now()).await.unwrap();
    assert!(view.persisted);
    assert_eq!(store.count("load_tasks"), 2);
    assert_eq!(store.count("load_routines"), 2);
    assert_eq!(store.count("save_grid"), 2);
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_surface_the_store_error() {
    let store = Arc::new(FlakyStore::new(MemoryStore::new(), u32::MAX));
    let config = quiet().with_retry(RetryPolicy::default().with_max_attempts(2));
    let dashboard = Dashboard::new(Arc::clone(&store), config);

    let err = dashboard.refresh(&user(), day(1), now()).await.unwrap_err();
    assert!(matches!(err, DashboardError::Store(StoreError::Unavailable(_))));
    assert!(err.is_retryable());
    assert_eq!(store.count("load_tasks"), 2);
}

#[tokio::test]
async fn permanent_save_failure_is_not_retried() {
    let mut store = MockStore::new();
    store
        .expect_load_tasks()
        .returning(|_| Ok(done_tasks(1, day(1))));
    store.expect_load_routines().returning(|_| Ok(Vec::new()));
    store
        .expect_load_grid()
        .returning(|_| Ok(Some(GardenGrid::initial())));
    store.expect_save_grid().times(1).returning(|_, _| {
        Err(StoreError::Io(std::io::Error::from(
            std::io::ErrorKind::PermissionDenied,
        )))
    });

    let dashboard = Dashboard::new(Arc::new(store), quiet());
    let err = dashboard.refresh(&user(), day(1), now()).await.unwrap_err();
    assert!(matches!(err, DashboardError::Store(StoreError::Io(_))));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn unchanged_grid_is_not_written() {
    let mut store = MockStore::new();
    store.expect_load_tasks().returning(|_| Ok(Vec::new()));
    store.expect_load_routines().returning(|_| Ok(Vec::new()));
    store
        .expect_load_grid()
        .returning(|_| Ok(Some(GardenGrid::initial())));
    store.expect_save_grid().never();
    store.expect_save_routines().never();
    store.expect_add_task().never();

    let dashboard = Dashboard::new(Arc::new(store), quiet());
    let view = dashboard.refresh(&user(), day(1), now()).await.unwrap();
    assert!(!view.persisted);
    assert_eq!(view.grid, GardenGrid::initial());
}

#[tokio::test]
async fn unrecognized_suggestions_are_left_alone() {
    let grid = GardenGrid::from_cells(vec![
        GardenCell::suggesting("Plant a tree"),
        GardenCell::empty(AchievementId::CompleteAllTasksToday),
    ]);
    let store = seeded_store(done_tasks(1, day(1)), Vec::new(), Some(grid));
    let dashboard = Dashboard::new(store, quiet());

    let view = dashboard.refresh(&user(), day(1), now()).await.unwrap();
    assert_eq!(view.grid.get(0), Some(&GardenCell::suggesting("Plant a tree")));
    assert!(view.grid.get(1).is_some_and(GardenCell::is_earned));
}

#[tokio::test]
async fn file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let config = DashboardConfig::default().with_data_dir(dir.path());
    let dashboard = Dashboard::new(Arc::new(FileStore::new(dir.path())), config.clone());

    let task = dashboard
        .add_task(&user(), Task::new("water plants", day(1)))
        .await
        .unwrap();
    let toggled = dashboard.toggle_task(&user(), &task.id, day(1)).await.unwrap();
    assert!(toggled.completed);

    let refreshed = dashboard.refresh(&user(), day(1), now()).await.unwrap();
    assert!(refreshed.persisted);

    // A fresh store over the same directory sees the same state
    let reopened = Dashboard::new(Arc::new(FileStore::new(dir.path())), config);
    let shown = reopened.show(&user(), day(1)).await.unwrap();
    assert_eq!(shown.grid, refreshed.grid);
    assert_eq!(shown.routines, refreshed.routines);
    assert!(shown
        .today_tasks
        .iter()
        .any(|t| t.task.id == task.id && t.task.completed));
}

#[tokio::test]
async fn routine_completion_persists_and_unlocks() {
    let store = Arc::new(MemoryStore::new());
    let dashboard = Dashboard::new(Arc::clone(&store), DashboardConfig::default());
    dashboard.refresh(&user(), day(1), now()).await.unwrap();

    for d in 1..=3 {
        dashboard
            .complete_routine(&user(), "Drink Water", day(d), now())
            .await
            .unwrap();
    }
    let routines = store.document(&user()).unwrap().routines;
    assert_eq!(routines[0].streak, 3);
    assert!(routines[1].unlocked);

    let view = dashboard.refresh(&user(), day(3), now()).await.unwrap();
    let ids = awarded_ids(&view);
    assert!(ids.contains(&AchievementId::DrinkWaterThreeDays));
    assert!(ids.contains(&AchievementId::UnlockSecondRoutine));
    assert!(ids.contains(&AchievementId::StickToRoutine));

    let locked = dashboard
        .complete_routine(&user(), "Wake Up Early", day(3), now())
        .await
        .unwrap_err();
    assert!(matches!(locked, DashboardError::Activity(_)));
}
