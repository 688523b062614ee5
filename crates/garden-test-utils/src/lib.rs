//! Testing utilities for the garden workspace
//!
//! Shared fixtures and fault-injecting stores.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, Utc};
use garden_core::{GardenGrid, Routine, Task, UserId};
use garden_store::{ActivityStore, GridStore, MemoryStore, StoreError, UserDocument};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// 2024-05-`d`
pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

/// `n` days after [`day`]`(1)`
pub fn day_offset(n: u64) -> NaiveDate {
    day(1) + Days::new(n)
}

/// Fixed instant on 2024-05-01
pub fn now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_714_550_400, 0).unwrap()
}

pub fn user() -> UserId {
    UserId::new("ana")
}

/// `count` completed tasks dated `date`
pub fn done_tasks(count: usize, date: NaiveDate) -> Vec<Task> {
    (0..count)
        .map(|i| Task::new(format!("task {i}"), date).completed())
        .collect()
}

/// One completed task on each of `days` consecutive days ending `today`
pub fn streak_history(days: u64, today: NaiveDate) -> Vec<Task> {
    (0..days)
        .map(|back| Task::new("daily", today - Days::new(back)).completed())
        .collect()
}

/// Unlocked routine with a streak, last completed on `last`
pub fn active_routine(name: &str, level: u8, streak: u32, last: NaiveDate) -> Routine {
    let mut routine = Routine::new(name, level).unlocked().with_streak(streak);
    routine.last_completed_date = Some(last);
    routine.done_today = true;
    routine
}

/// Memory store holding one document for [`user`]
pub fn seeded_store(tasks: Vec<Task>, routines: Vec<Routine>, grid: Option<GardenGrid>) -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    store.insert(
        user(),
        UserDocument {
            garden_grid: grid,
            routines,
            todos: tasks,
        },
    );
    Arc::new(store)
}

/// Memory store that fails its first calls with [`StoreError::Unavailable`]
///
/// Every call is recorded by name, failed or not.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    failures_left: AtomicU32,
    calls: Mutex<Vec<&'static str>>,
}

impl FlakyStore {
    /// Fail the next `failures` calls, then delegate to `inner`
    pub fn new(inner: MemoryStore, failures: u32) -> Self {
        Self {
            inner,
            failures_left: AtomicU32::new(failures),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    /// Names of every call made so far
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().iter().filter(|c| **c == call).count()
    }

    fn enter(&self, call: &'static str) -> Result<(), StoreError> {
        self.calls.lock().push(call);
        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            Err(StoreError::Unavailable(format!("{call}: injected failure")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl GridStore for FlakyStore {
    async fn load_grid(&self, user: &UserId) -> Result<Option<GardenGrid>, StoreError> {
        self.enter("load_grid")?;
        self.inner.load_grid(user).await
    }

    async fn save_grid(&self, user: &UserId, grid: &GardenGrid) -> Result<(), StoreError> {
        self.enter("save_grid")?;
        self.inner.save_grid(user, grid).await
    }
}

#[async_trait]
impl ActivityStore for FlakyStore {
    async fn load_tasks(&self, user: &UserId) -> Result<Vec<Task>, StoreError> {
        self.enter("load_tasks")?;
        self.inner.load_tasks(user).await
    }

    async fn load_routines(&self, user: &UserId) -> Result<Vec<Routine>, StoreError> {
        self.enter("load_routines")?;
        self.inner.load_routines(user).await
    }

    async fn save_routines(&self, user: &UserId, routines: &[Routine]) -> Result<(), StoreError> {
        self.enter("save_routines")?;
        self.inner.save_routines(user, routines).await
    }

    async fn add_task(&self, user: &UserId, task: Task) -> Result<(), StoreError> {
        self.enter("add_task")?;
        self.inner.add_task(user, task).await
    }

    async fn update_task(&self, user: &UserId, task: Task) -> Result<(), StoreError> {
        self.enter("update_task")?;
        self.inner.update_task(user, task).await
    }
}
