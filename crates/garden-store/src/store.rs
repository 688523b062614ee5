//! Store traits and the per-user document
//!
//! Every user owns one [`UserDocument`] holding the garden grid, routines and
//! to-dos. Backends may persist it however they like, but a grid write must
//! replace the whole grid at once.

use crate::error::StoreError;
use async_trait::async_trait;
use garden_core::{GardenGrid, Routine, Task, UserId};
use serde::{Deserialize, Serialize};

/// Per-user document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    /// Garden grid, absent until initialized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub garden_grid: Option<GardenGrid>,
    /// Routines
    #[serde(default)]
    pub routines: Vec<Routine>,
    /// To-dos
    #[serde(default)]
    pub todos: Vec<Task>,
}

/// Grid persistence
#[async_trait]
pub trait GridStore: Send + Sync {
    /// Load the user's grid, `None` when never initialized
    async fn load_grid(&self, user: &UserId) -> Result<Option<GardenGrid>, StoreError>;

    /// Replace the user's grid
    async fn save_grid(&self, user: &UserId, grid: &GardenGrid) -> Result<(), StoreError>;
}

/// Task and routine persistence
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// All of the user's tasks
    async fn load_tasks(&self, user: &UserId) -> Result<Vec<Task>, StoreError>;

    /// All of the user's routines
    async fn load_routines(&self, user: &UserId) -> Result<Vec<Routine>, StoreError>;

    /// Replace the user's routines
    async fn save_routines(&self, user: &UserId, routines: &[Routine]) -> Result<(), StoreError>;

    /// Append a task
    async fn add_task(&self, user: &UserId, task: Task) -> Result<(), StoreError>;

    /// Replace the task with the same id
    async fn update_task(&self, user: &UserId, task: Task) -> Result<(), StoreError>;
}

pub(crate) fn replace_task(todos: &mut [Task], task: Task) -> Result<(), StoreError> {
    let slot = todos
        .iter_mut()
        .find(|t| t.id == task.id)
        .ok_or_else(|| StoreError::TaskNotFound(task.id.clone()))?;
    *slot = task;
    Ok(())
}
