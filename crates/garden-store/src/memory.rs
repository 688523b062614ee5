//! In-process store backed by a concurrent map

use crate::error::StoreError;
use crate::store::{replace_task, ActivityStore, GridStore, UserDocument};
use async_trait::async_trait;
use dashmap::DashMap;
use garden_core::{GardenGrid, Routine, Task, UserId};

/// Store keeping every user document in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: DashMap<UserId, UserDocument>,
}

impl MemoryStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user document
    pub fn insert(&self, user: UserId, document: UserDocument) {
        self.documents.insert(user, document);
    }

    /// Copy of a user document
    #[must_use]
    pub fn document(&self, user: &UserId) -> Option<UserDocument> {
        self.documents.get(user).map(|d| d.clone())
    }

    /// Number of stored users
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if no user is stored
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl GridStore for MemoryStore {
    async fn load_grid(&self, user: &UserId) -> Result<Option<GardenGrid>, StoreError> {
        Ok(self
            .documents
            .get(user)
            .and_then(|d| d.garden_grid.clone()))
    }

    async fn save_grid(&self, user: &UserId, grid: &GardenGrid) -> Result<(), StoreError> {
        self.documents.entry(user.clone()).or_default().garden_grid = Some(grid.clone());
        Ok(())
    }
}

#[async_trait]
impl ActivityStore for MemoryStore {
    async fn load_tasks(&self, user: &UserId) -> Result<Vec<Task>, StoreError> {
        Ok(self
            .documents
            .get(user)
            .map(|d| d.todos.clone())
            .unwrap_or_default())
    }

    async fn load_routines(&self, user: &UserId) -> Result<Vec<Routine>, StoreError> {
        Ok(self
            .documents
            .get(user)
            .map(|d| d.routines.clone())
            .unwrap_or_default())
    }

    async fn save_routines(&self, user: &UserId, routines: &[Routine]) -> Result<(), StoreError> {
        self.documents.entry(user.clone()).or_default().routines = routines.to_vec();
        Ok(())
    }

    async fn add_task(&self, user: &UserId, task: Task) -> Result<(), StoreError> {
        self.documents.entry(user.clone()).or_default().todos.push(task);
        Ok(())
    }

    async fn update_task(&self, user: &UserId, task: Task) -> Result<(), StoreError> {
        let Some(mut document) = self.documents.get_mut(user) else {
            return Err(StoreError::TaskNotFound(task.id));
        };
        replace_task(&mut document.todos, task)
    }
}
