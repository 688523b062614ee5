//! Grid lifecycle operations over a [`GridStore`]
//!
//! - [`GardenService::ensure_grid`]: create the default grid on first use
//! - [`GardenService::add_garden_point`]: drop a reward into the first free slot

use crate::error::StoreError;
use crate::store::GridStore;
use garden_core::{GardenCell, GardenGrid, UserId};
use std::sync::Arc;

/// Grid operations bound to a store
#[derive(Debug)]
pub struct GardenService<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for GardenService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: GridStore + ?Sized> GardenService<S> {
    /// Create a service over `store`
    #[inline]
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Underlying store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Return the user's grid, creating the default one if absent
    ///
    /// A stored but empty grid counts as absent. An existing grid is returned
    /// verbatim, so calling this repeatedly never resets progress.
    ///
    /// # Errors
    /// Propagates store failures
    pub async fn ensure_grid(&self, user: &UserId) -> Result<GardenGrid, StoreError> {
        match self.store.load_grid(user).await? {
            Some(grid) if !grid.is_empty() => Ok(grid),
            _ => {
                let grid = GardenGrid::initial();
                self.store.save_grid(user, &grid).await?;
                tracing::info!(user = %user, cells = grid.len(), "garden initialized");
                Ok(grid)
            }
        }
    }

    /// Put `cell` into the first empty slot, or append it when the grid is full
    ///
    /// The first empty slot usually still carries a suggestion, which is
    /// replaced, so the achievement it pointed at can no longer be earned
    /// there by evaluation.
    ///
    /// # Errors
    /// Propagates store failures
    pub async fn add_garden_point(&self, user: &UserId, cell: GardenCell) -> Result<GardenGrid, StoreError> {
        let mut grid = self.store.load_grid(user).await?.unwrap_or_default();
        let index = grid.place(cell);
        self.store.save_grid(user, &grid).await?;
        tracing::info!(user = %user, index, "garden point added");
        Ok(grid)
    }
}
