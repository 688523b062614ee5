//! File-backed store
//!
//! Layout: `<root>/users/<user-id>.json`, one [`UserDocument`] per file.
//! Writes go to a sibling temp file which is then renamed over the document,
//! so a reader never observes a half-written grid.

use crate::error::StoreError;
use crate::store::{replace_task, ActivityStore, GridStore, UserDocument};
use async_trait::async_trait;
use garden_core::{GardenGrid, Routine, Task, UserId};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Store writing one JSON document per user
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Create a store rooted at `root`
    ///
    /// The directory is created lazily on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a user's document
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidUser`] for ids that are not plain file names
    pub fn document_path(&self, user: &UserId) -> Result<PathBuf, StoreError> {
        let id = user.as_str();
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !id.starts_with('.');
        if !valid {
            return Err(StoreError::InvalidUser(id.to_string()));
        }
        Ok(self.root.join("users").join(format!("{id}.json")))
    }

    /// Read a user's document, empty if none exists
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or decoded
    pub async fn read_document(&self, user: &UserId) -> Result<UserDocument, StoreError> {
        let path = self.document_path(user)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(UserDocument::default()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            user: user.clone(),
            source,
        })
    }

    async fn write_document(&self, user: &UserId, document: &UserDocument) -> Result<(), StoreError> {
        let path = self.document_path(user)?;
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let bytes = serde_json::to_vec_pretty(document)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        tracing::debug!(user = %user, path = %path.display(), "document written");
        Ok(())
    }

    async fn modify<F>(&self, user: &UserId, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut UserDocument) -> Result<(), StoreError> + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document(user).await?;
        f(&mut document)?;
        self.write_document(user, &document).await
    }
}

#[async_trait]
impl GridStore for FileStore {
    async fn load_grid(&self, user: &UserId) -> Result<Option<GardenGrid>, StoreError> {
        Ok(self.read_document(user).await?.garden_grid)
    }

    async fn save_grid(&self, user: &UserId, grid: &GardenGrid) -> Result<(), StoreError> {
        let grid = grid.clone();
        self.modify(user, move |doc| {
            doc.garden_grid = Some(grid);
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl ActivityStore for FileStore {
    async fn load_tasks(&self, user: &UserId) -> Result<Vec<Task>, StoreError> {
        Ok(self.read_document(user).await?.todos)
    }

    async fn load_routines(&self, user: &UserId) -> Result<Vec<Routine>, StoreError> {
        Ok(self.read_document(user).await?.routines)
    }

    async fn save_routines(&self, user: &UserId, routines: &[Routine]) -> Result<(), StoreError> {
        let routines = routines.to_vec();
        self.modify(user, move |doc| {
            doc.routines = routines;
            Ok(())
        })
        .await
    }

    async fn add_task(&self, user: &UserId, task: Task) -> Result<(), StoreError> {
        self.modify(user, move |doc| {
            doc.todos.push(task);
            Ok(())
        })
        .await
    }

    async fn update_task(&self, user: &UserId, task: Task) -> Result<(), StoreError> {
        self.modify(user, move |doc| replace_task(&mut doc.todos, task))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_path_like_user_ids() {
        let store = FileStore::new("/tmp/garden");
        for bad in ["", "../etc", "a/b", ".hidden", "a b"] {
            assert!(
                matches!(store.document_path(&UserId::new(bad)), Err(StoreError::InvalidUser(_))),
                "{bad:?} should be rejected"
            );
        }
        assert!(store.document_path(&UserId::new("user_42-x")).is_ok());
    }
}
