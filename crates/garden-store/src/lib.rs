//! Garden Store - persistence boundary
//!
//! - [`GridStore`] / [`ActivityStore`]: async traits over a per-user document
//! - [`MemoryStore`]: in-process backend
//! - [`FileStore`]: one JSON document per user, written atomically
//! - [`GardenService`]: grid initialization and direct awards
//!
//! # Example
//!
//! ```rust,ignore
//! use garden_store::{GardenService, MemoryStore};
//! use garden_core::UserId;
//! use std::sync::Arc;
//!
//! let service = GardenService::new(Arc::new(MemoryStore::new()));
//! let grid = service.ensure_grid(&UserId::new("ana")).await?;
//! assert_eq!(grid.len(), 16);
//! ```

#![warn(unreachable_pub)]

pub mod error;
pub mod file;
pub mod memory;
pub mod service;
pub mod store;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use service::GardenService;
pub use store::{ActivityStore, GridStore, UserDocument};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
