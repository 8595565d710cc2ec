//! Database module
//!
//! This module provides persistence for credentials and blogs:
//! - Store traits that the services depend on
//! - SQLite implementations over an r2d2 connection pool
//! - In-memory implementations
//! - Database migrations

pub mod error;
pub mod manager;
pub mod memory;
pub mod migrations;
pub mod models;
pub mod repository;

pub use error::{StoreError, StoreResult};
pub use manager::DatabaseManager;
pub use memory::{MemoryBlogStore, MemoryUserStore};
pub use models::{Blog, Credential};
pub use repository::{BlogStore, SqliteBlogStore, SqliteUserStore, UserStore};
