//! Inkwell Backend Library
//!
//! This library provides user registration, login and session-token
//! authentication for a small blog API, together with its storage layer and
//! REST API services.

pub mod api;
pub mod auth;
pub mod core;
pub mod db;

// Re-export commonly used types
pub use api::{ApiServer, AppState};
pub use auth::{AuthService, PasswordHasher, TokenService};
pub use crate::core::{Clock, Config, InkwellError, ManualClock, SystemClock};
pub use db::{BlogStore, DatabaseManager, UserStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
