//! Core application layer
//!
//! This module provides:
//! - Configuration management
//! - Structured logging system
//! - Error handling and type system
//! - Injectable time source
//! - Slug derivation for blog keys

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod slug;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{ErrorResponse, InkwellError, Result};
pub use logging::Logger;
pub use slug::slugify;
