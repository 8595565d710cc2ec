pub mod blogs;
pub mod system;

pub use blogs::*;
pub use system::*;

use crate::auth::jwt::TokenService;
use crate::auth::password::PasswordHasher;
use crate::auth::service::AuthService;
use crate::core::clock::Clock;
use crate::core::config::{Config, StoreBackend};
use crate::core::error::{InkwellError, Result};
use crate::db::manager::DatabaseManager;
use crate::db::memory::{MemoryBlogStore, MemoryUserStore};
use crate::db::repository::{BlogStore, SqliteBlogStore, SqliteUserStore, UserStore};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state for handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub tokens: Arc<TokenService>,
    pub users: Arc<dyn UserStore>,
    pub blogs: Arc<dyn BlogStore>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Wire services and stores for the configured backend
    pub fn from_config(config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let stores: (Arc<dyn UserStore>, Arc<dyn BlogStore>) = match config.store.backend {
            StoreBackend::Sqlite => {
                let db = Arc::new(DatabaseManager::new(
                    &config.store.path,
                    config.store.connection_pool_size,
                    Duration::from_millis(config.store.busy_timeout),
                )?);
                tracing::info!(
                    path = ?db.db_path(),
                    pool_size = db.pool_size(),
                    "Using SQLite store"
                );
                (
                    Arc::new(SqliteUserStore::new(db.clone())),
                    Arc::new(SqliteBlogStore::new(db)),
                )
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store; data is lost on shutdown");
                (
                    Arc::new(MemoryUserStore::new()),
                    Arc::new(MemoryBlogStore::new()),
                )
            }
        };
        let (users, blogs) = stores;

        let tokens = Arc::new(TokenService::new(&config.auth.jwt_secret, clock.clone()));
        let auth = AuthService::new(
            users.clone(),
            PasswordHasher::new(config.auth.bcrypt_cost),
            tokens.clone(),
            config.auth.token_ttl(),
        )?;

        Ok(Self {
            auth: Arc::new(auth),
            tokens,
            users,
            blogs,
            clock,
        })
    }
}

/// Decode a JSON request body regardless of its declared content type
pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "Request body is not valid JSON");
        InkwellError::InvalidRequest("Invalid Request".to_string())
    })
}
