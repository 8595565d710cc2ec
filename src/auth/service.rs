//! Registration and login orchestration

use crate::auth::jwt::TokenService;
use crate::auth::models::{AuthenticatedIdentity, RegistrationRequest};
use crate::auth::password::{PasswordHasher, MAX_PASSWORD_BYTES};
use crate::core::error::{InkwellError, Result};
use crate::db::error::StoreError;
use crate::db::models::Credential;
use crate::db::repository::UserStore;
use std::sync::Arc;
use std::time::Duration;

pub const FIELDS_EMPTY_MESSAGE: &str = "Invalid Request - fields empty";
pub const USER_EXISTS_MESSAGE: &str = "User already exists";
pub const PASSWORD_TOO_LONG_MESSAGE: &str = "Invalid Request - password too long";

/// Plaintext behind the hash verified for unknown usernames
const DUMMY_PASSWORD: &str = "inkwell-timing-equalizer";

/// Registers users and exchanges credentials for session tokens
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: Arc<TokenService>,
    token_ttl: Duration,
    dummy_hash: String,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: PasswordHasher,
        tokens: Arc<TokenService>,
        token_ttl: Duration,
    ) -> Result<Self> {
        let dummy_hash = hasher.hash(DUMMY_PASSWORD)?;

        Ok(Self {
            users,
            hasher,
            tokens,
            token_ttl,
            dummy_hash,
        })
    }

    /// Create a credential for a new username
    pub async fn register(&self, request: RegistrationRequest) -> Result<()> {
        if request.has_empty_fields() {
            return Err(InkwellError::ValidationError(FIELDS_EMPTY_MESSAGE.to_string()));
        }

        if request.password.len() > MAX_PASSWORD_BYTES {
            return Err(InkwellError::ValidationError(PASSWORD_TOO_LONG_MESSAGE.to_string()));
        }

        let RegistrationRequest { username, password } = request;

        if self.users.exists(&username).await? {
            tracing::info!(username = %username, "Registration rejected: username taken");
            return Err(InkwellError::Conflict(USER_EXISTS_MESSAGE.to_string()));
        }

        let hasher = self.hasher;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| InkwellError::HashingError(format!("Hashing task failed: {}", e)))??;

        let credential = Credential {
            username,
            password_hash,
        };

        match self.users.insert(&credential).await {
            Ok(()) => {
                tracing::info!(username = %credential.username, "User registered");
                Ok(())
            }
            // Lost a race with a concurrent registration
            Err(StoreError::DuplicateKey(_)) => {
                tracing::info!(
                    username = %credential.username,
                    "Registration rejected: username claimed concurrently"
                );
                Err(InkwellError::Conflict(USER_EXISTS_MESSAGE.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Verify credentials and issue a session token.
    ///
    /// Unknown usernames and wrong passwords fail identically.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let stored_hash = match self.users.fetch(username).await {
            Ok(credential) => Some(credential.password_hash),
            Err(StoreError::NotFound(_)) => None,
            Err(e) => return Err(e.into()),
        };

        let known_user = stored_hash.is_some();
        let hash = stored_hash.unwrap_or_else(|| self.dummy_hash.clone());
        let hasher = self.hasher;
        let password = password.to_string();

        let matches = tokio::task::spawn_blocking(move || hasher.verify(&hash, &password))
            .await
            .map_err(|e| InkwellError::HashingError(format!("Verification task failed: {}", e)))?;

        if !(known_user && matches) {
            tracing::info!(username = %username, "Login rejected");
            return Err(InkwellError::InvalidCredentials);
        }

        let identity = AuthenticatedIdentity {
            username: username.to_string(),
        };
        let token = self.tokens.issue(&identity, self.token_ttl)?;

        tracing::info!(username = %username, "Login successful");
        Ok(token)
    }
}
