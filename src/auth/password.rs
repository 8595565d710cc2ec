//! Password hashing and verification using bcrypt

use crate::core::error::{InkwellError, Result};

/// Lowest cost bcrypt accepts
pub const MIN_COST: u32 = 4;
/// Highest cost bcrypt accepts
pub const MAX_COST: u32 = 31;
/// Cost used when none is configured
pub const DEFAULT_COST: u32 = 10;
/// bcrypt only reads this many bytes of its input
pub const MAX_PASSWORD_BYTES: usize = 72;

/// bcrypt hasher with a fixed work factor.
///
/// Hashes are self-describing (`$2b$<cost>$<salt><digest>`), so raising the
/// cost later does not invalidate hashes stored under an older cost.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password with a fresh random salt.
    ///
    /// Passwords longer than [`MAX_PASSWORD_BYTES`] are refused rather than
    /// silently truncated.
    pub fn hash(&self, password: &str) -> Result<String> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(InkwellError::ValidationError(format!(
                "password exceeds {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }

        bcrypt::hash(password, self.cost)
            .map_err(|e| InkwellError::HashingError(format!("Failed to hash password: {}", e)))
    }

    /// Verify a password against a stored hash.
    ///
    /// A malformed hash verifies as `false`; a wrong password is never an error.
    /// No stored hash can match a password longer than [`MAX_PASSWORD_BYTES`].
    pub fn verify(&self, password_hash: &str, password: &str) -> bool {
        if password.len() > MAX_PASSWORD_BYTES {
            return false;
        }

        match bcrypt::verify(password, password_hash) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash could not be parsed");
                false
            }
        }
    }
}
