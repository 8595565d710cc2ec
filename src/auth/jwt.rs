//! Session token issuance and verification
//!
//! Tokens are HS256 JWTs carrying `{sub, iat, exp}`. Expiry is judged against
//! the injected [`Clock`] rather than the library's wall-clock check.
//!
//! The signature is checked over the raw `header.payload` text before either
//! segment is decoded, so altering any byte of a signed token reports
//! [`AuthError::BadSignature`].

use crate::auth::models::AuthenticatedIdentity;
use crate::core::clock::Clock;
use crate::core::error::{InkwellError, Result};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{
    crypto, decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Default session lifetime
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(3600);

/// JWT Claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username the token was issued to
    pub sub: String,
    /// Issued-at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Why a token was rejected.
///
/// The kinds stay distinct for logging; callers only ever see a 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("malformed token")]
    Malformed,

    #[error("token signature mismatch")]
    BadSignature,

    #[error("token expired")]
    Expired,
}

impl AuthError {
    /// Short label for structured log fields
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::Malformed => "malformed",
            AuthError::BadSignature => "bad_signature",
            AuthError::Expired => "expired",
        }
    }
}

/// Signs and verifies session tokens with the process-wide secret
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(secret: &str, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against `clock` in `verify`
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            clock,
        }
    }

    /// Issue a token for `identity` that expires `ttl` from now
    pub fn issue(&self, identity: &AuthenticatedIdentity, ttl: Duration) -> Result<String> {
        let now = self.clock.now();
        let exp = i64::try_from(ttl.as_secs())
            .ok()
            .and_then(|secs| now.checked_add(secs))
            .ok_or_else(|| {
                InkwellError::SigningError(format!("Token lifetime {:?} is out of range", ttl))
            })?;

        let claims = Claims {
            sub: identity.username.clone(),
            iat: now,
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| InkwellError::SigningError(format!("Failed to generate token: {}", e)))
    }

    /// Verify a token and recover the identity it was issued to
    pub fn verify(&self, token: &str) -> std::result::Result<AuthenticatedIdentity, AuthError> {
        if token.split('.').count() != 3 || token.split('.').any(str::is_empty) {
            return Err(AuthError::Malformed);
        }

        let (message, signature) = token.rsplit_once('.').ok_or(AuthError::Malformed)?;
        let signed_by_us =
            crypto::verify(signature, message.as_bytes(), &self.decoding_key, Algorithm::HS256)
                .unwrap_or(false);
        if !signed_by_us {
            return Err(AuthError::BadSignature);
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::BadSignature,
                _ => AuthError::Malformed,
            })?;

        // Still valid at exactly `exp`
        if self.clock.now() > claims.exp {
            return Err(AuthError::Expired);
        }

        Ok(AuthenticatedIdentity {
            username: claims.sub,
        })
    }
}
