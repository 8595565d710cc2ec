//! Authentication middleware

use crate::auth::jwt::{AuthError, TokenService};
use crate::auth::models::AuthenticatedIdentity;
use crate::core::error::{InkwellError, Result};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

const BEARER_PREFIX: &str = "Bearer ";

/// Pull the bearer token out of the `Authorization` header
fn bearer_token(headers: &HeaderMap) -> std::result::Result<&str, AuthError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)
}

/// Authentication middleware
///
/// Rejects the request with 401 before the inner handler runs unless it
/// carries a valid bearer token. On success the [`AuthenticatedIdentity`]
/// is placed in the request extensions.
pub async fn authenticate(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let verified = bearer_token(request.headers()).and_then(|token| tokens.verify(token));

    let identity = match verified {
        Ok(identity) => identity,
        Err(e) => {
            tracing::info!(
                auth_error = e.kind(),
                path = %request.uri().path(),
                "Request not authenticated"
            );
            return InkwellError::Unauthorized(e).into_response();
        }
    };

    tracing::debug!(username = %identity.username, "Request authenticated");
    request.extensions_mut().insert(identity);

    next.run(request).await
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedIdentity
where
    S: Send + Sync,
{
    type Rejection = InkwellError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<AuthenticatedIdentity>()
            .cloned()
            .ok_or(InkwellError::Unauthorized(AuthError::MissingToken))
    }
}
