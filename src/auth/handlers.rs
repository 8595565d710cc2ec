//! Authentication API handlers

use crate::api::handlers::{parse_json, AppState};
use crate::auth::models::{AuthenticatedIdentity, LoginRequest, LoginResponse, RegistrationRequest};
use crate::core::error::Result;
use axum::{body::Bytes, extract::State, response::IntoResponse, Json};

/// Handler for POST /register - User registration
pub async fn register(State(state): State<AppState>, body: Bytes) -> Result<impl IntoResponse> {
    let request: RegistrationRequest = parse_json(&body)?;
    tracing::info!(username = %request.username, "User registration attempt");

    state.auth.register(request).await?;

    Ok("Successfully Registered")
}

/// Handler for POST /login - User login
pub async fn login(State(state): State<AppState>, body: Bytes) -> Result<Json<LoginResponse>> {
    let request: LoginRequest = parse_json(&body)?;
    tracing::info!(username = %request.username, "Login attempt");

    let access_token = state.auth.login(&request.username, &request.password).await?;

    Ok(Json(LoginResponse { access_token }))
}

/// Handler for GET /protected - Authenticated probe
pub async fn protected(identity: AuthenticatedIdentity) -> &'static str {
    tracing::debug!(username = %identity.username, "Protected path accessed");
    "This is a protected path"
}
