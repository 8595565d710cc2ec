use super::AppState;
use crate::api::models::{ComponentHealth, HealthResponse, HealthStatus};
use crate::core::error::InkwellError;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;

/// Handler for GET /health - Liveness plus a store round trip
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let store = check_store_health(&state).await;
    let status = store.status;

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        store,
        timestamp: Utc::now().to_rfc3339(),
    };

    let code = match status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (code, Json(response))
}

async fn check_store_health(state: &AppState) -> ComponentHealth {
    match state.users.exists("").await {
        Ok(_) => ComponentHealth {
            status: HealthStatus::Healthy,
            message: None,
        },
        Err(e) => {
            tracing::error!(error = %e, "Health check: store unavailable");
            ComponentHealth {
                status: HealthStatus::Unhealthy,
                message: Some("Store unavailable".to_string()),
            }
        }
    }
}

/// Fallback for unknown routes
pub async fn not_found() -> InkwellError {
    InkwellError::NotFound("Not Found".to_string())
}
