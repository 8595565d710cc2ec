//! API routes

use crate::api::handlers::{
    create_blog, delete_blog, get_blog, health_check, list_blogs, not_found, update_blog,
    AppState,
};
use crate::auth::handlers::{login, protected, register};
use crate::auth::middleware::authenticate;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

/// Build the API routes
///
/// Protected routes sit behind [`authenticate`] as a route layer, so a request
/// that matches no route reaches the 404 fallback without a token check.
pub fn build_api_routes(state: AppState) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/blog/:slug", get(get_blog))
        .route("/blogs", get(list_blogs))
        .route("/health", get(health_check));

    // Protected routes (authentication required)
    let protected_routes = Router::new()
        .route("/protected", get(protected))
        .route("/blog", post(create_blog))
        .route("/blog/:slug", put(update_blog).delete(delete_blog))
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            authenticate,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(not_found)
        .with_state(state)
}
