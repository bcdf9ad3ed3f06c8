//! HTTP API route definitions

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, AppState};

/// Create the API router with all routes
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/api/quote", post(handlers::quote))
        .with_state(app_state)
}
