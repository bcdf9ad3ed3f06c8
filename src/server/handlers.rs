//! HTTP API request handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::pipeline::{PickError, QuotePicker};
use crate::store::QuoteStore;

use super::types::{ErrorResponse, QuoteRequest, QuoteResponse};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub picker: Arc<QuotePicker>,
    pub store: Arc<dyn QuoteStore>,
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, concat!(env!("CARGO_PKG_NAME"), " is running"))
}

/// Quote endpoint: run the pipeline, record the interaction, map errors
/// to status codes (400 validation, 500 infrastructure/no-data).
pub async fn quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> impl IntoResponse {
    debug!(mode = %request.mode, "Quote request");

    match state.picker.pick(&request.query, request.mode).await {
        Ok(picked) => {
            // Only corpus rows are logged; fallback quotes carry no id
            if let Some(quote_id) = picked.quote.id {
                if let Err(e) = state
                    .store
                    .log_interaction(&request.query, request.mode, quote_id)
                    .await
                {
                    warn!("Failed to record interaction: {}", e);
                }
            }
            (StatusCode::OK, Json(QuoteResponse::from(&picked.quote))).into_response()
        }
        Err(e) if e.is_validation() => {
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string()))).into_response()
        }
        Err(e @ PickError::NoData) => {
            warn!("Quote request found no data: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
        Err(e) => {
            error!("Quote request failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
    }
}
