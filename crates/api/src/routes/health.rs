use axum::extract::State;
use axum::{routing::get, Json, Router};
use ringside_store::store::StoreCounts;
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Entity counts in the in-memory store.
    pub store: StoreCounts,
}

/// GET /health -- returns service status, version, and store counts.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = state.store.counts().await;

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        store,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
