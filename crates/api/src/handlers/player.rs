//! The player delivery endpoint: the only interface deployed display
//! hardware calls.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::AppResult;
use crate::resolve::{self, Resolution};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/player/state/{token}
///
/// Resolve the display behind `token` to its render-ready state. An unknown
/// token answers with the distinct `DISPLAY_NOT_REGISTERED` code (rather
/// than a generic not-found) so the hardware can fall back to its setup
/// screen instead of treating the server as broken.
pub async fn player_state(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Response> {
    match resolve::resolve(&state, &token).await {
        Resolution::State(player_state) => {
            Ok(Json(DataResponse { data: *player_state }).into_response())
        }
        Resolution::NotRegistered => {
            tracing::info!("Rejected poll from unregistered display");
            Ok((
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "Display is not registered",
                    "code": "DISPLAY_NOT_REGISTERED",
                })),
            )
                .into_response())
        }
    }
}
