//! Read-only display endpoints.
//!
//! Responses use [`DisplayView`], which omits the secret access token; the
//! token is returned exactly once, by the `register_display` action.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use ringside_core::types::Id;
use ringside_store::models::display::DisplayView;
use ringside_store::repositories::DisplayRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/displays
///
/// List registered displays, sorted by name.
pub async fn list_displays(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let displays = DisplayRepo::list(&state.store).await;
    let views: Vec<DisplayView> = displays.iter().map(DisplayView::from).collect();

    Ok(Json(DataResponse { data: views }))
}

/// GET /api/v1/displays/{id}
///
/// Retrieve a single display by ID.
pub async fn get_display(
    State(state): State<AppState>,
    Path(display_id): Path<Id>,
) -> AppResult<impl IntoResponse> {
    let display = DisplayRepo::find_by_id(&state.store, display_id).await?;

    Ok(Json(DataResponse {
        data: DisplayView::from(&display),
    }))
}
