//! Read-only playlist endpoints.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use ringside_core::types::Id;
use ringside_store::repositories::PlaylistRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/playlists
///
/// List playlists, sorted by title.
pub async fn list_playlists(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let playlists = PlaylistRepo::list(&state.store).await;

    Ok(Json(DataResponse { data: playlists }))
}

/// GET /api/v1/playlists/{id}
///
/// Retrieve a single playlist by ID.
pub async fn get_playlist(
    State(state): State<AppState>,
    Path(playlist_id): Path<Id>,
) -> AppResult<impl IntoResponse> {
    let playlist = PlaylistRepo::find_by_id(&state.store, playlist_id).await?;

    Ok(Json(DataResponse { data: playlist }))
}
