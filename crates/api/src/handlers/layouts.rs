//! Read-only layout endpoints: listing, detail, and revision history.
//!
//! All layout mutations go through the action dispatch endpoint.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use ringside_core::types::Id;
use ringside_store::repositories::LayoutRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListLayoutsQuery {
    /// Restrict the listing to layouts scoped to this event.
    pub event_id: Option<Id>,
}

/// GET /api/v1/layouts?event_id=...
///
/// List layouts, most recently updated first.
pub async fn list_layouts(
    State(state): State<AppState>,
    Query(query): Query<ListLayoutsQuery>,
) -> AppResult<impl IntoResponse> {
    let layouts = LayoutRepo::list(&state.store, query.event_id).await;

    Ok(Json(DataResponse { data: layouts }))
}

/// GET /api/v1/layouts/{id}
///
/// Retrieve a single layout by ID.
pub async fn get_layout(
    State(state): State<AppState>,
    Path(layout_id): Path<Id>,
) -> AppResult<impl IntoResponse> {
    let layout = LayoutRepo::find_by_id(&state.store, layout_id).await?;

    Ok(Json(DataResponse { data: layout }))
}

/// GET /api/v1/layouts/{id}/revisions
///
/// Retrieve a layout's saved revisions, newest first.
pub async fn layout_revisions(
    State(state): State<AppState>,
    Path(layout_id): Path<Id>,
) -> AppResult<impl IntoResponse> {
    let revisions = LayoutRepo::revisions(&state.store, layout_id).await?;

    Ok(Json(DataResponse { data: revisions }))
}
