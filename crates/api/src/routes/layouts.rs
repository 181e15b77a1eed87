//! Route definitions for layout reads.

use axum::routing::get;
use axum::Router;

use crate::handlers::layouts;
use crate::state::AppState;

/// Layout read routes mounted at `/layouts`.
///
/// ```text
/// GET /                 -> list_layouts (?event_id=...)
/// GET /{id}             -> get_layout
/// GET /{id}/revisions   -> layout_revisions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(layouts::list_layouts))
        .route("/{id}", get(layouts::get_layout))
        .route("/{id}/revisions", get(layouts::layout_revisions))
}
