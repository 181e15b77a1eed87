//! Route definitions for display reads.

use axum::routing::get;
use axum::Router;

use crate::handlers::displays;
use crate::state::AppState;

/// Display read routes mounted at `/displays`.
///
/// ```text
/// GET /       -> list_displays
/// GET /{id}   -> get_display
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(displays::list_displays))
        .route("/{id}", get(displays::get_display))
}
