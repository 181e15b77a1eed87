//! Route definitions for playlist reads.

use axum::routing::get;
use axum::Router;

use crate::handlers::playlists;
use crate::state::AppState;

/// Playlist read routes mounted at `/playlists`.
///
/// ```text
/// GET /       -> list_playlists
/// GET /{id}   -> get_playlist
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(playlists::list_playlists))
        .route("/{id}", get(playlists::get_playlist))
}
