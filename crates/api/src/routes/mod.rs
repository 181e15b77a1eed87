pub mod actions;
pub mod displays;
pub mod health;
pub mod layouts;
pub mod player;
pub mod playlists;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /actions                     operator action RPC (POST)
///
/// /layouts                     list layouts (?event_id=...)
/// /layouts/{id}                layout detail
/// /layouts/{id}/revisions      revision history, newest first
///
/// /displays                    list displays (token-free views)
/// /displays/{id}               display detail
///
/// /playlists                   list playlists
/// /playlists/{id}              playlist detail
///
/// /player/state/{token}        resolved player state (display hardware)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Operator action dispatch (all mutations).
        .nest("/actions", actions::router())
        // Layout reads and revision history.
        .nest("/layouts", layouts::router())
        // Display reads.
        .nest("/displays", displays::router())
        // Playlist reads.
        .nest("/playlists", playlists::router())
        // The delivery endpoint display hardware polls.
        .nest("/player", player::router())
}
