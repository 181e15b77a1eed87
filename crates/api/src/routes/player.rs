//! Route definition for the player delivery endpoint.

use axum::routing::get;
use axum::Router;

use crate::handlers::player;
use crate::state::AppState;

/// Player routes mounted at `/player`.
///
/// ```text
/// GET /state/{token}   -> player_state
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/state/{token}", get(player::player_state))
}
