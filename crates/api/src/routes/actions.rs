//! Route definition for the action dispatch endpoint.

use axum::routing::post;
use axum::Router;

use crate::handlers::actions;
use crate::state::AppState;

/// Action dispatch mounted at `/actions`.
///
/// ```text
/// POST /   -> dispatch ({"action": "...", "payload": {...}})
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(actions::dispatch))
}
