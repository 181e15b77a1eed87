//! The operator action dispatch endpoint.
//!
//! The authoring UI speaks one action-keyed RPC instead of a REST surface:
//! `POST /api/v1/actions` with `{ "action": "...", "payload": { ... } }`.
//! Every action answers with the affected entity in the standard envelope;
//! deletions return the entity as it was just before removal. Unknown
//! action names are rejected up front, before any payload parsing.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use ringside_core::error::CoreError;
use ringside_core::types::Id;
use ringside_store::models::display::{
    DisplayView, RegisterDisplayInput, RegisteredDisplay, UpdateDisplayInput,
};
use ringside_store::models::layout::{CreateLayoutInput, UpdateLayoutInput};
use ringside_store::models::playlist::SavePlaylistInput;
use ringside_store::repositories::{DisplayRepo, LayoutRepo, PlaylistRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Payload for actions addressing one entity by id.
#[derive(Debug, Deserialize)]
struct IdPayload {
    id: Id,
}

/// Payload for `update_layout`: the target id plus the patch itself.
#[derive(Debug, Deserialize)]
struct UpdateLayoutPayload {
    id: Id,
    #[serde(flatten)]
    input: UpdateLayoutInput,
}

/// Payload for `update_display`.
#[derive(Debug, Deserialize)]
struct UpdateDisplayPayload {
    id: Id,
    #[serde(flatten)]
    input: UpdateDisplayInput,
}

/// POST /api/v1/actions
///
/// Dispatch one operator action:
///
/// ```text
/// create_layout     -> Layout           register_display -> RegisteredDisplay
/// update_layout     -> Layout           update_display   -> DisplayView
/// publish_layout    -> Layout           delete_display   -> DisplayView
/// duplicate_layout  -> Layout           save_playlist    -> Playlist
/// delete_layout     -> Layout           delete_playlist  -> Playlist
/// ```
pub async fn dispatch(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<Response> {
    let action = body
        .get("action")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::BadRequest("Missing action field".to_string()))?
        .to_string();

    let payload = body.get("payload").cloned().unwrap_or(Value::Null);

    match action.as_str() {
        "create_layout" => {
            let input: CreateLayoutInput = parse(payload)?;
            let layout = LayoutRepo::create(&state.store, &input).await?;
            Ok(entity(layout))
        }
        "update_layout" => {
            let UpdateLayoutPayload { id, input } = parse(payload)?;
            let layout = LayoutRepo::update(&state.store, id, input).await?;
            Ok(entity(layout))
        }
        "publish_layout" => {
            let IdPayload { id } = parse(payload)?;
            let layout = LayoutRepo::publish(&state.store, id).await?;
            tracing::info!(layout_id = %id, "Layout published");
            Ok(entity(layout))
        }
        "duplicate_layout" => {
            let IdPayload { id } = parse(payload)?;
            let copy = LayoutRepo::duplicate(&state.store, id).await?;
            tracing::info!(layout_id = %id, copy_id = %copy.id, "Layout duplicated");
            Ok(entity(copy))
        }
        "delete_layout" => {
            let IdPayload { id } = parse(payload)?;
            let layout = LayoutRepo::find_by_id(&state.store, id).await?;
            LayoutRepo::delete(&state.store, id).await?;
            Ok(entity(layout))
        }
        "register_display" => {
            let input: RegisterDisplayInput = parse(payload)?;
            let display = DisplayRepo::register(&state.store, &input).await?;
            // The only response that ever carries the access token.
            let registered = RegisteredDisplay {
                display: DisplayView::from(&display),
                access_token: display.access_token.clone(),
            };
            Ok(entity(registered))
        }
        "update_display" => {
            let UpdateDisplayPayload { id, input } = parse(payload)?;
            let display = DisplayRepo::update(&state.store, id, &input).await?;
            Ok(entity(DisplayView::from(&display)))
        }
        "delete_display" => {
            let IdPayload { id } = parse(payload)?;
            let display = DisplayRepo::find_by_id(&state.store, id).await?;
            DisplayRepo::delete(&state.store, id).await?;
            Ok(entity(DisplayView::from(&display)))
        }
        "save_playlist" => {
            let input: SavePlaylistInput = parse(payload)?;
            let playlist = PlaylistRepo::save(&state.store, input).await?;
            Ok(entity(playlist))
        }
        "delete_playlist" => {
            let IdPayload { id } = parse(payload)?;
            let playlist = PlaylistRepo::find_by_id(&state.store, id).await?;
            PlaylistRepo::delete(&state.store, id).await?;
            Ok(entity(playlist))
        }
        other => Err(AppError::Core(CoreError::Validation(format!(
            "Unknown action: {other}"
        )))),
    }
}

/// Deserialize an action payload, mapping malformed input to a 400.
fn parse<T: DeserializeOwned>(payload: Value) -> Result<T, AppError> {
    serde_json::from_value(payload)
        .map_err(|e| AppError::BadRequest(format!("Invalid action payload: {e}")))
}

/// Wrap the affected entity in the standard envelope.
fn entity<T: serde::Serialize>(data: T) -> Response {
    Json(DataResponse { data }).into_response()
}
