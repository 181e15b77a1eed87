//! HTTP-level integration tests for the operator action dispatch endpoint.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{action, body_json, get};
use ringside_store::Store;
use serde_json::json;

// ---------------------------------------------------------------------------
// Layout actions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_layout_returns_normalized_entity() {
    let store = Arc::new(Store::new());
    let response = action(
        common::build_test_app(store),
        "create_layout",
        json!({ "name": "Arena wall" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Arena wall");
    assert_eq!(json["data"]["version"], 1);
    assert_eq!(json["data"]["status"], "draft");
    // Normalization synthesizes a default scene for an empty timeline.
    assert_eq!(json["data"]["timeline"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn create_layout_rejects_blank_name() {
    let store = Arc::new(Store::new());
    let response = action(
        common::build_test_app(store),
        "create_layout",
        json!({ "name": "   " }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn update_layout_bumps_version() {
    let store = Arc::new(Store::new());
    let created = body_json(
        action(
            common::build_test_app(store.clone()),
            "create_layout",
            json!({ "name": "Arena wall" }),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].clone();

    let response = action(
        common::build_test_app(store),
        "update_layout",
        json!({ "id": id, "version": 1, "name": "Arena wall v2" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["version"], 2);
    assert_eq!(json["data"]["name"], "Arena wall v2");
}

#[tokio::test]
async fn stale_version_is_a_conflict() {
    let store = Arc::new(Store::new());
    let created = body_json(
        action(
            common::build_test_app(store.clone()),
            "create_layout",
            json!({ "name": "Arena wall" }),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].clone();

    // First writer wins.
    action(
        common::build_test_app(store.clone()),
        "update_layout",
        json!({ "id": id, "version": 1, "name": "First writer" }),
    )
    .await;

    // Second writer still holds version 1.
    let response = action(
        common::build_test_app(store),
        "update_layout",
        json!({ "id": id, "version": 1, "name": "Second writer" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn updates_append_to_revision_history() {
    let store = Arc::new(Store::new());
    let created = body_json(
        action(
            common::build_test_app(store.clone()),
            "create_layout",
            json!({ "name": "Arena wall" }),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    action(
        common::build_test_app(store.clone()),
        "update_layout",
        json!({ "id": id, "version": 1, "name": "Renamed", "comment": "renamed" }),
    )
    .await;

    let response = get(
        common::build_test_app(store),
        &format!("/api/v1/layouts/{id}/revisions"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let revisions = json["data"].as_array().unwrap();
    assert_eq!(revisions.len(), 2);
    // Newest first.
    assert_eq!(revisions[0]["version"], 2);
    assert_eq!(revisions[0]["comment"], "renamed");
    assert_eq!(revisions[1]["version"], 1);
}

#[tokio::test]
async fn publish_layout_changes_status_without_version_bump() {
    let store = Arc::new(Store::new());
    let created = body_json(
        action(
            common::build_test_app(store.clone()),
            "create_layout",
            json!({ "name": "Arena wall" }),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].clone();

    let response = action(
        common::build_test_app(store),
        "publish_layout",
        json!({ "id": id }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "published");
    assert_eq!(json["data"]["version"], 1);
}

#[tokio::test]
async fn duplicate_layout_is_a_fresh_draft_copy() {
    let store = Arc::new(Store::new());
    let created = body_json(
        action(
            common::build_test_app(store.clone()),
            "create_layout",
            json!({ "name": "Arena wall" }),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].clone();

    let response = action(
        common::build_test_app(store),
        "duplicate_layout",
        json!({ "id": id }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Copy of Arena wall");
    assert_eq!(json["data"]["version"], 1);
    assert_eq!(json["data"]["status"], "draft");
    assert_ne!(json["data"]["id"], created["data"]["id"]);
}

#[tokio::test]
async fn delete_layout_scrubs_playlist_items() {
    let store = Arc::new(Store::new());
    let created = body_json(
        action(
            common::build_test_app(store.clone()),
            "create_layout",
            json!({ "name": "Arena wall" }),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].clone();

    action(
        common::build_test_app(store.clone()),
        "save_playlist",
        json!({ "title": "Rotation", "items": [{ "layout_id": id }] }),
    )
    .await;

    let response = action(
        common::build_test_app(store.clone()),
        "delete_layout",
        json!({ "id": id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let playlists = body_json(get(common::build_test_app(store), "/api/v1/playlists").await).await;
    let items = playlists["data"][0]["items"].as_array().unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn deleting_a_missing_layout_is_not_found() {
    let store = Arc::new(Store::new());
    let response = action(
        common::build_test_app(store),
        "delete_layout",
        json!({ "id": "5f0c9a60-0000-4000-8000-000000000000" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Display actions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_display_returns_the_token_exactly_once() {
    let store = Arc::new(Store::new());
    let response = action(
        common::build_test_app(store.clone()),
        "register_display",
        json!({ "name": "Foyer screen" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let token = json["data"]["access_token"].as_str().unwrap();
    assert_eq!(token.len(), 32);
    assert_eq!(json["data"]["group"], "main");

    // Listing reads never expose the token again.
    let listed = body_json(get(common::build_test_app(store), "/api/v1/displays").await).await;
    assert!(listed["data"][0].get("access_token").is_none());
}

#[tokio::test]
async fn update_display_detaches_assignment_with_explicit_null() {
    let store = Arc::new(Store::new());
    let layout = body_json(
        action(
            common::build_test_app(store.clone()),
            "create_layout",
            json!({ "name": "Arena wall" }),
        )
        .await,
    )
    .await;
    let registered = body_json(
        action(
            common::build_test_app(store.clone()),
            "register_display",
            json!({ "name": "Foyer screen", "assigned_layout_id": layout["data"]["id"] }),
        )
        .await,
    )
    .await;
    let display_id = registered["data"]["id"].clone();

    let response = action(
        common::build_test_app(store),
        "update_display",
        json!({ "id": display_id, "assigned_layout_id": null }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["assigned_layout_id"].is_null());
}

#[tokio::test]
async fn register_display_rejects_dangling_assignment() {
    let store = Arc::new(Store::new());
    let response = action(
        common::build_test_app(store),
        "register_display",
        json!({
            "name": "Foyer screen",
            "assigned_layout_id": "5f0c9a60-0000-4000-8000-000000000000"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Playlist actions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn save_playlist_rejects_items_referencing_missing_layouts() {
    let store = Arc::new(Store::new());
    let response = action(
        common::build_test_app(store.clone()),
        "save_playlist",
        json!({
            "title": "Rotation",
            "items": [{ "layout_id": "5f0c9a60-0000-4000-8000-000000000000" }]
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    // Rejected before any write: nothing was stored.
    let listed = body_json(get(common::build_test_app(store), "/api/v1/playlists").await).await;
    assert!(listed["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn save_playlist_expands_the_legacy_layout_shortcut() {
    let store = Arc::new(Store::new());
    let layout = body_json(
        action(
            common::build_test_app(store.clone()),
            "create_layout",
            json!({ "name": "Arena wall" }),
        )
        .await,
    )
    .await;

    let response = action(
        common::build_test_app(store),
        "save_playlist",
        json!({ "title": "Single", "layout_id": layout["data"]["id"] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let items = json["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["layout_id"], layout["data"]["id"]);
}

#[tokio::test]
async fn delete_playlist_returns_the_removed_entity() {
    let store = Arc::new(Store::new());
    let layout = body_json(
        action(
            common::build_test_app(store.clone()),
            "create_layout",
            json!({ "name": "Arena wall" }),
        )
        .await,
    )
    .await;
    let playlist = body_json(
        action(
            common::build_test_app(store.clone()),
            "save_playlist",
            json!({ "title": "Rotation", "layout_id": layout["data"]["id"] }),
        )
        .await,
    )
    .await;

    let response = action(
        common::build_test_app(store.clone()),
        "delete_playlist",
        json!({ "id": playlist["data"]["id"] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Rotation");

    let listed = body_json(get(common::build_test_app(store), "/api/v1/playlists").await).await;
    assert!(listed["data"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Dispatch plumbing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_actions_are_rejected() {
    let store = Arc::new(Store::new());
    let response = action(common::build_test_app(store), "torch_the_ring", json!({})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("Unknown action: torch_the_ring"));
}

#[tokio::test]
async fn malformed_payload_is_a_bad_request() {
    let store = Arc::new(Store::new());
    // create_layout requires a name.
    let response = action(common::build_test_app(store), "create_layout", json!({})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}
