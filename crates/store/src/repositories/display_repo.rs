//! Repository for registered displays.

use chrono::Utc;
use rand::Rng;

use ringside_core::display::{Display, DEFAULT_HEARTBEAT_SECS};
use ringside_core::error::CoreError;
use ringside_core::types::{Id, Timestamp};

use crate::models::display::{RegisterDisplayInput, UpdateDisplayInput, DEFAULT_GROUP};
use crate::store::Store;

/// Provides data access for displays.
pub struct DisplayRepo;

impl DisplayRepo {
    /// Register a new display and mint its access token. The token is a
    /// 32-hex-character random string, generated once and never rotated.
    pub async fn register(store: &Store, input: &RegisterDisplayInput) -> Result<Display, CoreError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation(
                "Display name must not be empty".to_string(),
            ));
        }
        Self::check_assignments(store, input.assigned_layout_id, input.assigned_playlist_id).await?;

        let mut displays = store.displays.write().await;
        let access_token = loop {
            let token = generate_access_token();
            if !displays.values().any(|d| d.access_token == token) {
                break token;
            }
        };

        let now = Utc::now();
        // Named `registered` rather than `display`: a local called `display`
        // collides with the `use tracing::field::display` inside tracing's
        // value-set macro expansion and fails to compile.
        let registered = Display {
            id: Id::new_v4(),
            name: name.to_string(),
            group: input
                .group
                .as_deref()
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .unwrap_or(DEFAULT_GROUP)
                .to_string(),
            access_token,
            assigned_layout_id: input.assigned_layout_id,
            assigned_playlist_id: input.assigned_playlist_id,
            heartbeat_interval_secs: input
                .heartbeat_interval_secs
                .unwrap_or(DEFAULT_HEARTBEAT_SECS),
            last_seen_at: None,
            created_at: now,
            updated_at: now,
        };
        displays.insert(registered.id, registered.clone());
        drop(displays);

        tracing::info!(display_id = %registered.id, name = %registered.name, group = %registered.group, "Registered display");
        Ok(registered)
    }

    /// List all displays sorted by name.
    pub async fn list(store: &Store) -> Vec<Display> {
        let displays = store.displays.read().await;
        let mut rows: Vec<Display> = displays.values().cloned().collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        rows
    }

    /// Find a single display by its ID.
    pub async fn find_by_id(store: &Store, id: Id) -> Result<Display, CoreError> {
        store
            .displays
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(CoreError::not_found("display", id))
    }

    /// Find a display by its access token. `None` means the token is not
    /// registered; the delivery endpoint turns that into its explicit
    /// not-registered state rather than a plain 404.
    pub async fn find_by_token(store: &Store, token: &str) -> Option<Display> {
        store
            .displays
            .read()
            .await
            .values()
            .find(|d| d.access_token == token)
            .cloned()
    }

    /// Partially update a display.
    pub async fn update(store: &Store, id: Id, input: &UpdateDisplayInput) -> Result<Display, CoreError> {
        if let Some(name) = &input.name {
            if name.trim().is_empty() {
                return Err(CoreError::Validation(
                    "Display name must not be empty".to_string(),
                ));
            }
        }
        Self::check_assignments(
            store,
            input.assigned_layout_id.flatten(),
            input.assigned_playlist_id.flatten(),
        )
        .await?;

        let mut displays = store.displays.write().await;
        let display = displays.get_mut(&id).ok_or(CoreError::not_found("display", id))?;

        if let Some(name) = &input.name {
            display.name = name.trim().to_string();
        }
        if let Some(group) = &input.group {
            display.group = group.trim().to_string();
        }
        if let Some(heartbeat) = input.heartbeat_interval_secs {
            display.heartbeat_interval_secs = heartbeat;
        }
        if let Some(assignment) = input.assigned_layout_id {
            display.assigned_layout_id = assignment;
        }
        if let Some(assignment) = input.assigned_playlist_id {
            display.assigned_playlist_id = assignment;
        }
        display.updated_at = Utc::now();

        tracing::info!(display_id = %id, "Updated display");
        Ok(display.clone())
    }

    /// Record that the display phoned home. Touches `last_seen_at` only;
    /// `updated_at` stays put so routine polling never moves the sync
    /// fingerprint. A display deleted underneath a poll is ignored.
    pub async fn touch(store: &Store, id: Id, now: Timestamp) {
        if let Some(display) = store.displays.write().await.get_mut(&id) {
            display.last_seen_at = Some(now);
        }
    }

    /// Delete a display.
    pub async fn delete(store: &Store, id: Id) -> Result<(), CoreError> {
        if store.displays.write().await.remove(&id).is_none() {
            return Err(CoreError::not_found("display", id));
        }
        tracing::info!(display_id = %id, "Deleted display");
        Ok(())
    }

    /// Reject assignments pointing at records that do not exist.
    async fn check_assignments(
        store: &Store,
        layout_id: Option<Id>,
        playlist_id: Option<Id>,
    ) -> Result<(), CoreError> {
        if let Some(id) = layout_id {
            if !store.layouts.read().await.contains_key(&id) {
                return Err(CoreError::Validation(format!(
                    "Assigned layout {id} does not exist"
                )));
            }
        }
        if let Some(id) = playlist_id {
            if !store.playlists.read().await.contains_key(&id) {
                return Err(CoreError::Validation(format!(
                    "Assigned playlist {id} does not exist"
                )));
            }
        }
        Ok(())
    }
}

/// 16 random bytes rendered as 32 lowercase hex characters.
fn generate_access_token() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn input(name: &str) -> RegisterDisplayInput {
        RegisterDisplayInput {
            name: name.to_string(),
            group: None,
            heartbeat_interval_secs: None,
            assigned_layout_id: None,
            assigned_playlist_id: None,
        }
    }

    // -- register ------------------------------------------------------------

    #[tokio::test]
    async fn register_fills_defaults_and_mints_token() {
        let store = Store::new();
        let display = DisplayRepo::register(&store, &input("Foyer screen"))
            .await
            .unwrap();

        assert_eq!(display.group, DEFAULT_GROUP);
        assert_eq!(display.heartbeat_interval_secs, DEFAULT_HEARTBEAT_SECS);
        assert_eq!(display.access_token.len(), 32);
        assert!(display
            .access_token
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert!(display.last_seen_at.is_none());
    }

    #[tokio::test]
    async fn register_rejects_dangling_assignment() {
        let store = Store::new();
        let mut bad = input("Foyer screen");
        bad.assigned_layout_id = Some(Id::new_v4());
        let err = DisplayRepo::register(&store, &bad).await.unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
        assert!(DisplayRepo::list(&store).await.is_empty());
    }

    #[tokio::test]
    async fn tokens_are_unique_per_display() {
        let store = Store::new();
        let a = DisplayRepo::register(&store, &input("A")).await.unwrap();
        let b = DisplayRepo::register(&store, &input("B")).await.unwrap();
        assert_ne!(a.access_token, b.access_token);
    }

    // -- lookup --------------------------------------------------------------

    #[tokio::test]
    async fn find_by_token_matches_exactly() {
        let store = Store::new();
        let display = DisplayRepo::register(&store, &input("Foyer"))
            .await
            .unwrap();

        let found = DisplayRepo::find_by_token(&store, &display.access_token).await;
        assert_eq!(found.unwrap().id, display.id);
        assert!(DisplayRepo::find_by_token(&store, "0000").await.is_none());
    }

    // -- touch ---------------------------------------------------------------

    #[tokio::test]
    async fn touch_updates_last_seen_but_not_updated_at() {
        let store = Store::new();
        let display = DisplayRepo::register(&store, &input("Foyer"))
            .await
            .unwrap();

        let now = Utc::now();
        DisplayRepo::touch(&store, display.id, now).await;

        let refreshed = DisplayRepo::find_by_id(&store, display.id).await.unwrap();
        assert_eq!(refreshed.last_seen_at, Some(now));
        assert_eq!(refreshed.updated_at, display.updated_at);
    }

    // -- update --------------------------------------------------------------

    #[tokio::test]
    async fn update_detaches_assignment_with_inner_none() {
        let store = Store::new();
        let layout = crate::repositories::LayoutRepo::create(
            &store,
            &crate::models::layout::CreateLayoutInput {
                name: "Ring 1".to_string(),
                event_id: None,
                canvas: None,
                theme: None,
            },
        )
        .await
        .unwrap();

        let mut reg = input("Foyer");
        reg.assigned_layout_id = Some(layout.id);
        let display = DisplayRepo::register(&store, &reg).await.unwrap();
        assert_eq!(display.assigned_layout_id, Some(layout.id));

        let updated = DisplayRepo::update(
            &store,
            display.id,
            &UpdateDisplayInput {
                assigned_layout_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(updated.assigned_layout_id.is_none());
        assert!(updated.updated_at >= display.updated_at);
    }

    #[tokio::test]
    async fn delete_unknown_display_is_not_found() {
        let store = Store::new();
        let err = DisplayRepo::delete(&store, Id::new_v4()).await.unwrap_err();
        assert_matches!(err, CoreError::NotFound { entity: "display", .. });
    }
}
