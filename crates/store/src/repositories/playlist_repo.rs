//! Repository for playlists.

use chrono::Utc;

use ringside_core::error::CoreError;
use ringside_core::normalize::normalize_playlist;
use ringside_core::playlist::Playlist;
use ringside_core::types::Id;

use crate::models::display::DEFAULT_GROUP;
use crate::models::playlist::SavePlaylistInput;
use crate::store::Store;

/// Provides data access for playlists.
pub struct PlaylistRepo;

impl PlaylistRepo {
    /// Save a playlist, creating it when the input has no id.
    ///
    /// The record is validated fully before any table is written: a blank
    /// title or an item referencing a layout that does not exist rejects
    /// the whole save, leaving the stored playlist untouched.
    pub async fn save(store: &Store, input: SavePlaylistInput) -> Result<Playlist, CoreError> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(CoreError::Validation(
                "Playlist title must not be empty".to_string(),
            ));
        }

        let now = Utc::now();
        let (id, created_at) = match input.id {
            Some(id) => {
                let playlists = store.playlists.read().await;
                let existing = playlists.get(&id).ok_or(CoreError::not_found("playlist", id))?;
                (id, existing.created_at)
            }
            None => (Id::new_v4(), now),
        };

        let mut playlist = Playlist {
            id,
            title,
            group: input
                .group
                .as_deref()
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .unwrap_or(DEFAULT_GROUP)
                .to_string(),
            layout_id: input.layout_id,
            items: input.items,
            rotation_secs: input.rotation_secs,
            priority: input.priority.unwrap_or(0),
            starts_at: input.starts_at,
            ends_at: input.ends_at,
            enabled: input.enabled.unwrap_or(true),
            created_at,
            updated_at: now,
        };
        normalize_playlist(&mut playlist);

        if let (Some(starts), Some(ends)) = (playlist.starts_at, playlist.ends_at) {
            if ends < starts {
                return Err(CoreError::Validation(
                    "Playlist window ends before it starts".to_string(),
                ));
            }
        }

        // Validate after normalization so the legacy layout_id shortcut is
        // checked as an item like any other.
        let layouts = store.layouts.read().await;
        for item in &playlist.items {
            if !layouts.contains_key(&item.layout_id) {
                return Err(CoreError::Validation(format!(
                    "Playlist item references missing layout {}",
                    item.layout_id
                )));
            }
        }
        drop(layouts);

        store.playlists.write().await.insert(id, playlist.clone());
        tracing::info!(playlist_id = %id, title = %playlist.title, items = playlist.items.len(), "Saved playlist");
        Ok(playlist)
    }

    /// List all playlists sorted by title.
    pub async fn list(store: &Store) -> Vec<Playlist> {
        let playlists = store.playlists.read().await;
        let mut rows: Vec<Playlist> = playlists.values().cloned().collect();
        rows.sort_by(|a, b| a.title.cmp(&b.title));
        rows
    }

    /// Find a single playlist by its ID.
    pub async fn find_by_id(store: &Store, id: Id) -> Result<Playlist, CoreError> {
        store
            .playlists
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(CoreError::not_found("playlist", id))
    }

    /// All playlists targeting a group. Selection logic (priority, time
    /// windows) lives in `ringside_core::schedule`.
    pub async fn list_by_group(store: &Store, group: &str) -> Vec<Playlist> {
        store
            .playlists
            .read()
            .await
            .values()
            .filter(|p| p.group == group)
            .cloned()
            .collect()
    }

    /// Delete a playlist and detach it from any display that pointed at it.
    pub async fn delete(store: &Store, id: Id) -> Result<(), CoreError> {
        if store.playlists.write().await.remove(&id).is_none() {
            return Err(CoreError::not_found("playlist", id));
        }

        let now = Utc::now();
        let mut displays = store.displays.write().await;
        for display in displays.values_mut() {
            if display.assigned_playlist_id == Some(id) {
                display.assigned_playlist_id = None;
                display.updated_at = now;
            }
        }
        drop(displays);

        tracing::info!(playlist_id = %id, "Deleted playlist");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
