//! Repository for layouts and their revision history.

use chrono::Utc;

use ringside_core::error::CoreError;
use ringside_core::layout::{Layout, LayoutStatus};
use ringside_core::normalize::normalize_layout;
use ringside_core::types::Id;

use crate::models::layout::{CreateLayoutInput, LayoutRevision, UpdateLayoutInput};
use crate::store::Store;

/// Provides data access for layouts.
pub struct LayoutRepo;

impl LayoutRepo {
    /// Create a new draft layout at version 1 and record its first revision.
    pub async fn create(store: &Store, input: &CreateLayoutInput) -> Result<Layout, CoreError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation(
                "Layout name must not be empty".to_string(),
            ));
        }

        let mut layout = Layout::new(name);
        layout.event_id = input.event_id;
        if let Some(canvas) = input.canvas.clone() {
            layout.canvas = canvas;
        }
        if let Some(theme) = input.theme.clone() {
            layout.options.theme = Some(theme);
        }
        normalize_layout(&mut layout);

        store.layouts.write().await.insert(layout.id, layout.clone());
        store.revisions.write().await.insert(
            layout.id,
            vec![LayoutRevision {
                version: layout.version,
                snapshot: layout.clone(),
                actor: None,
                comment: None,
                saved_at: layout.created_at,
            }],
        );

        tracing::info!(layout_id = %layout.id, name = %layout.name, "Created layout");
        Ok(layout)
    }

    /// List layouts, optionally filtered by event, most recently updated
    /// first.
    pub async fn list(store: &Store, event_id: Option<Id>) -> Vec<Layout> {
        let layouts = store.layouts.read().await;
        let mut rows: Vec<Layout> = layouts
            .values()
            .filter(|l| event_id.is_none() || l.event_id == event_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        rows
    }

    /// Find a single layout by its ID.
    pub async fn find_by_id(store: &Store, id: Id) -> Result<Layout, CoreError> {
        store
            .layouts
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(CoreError::not_found("layout", id))
    }

    /// The most recently updated layout, if the store has any. Used as the
    /// final resolution fallback so a display never shows nothing.
    pub async fn most_recently_updated(store: &Store) -> Option<Layout> {
        store
            .layouts
            .read()
            .await
            .values()
            .max_by_key(|l| l.updated_at)
            .cloned()
    }

    /// Save new layout content.
    ///
    /// The input's `version` must match the stored version; a stale version
    /// rejects the write with `Conflict` and the caller reloads. A
    /// successful save normalizes, bumps the version, and appends an
    /// immutable revision.
    pub async fn update(store: &Store, id: Id, input: UpdateLayoutInput) -> Result<Layout, CoreError> {
        let mut layouts = store.layouts.write().await;
        let layout = layouts.get_mut(&id).ok_or(CoreError::not_found("layout", id))?;

        if input.version != layout.version {
            return Err(CoreError::Conflict(format!(
                "Layout was saved elsewhere: expected version {}, store has {}",
                input.version, layout.version
            )));
        }
        if let Some(name) = &input.name {
            if name.trim().is_empty() {
                return Err(CoreError::Validation(
                    "Layout name must not be empty".to_string(),
                ));
            }
        }

        if let Some(name) = input.name {
            layout.name = name.trim().to_string();
        }
        if let Some(canvas) = input.canvas {
            layout.canvas = canvas;
        }
        if let Some(elements) = input.elements {
            layout.elements = elements;
        }
        if let Some(timeline) = input.timeline {
            layout.timeline = timeline;
        }
        if let Some(data_sources) = input.data_sources {
            layout.data_sources = data_sources;
        }
        if let Some(options) = input.options {
            layout.options = options;
        }
        if let Some(event_id) = input.event_id {
            layout.event_id = event_id;
        }

        normalize_layout(layout);
        layout.version += 1;
        layout.updated_at = Utc::now();
        let saved = layout.clone();
        drop(layouts);

        store
            .revisions
            .write()
            .await
            .entry(id)
            .or_default()
            .push(LayoutRevision {
                version: saved.version,
                snapshot: saved.clone(),
                actor: input.actor,
                comment: input.comment,
                saved_at: saved.updated_at,
            });

        tracing::info!(layout_id = %id, version = saved.version, "Saved layout");
        Ok(saved)
    }

    /// Mark a layout published. Publishing changes no content, so the
    /// version stays put; `updated_at` moves so players refresh.
    pub async fn publish(store: &Store, id: Id) -> Result<Layout, CoreError> {
        let mut layouts = store.layouts.write().await;
        let layout = layouts.get_mut(&id).ok_or(CoreError::not_found("layout", id))?;
        layout.status = LayoutStatus::Published;
        layout.updated_at = Utc::now();
        tracing::info!(layout_id = %id, "Published layout");
        Ok(layout.clone())
    }

    /// Clone a layout into a fresh version-1 draft named "Copy of …".
    pub async fn duplicate(store: &Store, id: Id) -> Result<Layout, CoreError> {
        let source = Self::find_by_id(store, id).await?;

        let now = Utc::now();
        let mut copy = source;
        copy.id = Id::new_v4();
        copy.name = format!("Copy of {}", copy.name);
        copy.status = LayoutStatus::Draft;
        copy.version = 1;
        copy.created_at = now;
        copy.updated_at = now;

        store.layouts.write().await.insert(copy.id, copy.clone());
        store.revisions.write().await.insert(
            copy.id,
            vec![LayoutRevision {
                version: 1,
                snapshot: copy.clone(),
                actor: None,
                comment: None,
                saved_at: now,
            }],
        );

        tracing::info!(source_id = %id, layout_id = %copy.id, "Duplicated layout");
        Ok(copy)
    }

    /// Delete a layout and scrub every reference to it: playlist items,
    /// playlist legacy shortcuts, and display assignments. Touched
    /// playlists and displays get a fresh `updated_at` so their players
    /// notice the change.
    pub async fn delete(store: &Store, id: Id) -> Result<(), CoreError> {
        if store.layouts.write().await.remove(&id).is_none() {
            return Err(CoreError::not_found("layout", id));
        }
        store.revisions.write().await.remove(&id);

        let now = Utc::now();
        let mut playlists = store.playlists.write().await;
        for playlist in playlists.values_mut() {
            let had = playlist.items.len();
            playlist.items.retain(|item| item.layout_id != id);
            let mut touched = playlist.items.len() != had;
            if playlist.layout_id == Some(id) {
                playlist.layout_id = None;
                touched = true;
            }
            if touched {
                playlist.updated_at = now;
            }
        }
        drop(playlists);

        let mut displays = store.displays.write().await;
        for display in displays.values_mut() {
            if display.assigned_layout_id == Some(id) {
                display.assigned_layout_id = None;
                display.updated_at = now;
            }
        }
        drop(displays);

        tracing::info!(layout_id = %id, "Deleted layout");
        Ok(())
    }

    /// A layout's revision history, newest first.
    pub async fn revisions(store: &Store, id: Id) -> Result<Vec<LayoutRevision>, CoreError> {
        if !store.layouts.read().await.contains_key(&id) {
            return Err(CoreError::not_found("layout", id));
        }
        let mut rows = store
            .revisions
            .read()
            .await
            .get(&id)
            .cloned()
            .unwrap_or_default();
        rows.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(rows)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
