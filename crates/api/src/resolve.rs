//! The display resolution service: access token → active playlist/layout →
//! data payload → change fingerprint → advised cache lifetime.
//!
//! Resolution is derived fresh on every poll and never persisted; the only
//! write it performs is the display heartbeat.

use chrono::Utc;
use ringside_core::layout::Layout;
use ringside_core::player::{self, DisplaySummary, PlayerState, PlaylistSummary};
use ringside_core::schedule;
use ringside_store::repositories::{DisplayRepo, LayoutRepo, PlaylistRepo};

use crate::payload;
use crate::state::AppState;

/// Outcome of a resolution request.
///
/// An unknown token is an explicit state rather than a plain error: deployed
/// display hardware needs a machine-readable "not registered" signal it can
/// show alongside its setup screen.
#[derive(Debug)]
pub enum Resolution {
    State(Box<PlayerState>),
    NotRegistered,
}

/// Resolve what the display behind `token` should show right now.
pub async fn resolve(state: &AppState, token: &str) -> Resolution {
    let now = Utc::now();

    let Some(display) = DisplayRepo::find_by_token(&state.store, token).await else {
        return Resolution::NotRegistered;
    };

    // Heartbeat. Deliberately leaves `updated_at` alone so polling by itself
    // never changes the sync token.
    DisplayRepo::touch(&state.store, display.id, now).await;

    // Candidate playlists: everything in the display's group, plus the
    // directly assigned one even when it lives in another group.
    let mut candidates = PlaylistRepo::list_by_group(&state.store, &display.group).await;
    if let Some(assigned_id) = display.assigned_playlist_id {
        if !candidates.iter().any(|p| p.id == assigned_id) {
            if let Ok(assigned) = PlaylistRepo::find_by_id(&state.store, assigned_id).await {
                candidates.push(assigned);
            }
        }
    }

    let playlist = schedule::select_playlist(&display, &candidates, now).cloned();

    // Layouts to deliver: the playlist's items in order (first occurrence
    // wins), else the assigned layout, else the most recently updated layout
    // in the store. A display never shows nothing.
    let mut layouts: Vec<Layout> = Vec::new();
    if let Some(ref playlist) = playlist {
        for item in &playlist.items {
            if layouts.iter().any(|l| l.id == item.layout_id) {
                continue;
            }
            match LayoutRepo::find_by_id(&state.store, item.layout_id).await {
                Ok(layout) => layouts.push(layout),
                // Layout deletion scrubs playlist items, so a dangling id is
                // a mid-delete race at worst. The show goes on without it.
                Err(e) => {
                    tracing::warn!(playlist_id = %playlist.id, error = %e, "Skipping playlist item")
                }
            }
        }
    }

    if layouts.is_empty() {
        let mut fallback = None;
        if let Some(id) = display.assigned_layout_id {
            fallback = LayoutRepo::find_by_id(&state.store, id).await.ok();
        }
        if fallback.is_none() {
            fallback = LayoutRepo::most_recently_updated(&state.store).await;
        }
        layouts.extend(fallback);
    }

    let active_layout = layouts.first().map(|l| l.id);

    // Payload scope: the active layout's event wins over the configured
    // default event.
    let event_id = layouts
        .iter()
        .find(|l| Some(l.id) == active_layout)
        .and_then(|l| l.event_id)
        .unwrap_or(state.config.default_event_id);

    let data = payload::assemble(
        state.feed.as_ref(),
        event_id,
        &state.config.sponsor_fallback,
        now,
    )
    .await;

    let sync_token = player::sync_token(&display, playlist.as_ref(), &layouts);
    let cache_ttl_secs = display.cache_ttl_secs();

    Resolution::State(Box::new(PlayerState {
        display: DisplaySummary::from(&display),
        playlist: playlist.as_ref().map(PlaylistSummary::from_playlist),
        layouts,
        active_layout,
        data,
        sync_token,
        cache_ttl_secs,
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
