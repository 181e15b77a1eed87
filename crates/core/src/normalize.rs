//! Load-time canonicalization of legacy document shapes.
//!
//! Applied once when a layout or playlist enters the engine (store reads,
//! editor session start, player state ingestion) so nothing downstream
//! special-cases the legacy forms: a layout without a timeline gains one
//! default scene covering all elements, a single-layout playlist gains a
//! one-item list, frames are clamped, and scene durations get their floor.

use crate::layout::{Layout, Scene, MIN_SCENE_SECS};
use crate::playlist::{Playlist, PlaylistItem};

/// Canonicalize a layout in place.
pub fn normalize_layout(layout: &mut Layout) {
    if layout.timeline.is_empty() {
        layout.timeline.push(Scene::default_all());
    }

    for scene in &mut layout.timeline {
        if scene.duration_secs < MIN_SCENE_SECS {
            scene.duration_secs = MIN_SCENE_SECS;
        }
        // Drop references to elements that no longer exist.
        let known = &layout.elements;
        scene
            .element_ids
            .retain(|id| known.iter().any(|e| e.id == *id));
    }

    for element in &mut layout.elements {
        element.frame = element.frame.clamped();
    }

    if layout.version == 0 {
        layout.version = 1;
    }
}

/// Canonicalize a playlist in place: the legacy `layout_id` shortcut becomes
/// a one-item list when no explicit items exist.
pub fn normalize_playlist(playlist: &mut Playlist) {
    if playlist.items.is_empty() {
        if let Some(layout_id) = playlist.layout_id {
            playlist.items.push(PlaylistItem {
                layout_id,
                label: None,
                duration_secs: None,
            });
        }
    }
}
