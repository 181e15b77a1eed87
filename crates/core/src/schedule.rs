//! Playlist scheduling: the active-window predicate and the candidate
//! ordering that decides what a display shows right now.
//!
//! Pure functions over the model so the resolution service and its tests
//! share one implementation.

use std::cmp::Ordering;

use crate::display::Display;
use crate::playlist::Playlist;
use crate::types::Timestamp;

/// A playlist is active at `now` iff it is enabled and `now` lies inside its
/// optional `[starts_at, ends_at]` window (half-open ends are unbounded).
pub fn is_active(playlist: &Playlist, now: Timestamp) -> bool {
    if !playlist.enabled {
        return false;
    }
    if let Some(starts) = playlist.starts_at {
        if now < starts {
            return false;
        }
    }
    if let Some(ends) = playlist.ends_at {
        if now > ends {
            return false;
        }
    }
    true
}

/// Candidate ordering for group playlists: priority descending, then
/// playlists with a start time before those without one, then earlier start
/// first, then most recently updated.
pub fn compare_candidates(a: &Playlist, b: &Playlist) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| match (a.starts_at, b.starts_at) {
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(sa), Some(sb)) => sa.cmp(&sb),
            (None, None) => Ordering::Equal,
        })
        .then_with(|| b.updated_at.cmp(&a.updated_at))
}

/// Pick the playlist a display should play at `now`.
///
/// A directly assigned playlist wins when it is currently active; otherwise
/// the best active playlist sharing the display's group. Returns `None` when
/// nothing applies (the resolver then falls back to a layout).
pub fn select_playlist<'a>(
    display: &Display,
    playlists: &'a [Playlist],
    now: Timestamp,
) -> Option<&'a Playlist> {
    if let Some(assigned_id) = display.assigned_playlist_id {
        if let Some(assigned) = playlists.iter().find(|p| p.id == assigned_id) {
            if is_active(assigned, now) {
                return Some(assigned);
            }
        }
    }

    let mut candidates: Vec<&Playlist> = playlists
        .iter()
        .filter(|p| p.group == display.group && is_active(p, now))
        .collect();
    candidates.sort_by(|a, b| compare_candidates(a, b));
    candidates.first().copied()
}
