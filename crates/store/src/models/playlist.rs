//! Playlist input DTO.

use serde::Deserialize;

use ringside_core::playlist::PlaylistItem;
use ringside_core::types::{Id, Timestamp};

/// DTO for saving a playlist. Save is whole-record: absent optional fields
/// reset to their defaults rather than patching. With `id` unset a new
/// playlist is created.
#[derive(Debug, Clone, Deserialize)]
pub struct SavePlaylistInput {
    #[serde(default)]
    pub id: Option<Id>,
    pub title: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub layout_id: Option<Id>,
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    #[serde(default)]
    pub rotation_secs: Option<u32>,
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub starts_at: Option<Timestamp>,
    #[serde(default)]
    pub ends_at: Option<Timestamp>,
    #[serde(default)]
    pub enabled: Option<bool>,
}
