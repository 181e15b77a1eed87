//! Playlists: ordered, time-windowed, prioritized layout rotations.

use serde::{Deserialize, Serialize};

use crate::types::{Id, Timestamp};

/// Dwell applied to playlist items that specify no duration anywhere.
pub const DEFAULT_ITEM_SECS: u32 = 20;

/// One rotation slot referencing a layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub layout_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u32>,
}

/// An ordered rotation of layouts assigned to a group of displays, active
/// only inside its optional time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub group: String,
    /// Legacy single-layout shortcut; normalization turns it into a
    /// one-item `items` list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_id: Option<Id>,
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    /// Default dwell for items without their own duration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_secs: Option<u32>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<Timestamp>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn default_enabled() -> bool {
    true
}

impl Playlist {
    /// Dwell for one item: its own duration, else the playlist rotation
    /// default, else [`DEFAULT_ITEM_SECS`].
    pub fn item_dwell_secs(&self, item: &PlaylistItem) -> u64 {
        u64::from(
            item.duration_secs
                .or(self.rotation_secs)
                .unwrap_or(DEFAULT_ITEM_SECS),
        )
    }
}
