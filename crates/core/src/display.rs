//! Physical playback targets.

use serde::{Deserialize, Serialize};

use crate::types::{Id, Timestamp};

/// Heartbeat interval given to displays registered without one.
pub const DEFAULT_HEARTBEAT_SECS: u32 = 30;

/// Floor for the client poll interval, regardless of heartbeat setting.
pub const MIN_POLL_SECS: u64 = 15;

/// Floor for the offline cache lifetime advised to clients.
pub const MIN_CACHE_TTL_SECS: u64 = 60;

/// One physical display, identified to the delivery endpoint by its secret
/// access token.
///
/// `last_seen_at` is refreshed on every resolution request and deliberately
/// does not touch `updated_at`, so routine polling never changes the sync
/// fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Display {
    pub id: Id,
    pub name: String,
    /// Playlist targeting group; group playlists are matched by exact name.
    #[serde(default)]
    pub group: String,
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_layout_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_playlist_id: Option<Id>,
    #[serde(default = "default_heartbeat_secs")]
    pub heartbeat_interval_secs: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn default_heartbeat_secs() -> u32 {
    DEFAULT_HEARTBEAT_SECS
}

impl Display {
    /// How often the playback runtime should poll for a fresh state.
    pub fn poll_interval_secs(&self) -> u64 {
        u64::from(self.heartbeat_interval_secs).max(MIN_POLL_SECS)
    }

    /// How long a cached state stays valid when the display is offline.
    pub fn cache_ttl_secs(&self) -> u64 {
        (u64::from(self.heartbeat_interval_secs) * 3).max(MIN_CACHE_TTL_SECS)
    }
}
