//! Display input DTOs and the token-free admin view.

use serde::{Deserialize, Serialize};

use ringside_core::display::Display;
use ringside_core::types::{Id, Timestamp};

/// DTO for registering a new display.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterDisplayInput {
    pub name: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub heartbeat_interval_secs: Option<u32>,
    #[serde(default)]
    pub assigned_layout_id: Option<Id>,
    #[serde(default)]
    pub assigned_playlist_id: Option<Id>,
}

/// DTO for partially updating a display. The assignment fields are doubly
/// optional so an explicit inner `None` detaches the assignment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDisplayInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub heartbeat_interval_secs: Option<u32>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub assigned_layout_id: Option<Option<Id>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub assigned_playlist_id: Option<Option<Id>>,
}

/// What admin reads see. The access token is returned exactly once, by
/// registration; it never appears in list or update responses.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayView {
    pub id: Id,
    pub name: String,
    pub group: String,
    pub assigned_layout_id: Option<Id>,
    pub assigned_playlist_id: Option<Id>,
    pub heartbeat_interval_secs: u32,
    pub last_seen_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Display> for DisplayView {
    fn from(d: &Display) -> Self {
        Self {
            id: d.id,
            name: d.name.clone(),
            group: d.group.clone(),
            assigned_layout_id: d.assigned_layout_id,
            assigned_playlist_id: d.assigned_playlist_id,
            heartbeat_interval_secs: d.heartbeat_interval_secs,
            last_seen_at: d.last_seen_at,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

/// Registration response: the view plus the one-time token.
#[derive(Debug, Clone, Serialize)]
pub struct RegisteredDisplay {
    #[serde(flatten)]
    pub display: DisplayView,
    pub access_token: String,
}

/// Applied default when registration omits the group.
pub const DEFAULT_GROUP: &str = "main";
