//! The resolved, render-ready state delivered to a display, plus the live
//! data payload types shared by the resolution service, the event feed read
//! models, and the playback runtime.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::display::Display;
use crate::layout::Layout;
use crate::playlist::Playlist;
use crate::types::{Id, Timestamp};

// ---------------------------------------------------------------------------
// Read-model rows
// ---------------------------------------------------------------------------

/// The event (tournament/show) a payload is scoped to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInfo {
    pub id: Id,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
}

/// One entry as it appears in the ring: the current run or a next-up slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunInfo {
    pub competitor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ring: Option<String>,
}

/// One released, ranked result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub rank: u32,
    pub competitor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

/// One upcoming timetable entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub starts_at: Timestamp,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ring: Option<String>,
}

/// Re-rank results contiguously `1..N` by descending score, regardless of
/// gaps or ties in the underlying ranking.
pub fn renumber_top(mut results: Vec<RankedResult>) -> Vec<RankedResult> {
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    for (i, row) in results.iter_mut().enumerate() {
        row.rank = (i + 1) as u32;
    }
    results
}

// ---------------------------------------------------------------------------
// Data payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<RunInfo>,
    #[serde(default)]
    pub next: Vec<RunInfo>,
    #[serde(default)]
    pub top: Vec<RankedResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleData {
    #[serde(default)]
    pub upcoming: Vec<ScheduleEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SponsorData {
    #[serde(default)]
    pub messages: Vec<String>,
}

/// Server clock at resolution time, in display and machine forms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClockData {
    pub time: String,
    pub iso: String,
}

impl ClockData {
    pub fn at(now: Timestamp) -> Self {
        Self {
            time: now.format("%H:%M:%S").to_string(),
            iso: now.to_rfc3339(),
        }
    }
}

/// The assembled live data a layout's bindings resolve against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<EventInfo>,
    #[serde(default)]
    pub live: LiveData,
    #[serde(default)]
    pub schedule: ScheduleData,
    #[serde(default)]
    pub sponsors: SponsorData,
    #[serde(default)]
    pub clock: ClockData,
}

impl DataPayload {
    /// The payload as a JSON tree for dot-path binding resolution.
    pub fn as_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

// ---------------------------------------------------------------------------
// Player state
// ---------------------------------------------------------------------------

/// The display as the player sees it. The secret access token never leaves
/// the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySummary {
    pub id: Id,
    pub name: String,
    pub group: String,
    pub heartbeat_interval_secs: u32,
}

impl From<&Display> for DisplaySummary {
    fn from(d: &Display) -> Self {
        Self {
            id: d.id,
            name: d.name.clone(),
            group: d.group.clone(),
            heartbeat_interval_secs: d.heartbeat_interval_secs,
        }
    }
}

/// One playlist slot with its dwell already resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedItem {
    pub layout_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub duration_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: Id,
    pub title: String,
    pub items: Vec<ResolvedItem>,
}

impl PlaylistSummary {
    pub fn from_playlist(playlist: &Playlist) -> Self {
        Self {
            id: playlist.id,
            title: playlist.title.clone(),
            items: playlist
                .items
                .iter()
                .map(|item| ResolvedItem {
                    layout_id: item.layout_id,
                    label: item.label.clone(),
                    duration_secs: playlist.item_dwell_secs(item),
                })
                .collect(),
        }
    }
}

/// The fully resolved snapshot delivered to one display for one poll cycle.
/// Derived on every resolution request, never persisted server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub display: DisplaySummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist: Option<PlaylistSummary>,
    pub layouts: Vec<Layout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_layout: Option<Id>,
    pub data: DataPayload,
    pub sync_token: String,
    pub cache_ttl_secs: u64,
}

impl PlayerState {
    pub fn layout(&self, id: Id) -> Option<&Layout> {
        self.layouts.iter().find(|l| l.id == id)
    }
}

/// Fingerprint of everything that would make a player re-render: the
/// display's, playlist's, and delivered layouts' last-modified state.
///
/// `last_seen_at` is excluded by construction (it never touches
/// `updated_at`), so two resolutions with no intervening writes always agree.
pub fn sync_token(display: &Display, playlist: Option<&Playlist>, layouts: &[Layout]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(display.id.as_bytes());
    hasher.update(display.updated_at.timestamp_millis().to_be_bytes());

    if let Some(p) = playlist {
        hasher.update(p.id.as_bytes());
        hasher.update(p.updated_at.timestamp_millis().to_be_bytes());
    }

    for layout in layouts {
        hasher.update(layout.id.as_bytes());
        hasher.update(layout.version.to_be_bytes());
        hasher.update(layout.updated_at.timestamp_millis().to_be_bytes());
    }

    let digest = hasher.finalize();
    digest[..16].iter().map(|b| format!("{b:02x}")).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
