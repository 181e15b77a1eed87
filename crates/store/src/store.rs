//! The in-memory table set shared by all repositories.

use std::collections::HashMap;

use tokio::sync::RwLock;

use ringside_core::display::Display;
use ringside_core::layout::Layout;
use ringside_core::playlist::Playlist;
use ringside_core::types::Id;

use crate::models::layout::LayoutRevision;

/// All persisted state, keyed by entity id.
///
/// Thread-safe via interior `RwLock` per table; designed to be wrapped in
/// `Arc` and shared across the application. Locks are held only for the
/// duration of a single repository call.
pub struct Store {
    pub(crate) layouts: RwLock<HashMap<Id, Layout>>,
    pub(crate) revisions: RwLock<HashMap<Id, Vec<LayoutRevision>>>,
    pub(crate) displays: RwLock<HashMap<Id, Display>>,
    pub(crate) playlists: RwLock<HashMap<Id, Playlist>>,
}

impl Store {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self {
            layouts: RwLock::new(HashMap::new()),
            revisions: RwLock::new(HashMap::new()),
            displays: RwLock::new(HashMap::new()),
            playlists: RwLock::new(HashMap::new()),
        }
    }

    /// Entity counts, for the health endpoint and startup logging.
    pub async fn counts(&self) -> StoreCounts {
        StoreCounts {
            layouts: self.layouts.read().await.len(),
            displays: self.displays.read().await.len(),
            playlists: self.playlists.read().await.len(),
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct StoreCounts {
    pub layouts: usize,
    pub displays: usize,
    pub playlists: usize,
}
