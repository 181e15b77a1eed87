use std::sync::Arc;

use ringside_store::{EventFeed, Store};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// In-memory entity store (layouts, displays, playlists).
    pub store: Arc<Store>,
    /// Live event data source the payload assembler reads from.
    pub feed: Arc<dyn EventFeed>,
    /// Server configuration (default event scope, sponsor fallback, CORS).
    pub config: Arc<ServerConfig>,
}
