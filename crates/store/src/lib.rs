//! Ringside persistence layer: in-memory repositories for layouts (with
//! revision history), displays, and playlists, plus the live event-feed
//! read-model trait.
//!
//! The store is the process's source of truth; swapping it for a database
//! later only touches this crate. Repositories are zero-sized structs with
//! async methods taking `&Store` as the first argument, and every cascade
//! rule (layout deletion scrubbing playlists and display assignments) lives
//! here rather than in the handlers.

pub mod demo;
pub mod feed;
pub mod models;
pub mod repositories;
pub mod store;

pub use feed::{EventFeed, InMemoryFeed};
pub use store::Store;
