//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&Store` as the first argument. Validation happens before
//! any table is written, so a rejected call never leaves a partial write.

pub mod display_repo;
pub mod layout_repo;
pub mod playlist_repo;

pub use display_repo::DisplayRepo;
pub use layout_repo::LayoutRepo;
pub use playlist_repo::PlaylistRepo;
