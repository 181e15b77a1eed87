//! Ringside domain model and pure layout logic.
//!
//! Everything here is in-memory and side-effect free: the canonical
//! layout/element/scene model, fractional-coordinate geometry for the
//! editor canvas, dot-path data binding, playlist scheduling, the
//! authoring session with undo/redo, and the resolved player-state types.
//! Persistence, HTTP, and rendering live in the other workspace crates and
//! build on these types.

pub mod binding;
pub mod display;
pub mod editor;
pub mod element;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod normalize;
pub mod player;
pub mod playlist;
pub mod schedule;
pub mod types;

pub use error::CoreError;
pub use types::{Id, Timestamp};
