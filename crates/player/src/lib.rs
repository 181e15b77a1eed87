//! Ringside playback runtime.
//!
//! Turns a resolved [`PlayerState`](ringside_core::player::PlayerState) into
//! an endless rotation of rendered scenes: polls the server, keeps the last
//! good state cached on disk, advances scenes on their dwell timers, ticks
//! clock elements locally, and hands every frame to a
//! [`FrameSink`](sink::FrameSink).

pub mod cache;
pub mod clock;
pub mod config;
pub mod fetch;
pub mod render;
pub mod rotation;
pub mod runtime;
pub mod sink;
pub mod video;
