//! HTTP handlers, grouped by surface.
//!
//! `actions` carries the operator-facing action RPC, `player` the delivery
//! endpoint display hardware polls, and the rest are plain listing reads.

pub mod actions;
pub mod displays;
pub mod layouts;
pub mod player;
pub mod playlists;
