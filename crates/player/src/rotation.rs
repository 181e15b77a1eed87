//! Playback rotation: which playlist item and scene are on screen.
//!
//! A [`Rotation`] is planned once per received state and advanced by the
//! runtime's scene timer. Planning clones everything it needs out of the
//! state, so advancing is pure bookkeeping.

use std::time::Duration;

use ringside_core::layout::{Layout, Scene, MIN_SCENE_SECS};
use ringside_core::player::PlayerState;
use ringside_core::playlist::DEFAULT_ITEM_SECS;
use ringside_core::types::Id;

/// One scene of one item, with its dwell already floored.
#[derive(Debug, Clone)]
pub struct PlannedScene {
    pub scene: Scene,
    pub dwell: Duration,
}

/// One slot in the playback order: a layout and its scene list.
#[derive(Debug, Clone)]
pub struct PlannedItem {
    pub layout_id: Id,
    pub label: Option<String>,
    pub scenes: Vec<PlannedScene>,
}

/// What a scene-timer expiry moved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The next scene within the same item.
    Scene,
    /// Wrapped into the next playlist item; the layout starts from scratch.
    Item,
}

/// What the rotation says should be on screen right now.
#[derive(Debug)]
pub struct CurrentScene<'a> {
    pub layout_id: Id,
    pub item_label: Option<&'a str>,
    pub scene: &'a Scene,
    pub dwell: Duration,
}

/// The planned playback order plus the cursor into it.
///
/// Planning guarantees at least one item, and every item at least one scene,
/// so the cursor always points at something.
#[derive(Debug)]
pub struct Rotation {
    items: Vec<PlannedItem>,
    item: usize,
    scene: usize,
}

impl Rotation {
    /// Plan the playback order for a state: one item per playlist slot, or a
    /// single item around the active layout when there is no playlist.
    /// `None` when the state carries nothing playable.
    pub fn plan(state: &PlayerState) -> Option<Self> {
        let mut items = Vec::new();

        if let Some(playlist) = &state.playlist {
            for entry in &playlist.items {
                let Some(layout) = state.layout(entry.layout_id) else {
                    tracing::warn!(
                        layout_id = %entry.layout_id,
                        "Playlist item points at a layout missing from the state, skipping"
                    );
                    continue;
                };
                items.push(PlannedItem {
                    layout_id: layout.id,
                    label: entry.label.clone(),
                    scenes: scene_plan(layout, entry.duration_secs),
                });
            }
        }

        if items.is_empty() {
            if let Some(layout) = state.active_layout.and_then(|id| state.layout(id)) {
                items.push(PlannedItem {
                    layout_id: layout.id,
                    label: None,
                    scenes: scene_plan(layout, u64::from(DEFAULT_ITEM_SECS)),
                });
            }
        }

        if items.is_empty() {
            return None;
        }
        Some(Self {
            items,
            item: 0,
            scene: 0,
        })
    }

    pub fn current(&self) -> CurrentScene<'_> {
        let item = &self.items[self.item];
        let planned = &item.scenes[self.scene];
        CurrentScene {
            layout_id: item.layout_id,
            item_label: item.label.as_deref(),
            scene: &planned.scene,
            dwell: planned.dwell,
        }
    }

    /// Advance past the current scene, wrapping into the next item when the
    /// scene index wraps to zero.
    pub fn advance(&mut self) -> Step {
        self.scene += 1;
        if self.scene < self.items[self.item].scenes.len() {
            return Step::Scene;
        }
        self.scene = 0;
        self.item = (self.item + 1) % self.items.len();
        Step::Item
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Scene count of the item currently playing.
    pub fn scene_count(&self) -> usize {
        self.items[self.item].scenes.len()
    }
}

/// The scene list for one item's layout. An empty timeline plays as a single
/// synthetic scene showing every element for the item's dwell.
fn scene_plan(layout: &Layout, item_dwell_secs: u64) -> Vec<PlannedScene> {
    if layout.timeline.is_empty() {
        return vec![PlannedScene {
            scene: Scene::default_all(),
            dwell: Duration::from_secs(item_dwell_secs.max(u64::from(MIN_SCENE_SECS))),
        }];
    }
    layout
        .timeline
        .iter()
        .map(|scene| PlannedScene {
            scene: scene.clone(),
            dwell: Duration::from_secs(scene.dwell_secs()),
        })
        .collect()
}
