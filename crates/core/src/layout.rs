//! The layout document: canvas, elements, playback timeline, data sources.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::element::Element;
use crate::types::{Id, Timestamp};

// ---------------------------------------------------------------------------
// Scene timing constants
// ---------------------------------------------------------------------------

/// Shortest scene dwell the playback runtime will honor.
pub const MIN_SCENE_SECS: u32 = 5;

/// Duration given to scenes created without an explicit one.
pub const DEFAULT_SCENE_SECS: u32 = 10;

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

/// The resolution-independent design surface. Width and height are abstract
/// units fixing the aspect ratio and the print scale reference; elements are
/// positioned as fractions of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_background")]
    pub background: String,
}

fn default_background() -> String {
    "#000000".to_string()
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
            background: default_background(),
        }
    }
}

// ---------------------------------------------------------------------------
// Scenes
// ---------------------------------------------------------------------------

/// Scene enter/exit transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    #[default]
    None,
    Fade,
    Slide,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transitions {
    #[serde(rename = "in", default)]
    pub enter: TransitionKind,
    #[serde(rename = "out", default)]
    pub exit: TransitionKind,
}

/// A named subset of a layout's elements shown together for a fixed duration.
///
/// An empty `element_ids` list means "show every element on the layout",
/// which is also the shape of the synthesized default scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub id: Id,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_scene_secs")]
    pub duration_secs: u32,
    #[serde(default)]
    pub element_ids: Vec<Id>,
    #[serde(default)]
    pub transitions: Transitions,
}

fn default_scene_secs() -> u32 {
    DEFAULT_SCENE_SECS
}

impl Scene {
    /// A fresh scene with the default duration and no element filter.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            duration_secs: DEFAULT_SCENE_SECS,
            element_ids: Vec::new(),
            transitions: Transitions::default(),
        }
    }

    /// The synthesized default scene covering all elements.
    pub fn default_all() -> Self {
        Self::new("Main")
    }

    pub fn shows_all(&self) -> bool {
        self.element_ids.is_empty()
    }

    /// Dwell in seconds with the minimum floor applied.
    pub fn dwell_secs(&self) -> u64 {
        u64::from(self.duration_secs.max(MIN_SCENE_SECS))
    }
}

// ---------------------------------------------------------------------------
// Data sources & options
// ---------------------------------------------------------------------------

/// Which read model a declared data source draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSourceKind {
    /// Current/next entries in the ring.
    Live,
    /// Ranked released results.
    Results,
    /// Upcoming timetable entries.
    Schedule,
    /// Sponsor ticker text.
    Sponsors,
}

/// A layout's declaration that it consumes one of the live read models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSourceDecl {
    pub name: String,
    pub kind: DataSourceKind,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub options: serde_json::Map<String, serde_json::Value>,
}

/// Free-form presentation options. `theme` is first-class; everything else
/// rides along untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

/// A saved, versioned composition of positioned elements plus a playback
/// timeline.
///
/// `version` strictly increases on every persisted content change (the store
/// enforces this and keeps an immutable revision per version).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub status: LayoutStatus,
    #[serde(default = "default_version")]
    pub version: u32,
    /// Pins the layout to one event; overrides the configured default event
    /// during data payload assembly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<Id>,
    #[serde(default)]
    pub canvas: Canvas,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub timeline: Vec<Scene>,
    #[serde(default)]
    pub data_sources: Vec<DataSourceDecl>,
    #[serde(default)]
    pub options: LayoutOptions,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn default_version() -> u32 {
    1
}

impl Layout {
    /// A fresh draft layout with an empty canvas and no scenes yet.
    /// Normalization gives it its default scene before first use.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            status: LayoutStatus::Draft,
            version: 1,
            event_id: None,
            canvas: Canvas::default(),
            elements: Vec::new(),
            timeline: Vec::new(),
            data_sources: Vec::new(),
            options: LayoutOptions::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn element(&self, id: Id) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn element_mut(&mut self, id: Id) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn scene(&self, id: Id) -> Option<&Scene> {
        self.timeline.iter().find(|s| s.id == id)
    }

    pub fn scene_mut(&mut self, id: Id) -> Option<&mut Scene> {
        self.timeline.iter_mut().find(|s| s.id == id)
    }

    /// The elements a scene shows, in draw order (layer ascending, insertion
    /// order breaking ties).
    pub fn scene_elements(&self, scene: &Scene) -> Vec<&Element> {
        let mut visible: Vec<&Element> = if scene.shows_all() {
            self.elements.iter().collect()
        } else {
            self.elements
                .iter()
                .filter(|e| scene.element_ids.contains(&e.id))
                .collect()
        };
        visible.sort_by_key(|e| e.layer);
        visible
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
