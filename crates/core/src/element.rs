//! Positioned layout elements: the typed widget union, fractional frames,
//! and live-data bindings.
//!
//! Elements carry their static content inline; when a binding resolves at
//! playback time the resolved value wins, otherwise the binding fallback,
//! otherwise the static content (in that precedence order).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Id;

// ---------------------------------------------------------------------------
// Frame (fractional canvas coordinates)
// ---------------------------------------------------------------------------

/// Smallest width/height an element may have, as a fraction of the canvas.
///
/// Gesture handling converts a pixel threshold into a fraction at the current
/// rendered size, but this floor always applies so a persisted element can
/// never collapse to zero.
pub const MIN_SIZE_FRAC: f64 = 0.01;

/// An element's position and size, as fractions of the canvas in `[0, 1]`.
///
/// Invariant (enforced by [`Frame::clamped`]): `x + width <= 1`,
/// `y + height <= 1`, and both dimensions are at least [`MIN_SIZE_FRAC`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
        .clamped()
    }

    /// Return a copy clamped into the unit square with the minimum size floor
    /// applied. Non-finite inputs collapse to the floor.
    pub fn clamped(self) -> Self {
        let sanitize = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };

        let width = sanitize(self.width, MIN_SIZE_FRAC).clamp(MIN_SIZE_FRAC, 1.0);
        let height = sanitize(self.height, MIN_SIZE_FRAC).clamp(MIN_SIZE_FRAC, 1.0);
        let x = sanitize(self.x, 0.0).clamp(0.0, 1.0 - width);
        let y = sanitize(self.y, 0.0).clamp(0.0, 1.0 - height);

        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Aspect ratio as height / width.
    pub fn ratio(&self) -> f64 {
        self.height / self.width
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new(0.25, 0.25, 0.5, 0.2)
    }
}

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

/// A live-data binding: a dot-separated path into the player data payload
/// plus an optional fallback rendered when the path does not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

impl Binding {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            fallback: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Shared style fragments
// ---------------------------------------------------------------------------

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Style shared by the text-like element kinds.
///
/// `size` is a fraction of the canvas height so layouts stay
/// resolution-independent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    #[serde(default = "default_text_size")]
    pub size: f64,
    #[serde(default = "default_text_color")]
    pub color: String,
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default)]
    pub bold: bool,
}

fn default_text_size() -> f64 {
    0.05
}

fn default_text_color() -> String {
    "#ffffff".to_string()
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: default_text_size(),
            color: default_text_color(),
            align: TextAlign::default(),
            bold: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-kind payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub style: TextStyle,
}

/// How an image fills its frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFit {
    #[default]
    Contain,
    Cover,
    Fill,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageElement {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub fit: ImageFit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeStyle {
    #[default]
    Rectangle,
    Ellipse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeElement {
    #[serde(default)]
    pub shape: ShapeStyle,
    #[serde(default = "default_shape_fill")]
    pub fill: String,
    /// Corner radius as a fraction of the canvas height (rectangles only).
    #[serde(default)]
    pub corner_radius: f64,
}

fn default_shape_fill() -> String {
    "#333333".to_string()
}

impl Default for ShapeElement {
    fn default() -> Self {
        Self {
            shape: ShapeStyle::default(),
            fill: default_shape_fill(),
            corner_radius: 0.0,
        }
    }
}

/// Table rows: either structured cell lists or a literal bar-delimited block
/// (`cell | cell | cell` per line, blank lines skipped).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableRows {
    Structured(Vec<Vec<String>>),
    Literal(String),
}

impl Default for TableRows {
    fn default() -> Self {
        Self::Structured(Vec::new())
    }
}

impl TableRows {
    /// Canonical row list, parsing the literal form line by line.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        match self {
            Self::Structured(rows) => rows.clone(),
            Self::Literal(text) => parse_bar_rows(text),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Structured(rows) => rows.is_empty(),
            Self::Literal(text) => text.lines().all(|l| l.trim().is_empty()),
        }
    }
}

/// Parse the literal bar-delimited table format. Blank lines are skipped;
/// cells are trimmed.
pub fn parse_bar_rows(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split('|').map(|cell| cell.trim().to_string()).collect())
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Vec<String>>,
    #[serde(default)]
    pub rows: TableRows,
    #[serde(default)]
    pub style: TextStyle,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListMarker {
    #[default]
    Bullet,
    Numbered,
    Plain,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListElement {
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub marker: ListMarker,
    #[serde(default)]
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerElement {
    #[serde(default)]
    pub text: String,
    /// Relative scroll speed; 1.0 is the default pace.
    #[serde(default = "default_ticker_speed")]
    pub speed: f64,
    #[serde(default)]
    pub style: TextStyle,
}

fn default_ticker_speed() -> f64 {
    1.0
}

impl Default for TickerElement {
    fn default() -> Self {
        Self {
            text: String::new(),
            speed: default_ticker_speed(),
            style: TextStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockElement {
    /// `chrono` strftime format for the displayed time.
    #[serde(default = "default_clock_format")]
    pub format: String,
    #[serde(default)]
    pub style: TextStyle,
}

fn default_clock_format() -> String {
    "%H:%M:%S".to_string()
}

impl Default for ClockElement {
    fn default() -> Self {
        Self {
            format: default_clock_format(),
            style: TextStyle::default(),
        }
    }
}

/// A named slot filled per record at print time (e.g. one certificate per
/// recipient) or via the element binding during playback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderElement {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub style: TextStyle,
}

/// Explicitly declared video providers. URLs that arrive without a provider
/// are pattern-matched at playback time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoProvider {
    /// Hosted HLS/DASH stream URL.
    Stream,
    Youtube,
    Vimeo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<VideoProvider>,
    /// Platform video id when `provider` is a remote platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    #[serde(default = "default_true")]
    pub muted: bool,
    #[serde(rename = "loop", default = "default_true")]
    pub looped: bool,
}

fn default_true() -> bool {
    true
}

impl Default for VideoElement {
    fn default() -> Self {
        Self {
            url: None,
            provider: None,
            provider_id: None,
            muted: true,
            looped: true,
        }
    }
}

/// Which slice of the live data payload a live widget renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiveView {
    /// The entry currently in the ring.
    #[default]
    Current,
    /// The next scheduled entries.
    Next,
    /// The ranked released results.
    Top,
    /// Upcoming timetable entries.
    Schedule,
    /// Sponsor ticker messages.
    Sponsors,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveElement {
    #[serde(default)]
    pub view: LiveView,
    #[serde(default = "default_live_limit")]
    pub limit: usize,
    #[serde(default)]
    pub style: TextStyle,
}

fn default_live_limit() -> usize {
    10
}

impl Default for LiveElement {
    fn default() -> Self {
        Self {
            view: LiveView::default(),
            limit: default_live_limit(),
            style: TextStyle::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// ElementKind (tagged union)
// ---------------------------------------------------------------------------

/// The typed widget union, tagged by `type` on the wire.
///
/// Represented as a variant per widget rather than an untyped map so the
/// renderer match is exhaustive at compile time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    Text(TextElement),
    Image(ImageElement),
    Shape(ShapeElement),
    Table(TableElement),
    List(ListElement),
    Ticker(TickerElement),
    Clock(ClockElement),
    Placeholder(PlaceholderElement),
    Video(VideoElement),
    Live(LiveElement),
}

/// A bare element type discriminant, used by the authoring `add_element`
/// operation and anywhere a kind is named without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Text,
    Image,
    Shape,
    Table,
    List,
    Ticker,
    Clock,
    Placeholder,
    Video,
    Live,
}

impl ElementKind {
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Text(_) => ElementType::Text,
            Self::Image(_) => ElementType::Image,
            Self::Shape(_) => ElementType::Shape,
            Self::Table(_) => ElementType::Table,
            Self::List(_) => ElementType::List,
            Self::Ticker(_) => ElementType::Ticker,
            Self::Clock(_) => ElementType::Clock,
            Self::Placeholder(_) => ElementType::Placeholder,
            Self::Video(_) => ElementType::Video,
            Self::Live(_) => ElementType::Live,
        }
    }

    /// The static fallback text an element of this kind carries, if any.
    pub fn static_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(&t.text),
            Self::Ticker(t) => Some(&t.text),
            Self::Placeholder(p) => Some(&p.key),
            _ => None,
        }
    }
}

impl ElementType {
    /// Wire name of the type tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Shape => "shape",
            Self::Table => "table",
            Self::List => "list",
            Self::Ticker => "ticker",
            Self::Clock => "clock",
            Self::Placeholder => "placeholder",
            Self::Video => "video",
            Self::Live => "live",
        }
    }
}

// ---------------------------------------------------------------------------
// Element
// ---------------------------------------------------------------------------

/// One positioned, typed widget within a layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: Id,
    #[serde(default)]
    pub label: String,
    /// Open integer draw ordering; higher draws on top. Never renumbered.
    #[serde(default)]
    pub layer: i32,
    pub frame: Frame,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding: Option<Binding>,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    /// Instantiate the authoring defaults for a widget type: a type-specific
    /// frame and style, a human label, and a binding skeleton where a
    /// freshly added widget is usually bound.
    pub fn with_defaults(ty: ElementType) -> Self {
        let (frame, kind, binding) = match ty {
            ElementType::Text => (
                Frame::new(0.1, 0.1, 0.8, 0.12),
                ElementKind::Text(TextElement {
                    text: "Text".to_string(),
                    style: TextStyle::default(),
                }),
                None,
            ),
            ElementType::Image => (
                Frame::new(0.3, 0.25, 0.4, 0.5),
                ElementKind::Image(ImageElement::default()),
                None,
            ),
            ElementType::Shape => (
                Frame::new(0.1, 0.1, 0.3, 0.3),
                ElementKind::Shape(ShapeElement::default()),
                None,
            ),
            ElementType::Table => (
                Frame::new(0.1, 0.3, 0.8, 0.5),
                ElementKind::Table(TableElement::default()),
                Some(Binding::new("live.top")),
            ),
            ElementType::List => (
                Frame::new(0.1, 0.3, 0.35, 0.5),
                ElementKind::List(ListElement::default()),
                Some(Binding::new("schedule.upcoming")),
            ),
            ElementType::Ticker => (
                Frame::new(0.0, 0.92, 1.0, 0.08),
                ElementKind::Ticker(TickerElement::default()),
                Some(Binding::new("sponsors.messages")),
            ),
            ElementType::Clock => (
                Frame::new(0.8, 0.02, 0.18, 0.08),
                ElementKind::Clock(ClockElement::default()),
                Some(Binding::new("clock.iso")),
            ),
            ElementType::Placeholder => (
                Frame::new(0.1, 0.4, 0.8, 0.15),
                ElementKind::Placeholder(PlaceholderElement::default()),
                None,
            ),
            ElementType::Video => (
                Frame::new(0.25, 0.25, 0.5, 0.5),
                ElementKind::Video(VideoElement::default()),
                None,
            ),
            ElementType::Live => (
                Frame::new(0.05, 0.2, 0.9, 0.6),
                ElementKind::Live(LiveElement::default()),
                Some(Binding::new("live.current")),
            ),
        };

        Self {
            id: Uuid::new_v4(),
            label: format!("New {}", ty.as_str()),
            layer: 0,
            frame,
            binding,
            kind,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Frame clamping ------------------------------------------------------

    #[test]
    fn frame_clamps_into_unit_square() {
        let f = Frame {
            x: 0.9,
            y: -0.2,
            width: 0.5,
            height: 0.3,
        }
        .clamped();
        assert_eq!(f.x, 0.5);
        assert_eq!(f.y, 0.0);
        assert!(f.x + f.width <= 1.0);
        assert!(f.y + f.height <= 1.0);
    }

    #[test]
    fn frame_enforces_minimum_size() {
        let f = Frame {
            x: 0.5,
            y: 0.5,
            width: 0.0,
            height: -3.0,
        }
        .clamped();
        assert_eq!(f.width, MIN_SIZE_FRAC);
        assert_eq!(f.height, MIN_SIZE_FRAC);
    }

    #[test]
    fn frame_survives_non_finite_input() {
        let f = Frame {
            x: f64::NAN,
            y: f64::INFINITY,
            width: f64::NAN,
            height: 0.5,
        }
        .clamped();
        assert!(f.x.is_finite() && f.y.is_finite() && f.width.is_finite());
    }

    #[test]
    fn oversized_frame_fills_canvas() {
        let f = Frame {
            x: 0.0,
            y: 0.0,
            width: 4.0,
            height: 2.0,
        }
        .clamped();
        assert_eq!((f.width, f.height), (1.0, 1.0));
        assert_eq!((f.x, f.y), (0.0, 0.0));
    }

    // -- Bar-delimited table parsing -----------------------------------------

    #[test]
    fn bar_rows_parse_and_trim() {
        let rows = parse_bar_rows("1 | Alice | 98.5\n\n2 | Bob | 93.0\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["1", "Alice", "98.5"]);
        assert_eq!(rows[1], vec!["2", "Bob", "93.0"]);
    }

    #[test]
    fn bar_rows_single_cell_lines() {
        let rows = parse_bar_rows("only one cell");
        assert_eq!(rows, vec![vec!["only one cell".to_string()]]);
    }

    #[test]
    fn literal_table_rows_roundtrip_via_to_rows() {
        let rows = TableRows::Literal("a|b\nc|d".to_string());
        assert_eq!(
            rows.to_rows(),
            vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["c".to_string(), "d".to_string()]
            ]
        );
    }

    // -- Serde shape ---------------------------------------------------------

    #[test]
    fn element_serializes_with_type_tag() {
        let el = Element::with_defaults(ElementType::Text);
        let json = serde_json::to_value(&el).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["text"], "Text");
        assert!(json["frame"]["width"].is_number());
    }

    #[test]
    fn element_deserializes_each_type_tag() {
        for ty in [
            "text",
            "image",
            "shape",
            "table",
            "list",
            "ticker",
            "clock",
            "placeholder",
            "video",
            "live",
        ] {
            let json = serde_json::json!({
                "id": uuid::Uuid::new_v4(),
                "frame": { "x": 0.1, "y": 0.1, "width": 0.5, "height": 0.2 },
                "type": ty,
            });
            let el: Element = serde_json::from_value(json).unwrap();
            assert_eq!(el.kind.element_type().as_str(), ty);
        }
    }

    #[test]
    fn unknown_type_tag_is_rejected() {
        let json = serde_json::json!({
            "id": uuid::Uuid::new_v4(),
            "frame": { "x": 0.0, "y": 0.0, "width": 0.5, "height": 0.5 },
            "type": "hologram",
        });
        assert!(serde_json::from_value::<Element>(json).is_err());
    }

    #[test]
    fn defaults_are_sane_for_every_type() {
        for ty in [
            ElementType::Text,
            ElementType::Image,
            ElementType::Shape,
            ElementType::Table,
            ElementType::List,
            ElementType::Ticker,
            ElementType::Clock,
            ElementType::Placeholder,
            ElementType::Video,
            ElementType::Live,
        ] {
            let el = Element::with_defaults(ty);
            assert_eq!(el.kind.element_type(), ty);
            let f = el.frame;
            assert!(f.x >= 0.0 && f.y >= 0.0);
            assert!(f.x + f.width <= 1.0 + 1e-9);
            assert!(f.y + f.height <= 1.0 + 1e-9);
        }
    }
}
