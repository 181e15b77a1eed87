//! Scene rendering: resolve a layout's scene against the live data payload
//! into a frame a [`FrameSink`](crate::sink::FrameSink) can draw.
//!
//! Resolution never fails: every binding degrades through its fallback to
//! the element's static content, so a frame always comes out the other end.

use serde_json::Value;

use ringside_core::binding::{resolve_path, resolve_text, value_to_text};
use ringside_core::element::{
    Binding, Element, ElementKind, ElementType, Frame, ListElement, LiveElement, LiveView,
    TableElement,
};
use ringside_core::layout::{Canvas, Layout, Scene};
use ringside_core::player::{DataPayload, RankedResult, RunInfo, ScheduleEntry};
use ringside_core::types::{Id, Timestamp};

use crate::video::{self, VideoSource};

/// A fully resolved scene, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFrame {
    pub layout_id: Id,
    pub layout_name: String,
    pub scene_id: Id,
    pub scene_name: String,
    pub canvas: Canvas,
    /// Elements in draw order, layer ascending.
    pub elements: Vec<RenderedElement>,
}

impl SceneFrame {
    /// Whether the frame needs the per-second clock repaint.
    pub fn has_clock(&self) -> bool {
        self.elements.iter().any(|e| e.kind == ElementType::Clock)
    }
}

/// One element resolved for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedElement {
    pub id: Id,
    pub label: String,
    pub kind: ElementType,
    pub layer: i32,
    pub frame: Frame,
    pub content: RenderedContent,
}

/// What an element resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedContent {
    Text(String),
    Image { url: String },
    Shape { fill: String },
    Table { header: Option<Vec<String>>, rows: Vec<Vec<String>> },
    List(Vec<String>),
    Video(VideoSource),
    /// Nothing to draw for this element in this payload.
    Empty,
}

/// Resolve one scene of a layout against the payload.
///
/// `now` feeds clock elements; pass the ticking player clock, not the wall
/// clock, so displayed time tracks the server.
pub fn render_scene(layout: &Layout, scene: &Scene, payload: &DataPayload, now: Timestamp) -> SceneFrame {
    let data = payload.as_value();
    let elements = layout
        .scene_elements(scene)
        .into_iter()
        .map(|el| render_element(el, payload, &data, now))
        .collect();

    SceneFrame {
        layout_id: layout.id,
        layout_name: layout.name.clone(),
        scene_id: scene.id,
        scene_name: scene.name.clone(),
        canvas: layout.canvas.clone(),
        elements,
    }
}

fn render_element(el: &Element, payload: &DataPayload, data: &Value, now: Timestamp) -> RenderedElement {
    let binding = el.binding.as_ref();
    let content = match &el.kind {
        ElementKind::Text(t) => RenderedContent::Text(resolve_text(data, binding, &t.text)),
        ElementKind::Ticker(t) => RenderedContent::Text(resolve_text(data, binding, &t.text)),
        ElementKind::Placeholder(p) => RenderedContent::Text(resolve_text(data, binding, &p.key)),
        ElementKind::Clock(c) => RenderedContent::Text(format_clock(now, &c.format)),
        ElementKind::Image(i) => RenderedContent::Image {
            url: resolve_text(data, binding, &i.url),
        },
        ElementKind::Shape(s) => RenderedContent::Shape {
            fill: s.fill.clone(),
        },
        ElementKind::Table(t) => render_table(t, binding, data),
        ElementKind::List(l) => render_list(l, binding, data),
        ElementKind::Video(v) => RenderedContent::Video(video::resolve_source(
            v,
            binding.and_then(|b| b.fallback.as_deref()),
        )),
        ElementKind::Live(l) => render_live(l, binding, payload),
    };

    RenderedElement {
        id: el.id,
        label: el.label.clone(),
        kind: el.kind.element_type(),
        layer: el.layer,
        frame: el.frame,
        content,
    }
}

/// Format a timestamp with a user-supplied strftime string, falling back to
/// `%H:%M:%S` when the format itself is broken.
fn format_clock(now: Timestamp, format: &str) -> String {
    use std::fmt::Write;
    let mut out = String::new();
    match write!(out, "{}", now.format(format)) {
        Ok(()) => out,
        Err(_) => now.format("%H:%M:%S").to_string(),
    }
}

/// A bound table takes its rows from the payload when the path resolves to a
/// non-empty sequence; its static rows otherwise.
fn render_table(t: &TableElement, binding: Option<&Binding>, data: &Value) -> RenderedContent {
    if let Some(b) = binding {
        if let Some(Value::Array(items)) = resolve_path(data, &b.path) {
            let rows: Vec<Vec<String>> = items.iter().map(json_row).collect();
            if !rows.is_empty() {
                return RenderedContent::Table {
                    header: t.header.clone(),
                    rows,
                };
            }
        }
    }
    RenderedContent::Table {
        header: t.header.clone(),
        rows: t.rows.to_rows(),
    }
}

/// Flatten one payload row into cells: objects contribute their values in
/// key order, scalars become a single cell.
fn json_row(value: &Value) -> Vec<String> {
    match value {
        Value::Object(map) => map.values().filter_map(value_to_text).collect(),
        other => vec![value_to_text(other).unwrap_or_default()],
    }
}

fn render_list(l: &ListElement, binding: Option<&Binding>, data: &Value) -> RenderedContent {
    if let Some(b) = binding {
        if let Some(Value::Array(items)) = resolve_path(data, &b.path) {
            let lines: Vec<String> = items.iter().filter_map(list_line).collect();
            if !lines.is_empty() {
                return RenderedContent::List(lines);
            }
        }
        if let Some(fallback) = &b.fallback {
            return RenderedContent::List(vec![fallback.clone()]);
        }
    }
    RenderedContent::List(l.items.clone())
}

/// One list line per payload entry. Objects join their values; nulls drop.
fn list_line(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => {
            let parts: Vec<String> = map.values().filter_map(value_to_text).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        other => value_to_text(other),
    }
}

/// Live widgets render their declared slice of the payload; an empty slice
/// degrades to the binding fallback, then to nothing.
fn render_live(l: &LiveElement, binding: Option<&Binding>, payload: &DataPayload) -> RenderedContent {
    let lines: Vec<String> = match l.view {
        LiveView::Current => payload.live.current.iter().map(run_line).collect(),
        LiveView::Next => payload.live.next.iter().take(l.limit).map(run_line).collect(),
        LiveView::Top => payload.live.top.iter().take(l.limit).map(result_line).collect(),
        LiveView::Schedule => payload
            .schedule
            .upcoming
            .iter()
            .take(l.limit)
            .map(schedule_line)
            .collect(),
        LiveView::Sponsors => payload
            .sponsors
            .messages
            .iter()
            .take(l.limit)
            .cloned()
            .collect(),
    };

    if lines.is_empty() {
        if let Some(fallback) = binding.and_then(|b| b.fallback.clone()) {
            return RenderedContent::Text(fallback);
        }
        return RenderedContent::Empty;
    }
    RenderedContent::List(lines)
}

fn run_line(run: &RunInfo) -> String {
    match &run.entry {
        Some(entry) => format!("{} ({entry})", run.competitor),
        None => run.competitor.clone(),
    }
}

fn result_line(row: &RankedResult) -> String {
    format!("{}. {} {:.1}", row.rank, row.competitor, row.score)
}

fn schedule_line(entry: &ScheduleEntry) -> String {
    let when = entry.starts_at.format("%H:%M");
    match &entry.ring {
        Some(ring) => format!("{when} {} ({ring})", entry.title),
        None => format!("{when} {}", entry.title),
    }
}
