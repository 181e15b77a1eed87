//! Where rendered frames go.
//!
//! The runtime hands every [`SceneFrame`] to a [`FrameSink`]. The shipped
//! [`LogSink`] writes frames to the log; display hardware plugs its pixel
//! pipeline in here.

use crate::render::{RenderedContent, SceneFrame};
use crate::video::VideoSource;

pub trait FrameSink: Send + Sync {
    fn show(&self, frame: &SceneFrame);
}

/// Logs each frame and its resolved elements.
pub struct LogSink;

impl FrameSink for LogSink {
    fn show(&self, frame: &SceneFrame) {
        tracing::info!(
            layout = %frame.layout_name,
            scene = %frame.scene_name,
            elements = frame.elements.len(),
            "Showing scene"
        );
        for el in &frame.elements {
            tracing::debug!(
                label = %el.label,
                kind = el.kind.as_str(),
                layer = el.layer,
                content = %content_summary(&el.content),
                "Resolved element"
            );
        }
    }
}

/// One log line's worth of resolved content.
fn content_summary(content: &RenderedContent) -> String {
    match content {
        RenderedContent::Text(text) => text.clone(),
        RenderedContent::Image { url } => format!("image {url}"),
        RenderedContent::Shape { fill } => format!("shape {fill}"),
        RenderedContent::Table { rows, .. } => format!("table with {} rows", rows.len()),
        RenderedContent::List(lines) => lines.join(" / "),
        RenderedContent::Video(VideoSource::Direct { url }) => format!("video {url}"),
        RenderedContent::Video(VideoSource::Embed { url }) => format!("embed {url}"),
        RenderedContent::Video(VideoSource::Fallback { text }) => text.clone(),
        RenderedContent::Empty => "(empty)".to_string(),
    }
}
