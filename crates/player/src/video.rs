//! Video source resolution.
//!
//! A video element may name its provider outright, carry a bare URL, or
//! carry nothing usable. Resolution follows that order: explicit provider,
//! URL pattern match against the known platforms, direct media or generic
//! embed URL, fallback text. Only `http`/`https` URLs are ever embedded.

use std::sync::LazyLock;

use regex::Regex;
use ringside_core::element::{VideoElement, VideoProvider};

/// Shown when nothing about the element yields a playable source.
const UNAVAILABLE_TEXT: &str = "Video unavailable";

/// File extensions treated as directly playable media.
const MEDIA_EXTENSIONS: [&str; 5] = ["mp4", "webm", "ogv", "mov", "m3u8"];

/// Matches watch, short-link, and embed URL forms; captures the video id.
static YOUTUBE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:youtube\.com/watch\?v=|youtube\.com/embed/|youtu\.be/)([A-Za-z0-9_-]{11})")
        .expect("valid regex")
});

static VIMEO_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"vimeo\.com/(\d+)").expect("valid regex"));

/// Characters allowed in a platform video id before it is embedded in a URL.
static VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid regex"));

/// A playable video source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    /// Raw media or stream URL, playable without an embed shell.
    Direct { url: String },
    /// Platform player URL to load in an embed surface.
    Embed { url: String },
    /// Nothing playable; show this text instead.
    Fallback { text: String },
}

/// Resolve an element's provider/URL fields into a playable source.
///
/// `fallback` is the element's binding fallback, rendered when resolution
/// comes up empty.
pub fn resolve_source(el: &VideoElement, fallback: Option<&str>) -> VideoSource {
    if let Some(source) = explicit_provider(el).or_else(|| from_url(el)) {
        return source;
    }
    VideoSource::Fallback {
        text: fallback.unwrap_or(UNAVAILABLE_TEXT).to_string(),
    }
}

/// Resolve via the element's declared provider. Returns `None` when the
/// declaration is incomplete so URL pattern matching gets its turn.
fn explicit_provider(el: &VideoElement) -> Option<VideoSource> {
    match el.provider? {
        VideoProvider::Stream => {
            let url = el.url.as_deref().filter(|u| is_web_url(u))?;
            Some(VideoSource::Direct {
                url: url.to_string(),
            })
        }
        VideoProvider::Youtube => {
            let id = el.provider_id.as_deref().filter(|id| VIDEO_ID_RE.is_match(id))?;
            Some(VideoSource::Embed {
                url: youtube_embed(id, el),
            })
        }
        VideoProvider::Vimeo => {
            let id = el
                .provider_id
                .as_deref()
                .filter(|id| id.chars().all(|c| c.is_ascii_digit()) && !id.is_empty())?;
            Some(VideoSource::Embed {
                url: vimeo_embed(id, el),
            })
        }
    }
}

/// Resolve from the bare URL: known platform patterns first, then direct
/// media by extension, then a generic embed.
fn from_url(el: &VideoElement) -> Option<VideoSource> {
    let url = el.url.as_deref()?;
    if !is_web_url(url) {
        return None;
    }

    if let Some(caps) = YOUTUBE_URL_RE.captures(url) {
        return Some(VideoSource::Embed {
            url: youtube_embed(&caps[1], el),
        });
    }
    if let Some(caps) = VIMEO_URL_RE.captures(url) {
        return Some(VideoSource::Embed {
            url: vimeo_embed(&caps[1], el),
        });
    }
    if has_media_extension(url) {
        return Some(VideoSource::Direct {
            url: url.to_string(),
        });
    }
    Some(VideoSource::Embed {
        url: url.to_string(),
    })
}

fn youtube_embed(id: &str, el: &VideoElement) -> String {
    let mut url = format!(
        "https://www.youtube.com/embed/{id}?autoplay=1&mute={}",
        el.muted as u8
    );
    if el.looped {
        // YouTube only loops when a playlist parameter names the same video.
        url.push_str(&format!("&loop=1&playlist={id}"));
    }
    url
}

fn vimeo_embed(id: &str, el: &VideoElement) -> String {
    format!(
        "https://player.vimeo.com/video/{id}?autoplay=1&muted={}&loop={}",
        el.muted as u8, el.looped as u8
    )
}

fn is_web_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn has_media_extension(url: &str) -> bool {
    // Extension check against the path only, not the query string.
    let path = url.split(['?', '#']).next().unwrap_or(url);
    match path.rsplit('.').next() {
        Some(ext) => MEDIA_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known)),
        None => false,
    }
}
