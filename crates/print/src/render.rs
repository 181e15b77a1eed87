//! Document rendering: the same layout model the displays play, re-rendered
//! as fixed-size printable pages.
//!
//! Print has no live payload; the data context is the dataset record being
//! printed (one per physical copy). Runtime-only element kinds degrade:
//! clocks freeze at render time, video and live widgets print their fallback
//! text or are omitted.

use std::fmt::Write as _;

use chrono::Utc;
use serde_json::Value;

use ringside_core::binding::{resolve_path, resolve_text, value_to_text};
use ringside_core::element::{
    Binding, Element, ElementKind, ImageFit, ListElement, ListMarker, PlaceholderElement,
    ShapeElement, ShapeStyle, TableElement, TextAlign, TextStyle,
};
use ringside_core::layout::{Canvas, Layout, Scene};

use crate::markup::{escape_html, sanitize_color, sanitize_url};
use crate::paper::{content_scale, PrintOptions};

/// Render a layout into a print-ready HTML document.
///
/// One page per layout scene per dataset record, in dataset-major order; an
/// empty dataset list still renders one run so the document is never empty.
/// Bindings and placeholder keys resolve against the current record. The
/// canvas is scaled uniformly onto the paper, centered, with the bleed
/// reserved as page padding.
pub fn render_document(layout: &Layout, datasets: &[Value], options: PrintOptions) -> String {
    let options = PrintOptions {
        bleed_mm: options.bleed_mm.max(0.0),
        ..options
    };
    let scale = content_scale(&layout.canvas, options);
    let (paper_w_mm, paper_h_mm) = options.paper.dimensions_mm(options.orientation);
    let scenes = print_scenes(layout);

    let mut out = String::new();
    push_document_head(&mut out, paper_w_mm, paper_h_mm, options.bleed_mm);

    if datasets.is_empty() {
        push_run(&mut out, layout, &scenes, &Value::Null, scale);
    } else {
        for dataset in datasets {
            push_run(&mut out, layout, &scenes, dataset, scale);
        }
    }

    out.push_str("</body>\n</html>\n");

    tracing::debug!(
        layout = %layout.name,
        pages = scenes.len() * datasets.len().max(1),
        "Rendered print document"
    );
    out
}

/// The printable page list: the timeline, or one synthetic all-elements
/// scene when a layout has none.
fn print_scenes(layout: &Layout) -> Vec<Scene> {
    if layout.timeline.is_empty() {
        vec![Scene::default_all()]
    } else {
        layout.timeline.clone()
    }
}

fn push_run(out: &mut String, layout: &Layout, scenes: &[Scene], dataset: &Value, scale: f64) {
    for scene in scenes {
        push_page(out, layout, scene, dataset, scale);
    }
}

fn push_document_head(out: &mut String, paper_w_mm: f64, paper_h_mm: f64, bleed_mm: f64) {
    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html>");
    let _ = writeln!(out, "<head>");
    let _ = writeln!(out, "<meta charset=\"utf-8\">");
    let _ = writeln!(out, "<style>");
    let _ = writeln!(
        out,
        "@page {{ size: {paper_w_mm}mm {paper_h_mm}mm; margin: 0; }}"
    );
    let _ = writeln!(out, "* {{ margin: 0; padding: 0; box-sizing: border-box; }}");
    let _ = writeln!(
        out,
        ".page {{ width: {paper_w_mm}mm; height: {paper_h_mm}mm; padding: {bleed_mm}mm; \
         display: flex; align-items: center; justify-content: center; \
         page-break-after: always; overflow: hidden; background: #ffffff; }}"
    );
    let _ = writeln!(out, ".canvas {{ position: relative; overflow: hidden; }}");
    let _ = writeln!(out, ".el {{ position: absolute; overflow: hidden; }}");
    let _ = writeln!(out, ".el table {{ width: 100%; border-collapse: collapse; }}");
    let _ = writeln!(
        out,
        ".el th, .el td {{ border: 1px solid #cccccc; padding: 2px 6px; text-align: left; }}"
    );
    let _ = writeln!(out, ".el ul, .el ol {{ list-style-position: inside; }}");
    let _ = writeln!(out, "</style>");
    let _ = writeln!(out, "</head>");
    let _ = writeln!(out, "<body>");
}

fn push_page(out: &mut String, layout: &Layout, scene: &Scene, dataset: &Value, scale: f64) {
    let canvas = &layout.canvas;
    let width = canvas.width * scale;
    let height = canvas.height * scale;
    let _ = writeln!(out, "<div class=\"page\">");
    let _ = writeln!(
        out,
        "<div class=\"canvas\" style=\"width: {width:.1}px; height: {height:.1}px; \
         background: {background};\">",
        background = sanitize_color(&canvas.background),
    );
    for element in layout.scene_elements(scene) {
        push_element(out, element, canvas, dataset, scale);
    }
    let _ = writeln!(out, "</div>");
    let _ = writeln!(out, "</div>");
}

fn push_element(out: &mut String, element: &Element, canvas: &Canvas, dataset: &Value, scale: f64) {
    let Some(body) = element_markup(element, canvas, dataset, scale) else {
        tracing::debug!(label = %element.label, "Nothing to print for this element, omitted");
        return;
    };
    let frame = element.frame;
    let left = frame.x * canvas.width * scale;
    let top = frame.y * canvas.height * scale;
    let width = frame.width * canvas.width * scale;
    let height = frame.height * canvas.height * scale;
    let _ = writeln!(
        out,
        "<div class=\"el\" style=\"left: {left:.1}px; top: {top:.1}px; \
         width: {width:.1}px; height: {height:.1}px;\">{body}</div>"
    );
}

fn element_markup(element: &Element, canvas: &Canvas, dataset: &Value, scale: f64) -> Option<String> {
    let binding = element.binding.as_ref();
    match &element.kind {
        ElementKind::Text(t) => Some(text_markup(
            &resolve_text(dataset, binding, &t.text),
            &t.style,
            canvas,
            scale,
        )),
        ElementKind::Ticker(t) => Some(text_markup(
            &resolve_text(dataset, binding, &t.text),
            &t.style,
            canvas,
            scale,
        )),
        ElementKind::Placeholder(p) => Some(text_markup(
            &placeholder_text(p, binding, dataset),
            &p.style,
            canvas,
            scale,
        )),
        ElementKind::Clock(c) => Some(text_markup(
            &clock_timestamp(&c.format),
            &c.style,
            canvas,
            scale,
        )),
        ElementKind::Image(i) => image_markup(&resolve_text(dataset, binding, &i.url), i.fit),
        ElementKind::Shape(s) => Some(shape_markup(s, canvas, scale)),
        ElementKind::Table(t) => Some(table_markup(t, canvas, scale)),
        ElementKind::List(l) => Some(list_markup(l, binding, dataset, canvas, scale)),
        ElementKind::Video(_) => {
            fallback_text(element).map(|t| text_markup(&t, &TextStyle::default(), canvas, scale))
        }
        ElementKind::Live(l) => {
            fallback_text(element).map(|t| text_markup(&t, &l.style, canvas, scale))
        }
    }
}

/// A placeholder's text: the dataset field named by its key, else its
/// binding, else the key itself so a missing field is visible on the proof.
fn placeholder_text(p: &PlaceholderElement, binding: Option<&Binding>, dataset: &Value) -> String {
    if let Some(text) = resolve_path(dataset, &p.key).and_then(value_to_text) {
        return text;
    }
    resolve_text(dataset, binding, &p.key)
}

/// Print freezes the clock at render time. Bad strftime strings surface as
/// `fmt` errors, which fall back to a plain date-time.
fn clock_timestamp(format: &str) -> String {
    let now = Utc::now();
    let mut out = String::new();
    if write!(out, "{}", now.format(format)).is_err() {
        return now.format("%Y-%m-%d %H:%M").to_string();
    }
    out
}

fn fallback_text(element: &Element) -> Option<String> {
    element.binding.as_ref()?.fallback.clone()
}

// ---------------------------------------------------------------------------
// Per-kind markup
// ---------------------------------------------------------------------------

fn text_markup(text: &str, style: &TextStyle, canvas: &Canvas, scale: f64) -> String {
    format!(
        "<div style=\"{}\">{}</div>",
        text_style_css(style, canvas, scale),
        escape_html(text)
    )
}

fn image_markup(url: &str, fit: ImageFit) -> Option<String> {
    let url = sanitize_url(url)?;
    Some(format!(
        "<img src=\"{}\" style=\"width: 100%; height: 100%; object-fit: {};\">",
        escape_html(url),
        fit_css(fit)
    ))
}

fn shape_markup(shape: &ShapeElement, canvas: &Canvas, scale: f64) -> String {
    let radius = match shape.shape {
        ShapeStyle::Ellipse => "border-radius: 50%;".to_string(),
        ShapeStyle::Rectangle if shape.corner_radius > 0.0 => {
            format!(
                "border-radius: {:.1}px;",
                shape.corner_radius * canvas.height * scale
            )
        }
        ShapeStyle::Rectangle => String::new(),
    };
    format!(
        "<div style=\"width: 100%; height: 100%; background: {};{radius}\"></div>",
        sanitize_color(&shape.fill),
    )
}

fn table_markup(table: &TableElement, canvas: &Canvas, scale: f64) -> String {
    let mut html = format!(
        "<table style=\"{}\">",
        text_style_css(&table.style, canvas, scale)
    );
    if let Some(header) = &table.header {
        html.push_str("<tr>");
        for cell in header {
            let _ = write!(html, "<th>{}</th>", escape_html(cell));
        }
        html.push_str("</tr>");
    }
    for row in table.rows.to_rows() {
        html.push_str("<tr>");
        for cell in row {
            let _ = write!(html, "<td>{}</td>", escape_html(&cell));
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");
    html
}

fn list_markup(
    list: &ListElement,
    binding: Option<&Binding>,
    dataset: &Value,
    canvas: &Canvas,
    scale: f64,
) -> String {
    let items = bound_items(binding, dataset).unwrap_or_else(|| list.items.clone());
    let tag = match list.marker {
        ListMarker::Numbered => "ol",
        ListMarker::Bullet | ListMarker::Plain => "ul",
    };
    let plain = if matches!(list.marker, ListMarker::Plain) {
        " list-style-type: none;"
    } else {
        ""
    };
    let mut html = format!(
        "<{tag} style=\"{}{plain}\">",
        text_style_css(&list.style, canvas, scale)
    );
    for item in &items {
        let _ = write!(html, "<li>{}</li>", escape_html(item));
    }
    let _ = write!(html, "</{tag}>");
    html
}

/// A binding that resolves to an array in the dataset yields one list item
/// per entry; anything else falls back to the static items.
fn bound_items(binding: Option<&Binding>, dataset: &Value) -> Option<Vec<String>> {
    match resolve_path(dataset, &binding?.path)? {
        Value::Array(values) => Some(values.iter().filter_map(value_to_text).collect()),
        _ => None,
    }
}

fn text_style_css(style: &TextStyle, canvas: &Canvas, scale: f64) -> String {
    let size = style.size * canvas.height * scale;
    format!(
        "font-size: {size:.1}px; color: {color}; text-align: {align};{bold}",
        color = sanitize_color(&style.color),
        align = align_css(style.align),
        bold = if style.bold { " font-weight: bold;" } else { "" },
    )
}

fn align_css(align: TextAlign) -> &'static str {
    match align {
        TextAlign::Left => "left",
        TextAlign::Center => "center",
        TextAlign::Right => "right",
    }
}

fn fit_css(fit: ImageFit) -> &'static str {
    match fit {
        ImageFit::Contain => "contain",
        ImageFit::Cover => "cover",
        ImageFit::Fill => "fill",
    }
}
