//! Dot-path resolution of element bindings against a JSON data payload.
//!
//! Paths walk nested mappings by key and sequences by numeric index, e.g.
//! `live.top.0.competitor`. Resolution never fails loudly: an unresolved or
//! null path degrades to the binding fallback, then to the element's static
//! content.

use serde_json::Value;

use crate::element::Binding;

/// Resolve a dot-separated path against a JSON value.
///
/// Returns `None` for an empty path, a missing key/index, or a traversal
/// into a scalar.
pub fn resolve_path<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut current = data;
    for segment in trimmed.split('.') {
        let segment = segment.trim();
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => {
                let idx: usize = segment.parse().ok()?;
                items.get(idx)?
            }
            _ => return None,
        };
    }
    Some(current)
}

/// Render a resolved JSON value as display text.
///
/// Strings pass through unquoted; string arrays join with `", "`; `null`
/// yields `None` so the caller falls back.
pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) if items.iter().all(Value::is_string) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other => Some(other.to_string()),
    }
}

/// Full binding precedence: resolved path value, then the binding fallback,
/// then the element's static content.
pub fn resolve_text(data: &Value, binding: Option<&Binding>, content: &str) -> String {
    if let Some(b) = binding {
        if let Some(text) = resolve_path(data, &b.path).and_then(value_to_text) {
            return text;
        }
        if let Some(fallback) = &b.fallback {
            return fallback.clone();
        }
    }
    content.to_string()
}
