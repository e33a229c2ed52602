//! Safe navigation through the registry's deeply nested, mostly optional JSON.

use serde_json::Value;

/// Walk `path` (dot separated) from `doc`. Numeric segments index into arrays.
///
/// Returns `None` as soon as a segment is missing, `null`, or the current node has the wrong
/// shape, so callers never have to chain their own checks.
pub fn get_path<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|seg| !seg.is_empty())
        .try_fold(doc, |node, seg| match node {
            Value::Object(map) => map.get(seg),
            Value::Array(items) => seg.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
        .filter(|v| !v.is_null())
}

/// Text at `path`, or `default` when the value is absent, empty or not scalar text.
///
/// Numbers are rendered as text, since the registry is not consistent about years and
/// put-codes.
pub fn text_at(doc: &Value, path: &str, default: &str) -> String {
    match get_path(doc, path) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => default.to_string(),
    }
}

/// Elements of the array at `path`; anything else reads as empty.
pub fn items_at<'a>(doc: &'a Value, path: &str) -> &'a [Value] {
    get_path(doc, path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}
