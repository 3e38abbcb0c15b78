//! Write values and path helpers shared by every backend.

use serde_json::{json, Value};

/// Placeholder values that the backend resolves at write time.
pub struct ServerValue;

impl ServerValue {
    const SENTINEL_KEY: &'static str = ".sv";

    /// The server-timestamp sentinel: replaced by the backend's clock (in
    /// milliseconds) when the write is applied.
    pub fn timestamp() -> Value {
        json!({ Self::SENTINEL_KEY: "timestamp" })
    }

    /// Returns true if `value` is the server-timestamp sentinel.
    pub fn is_timestamp(value: &Value) -> bool {
        value
            .as_object()
            .and_then(|obj| obj.get(Self::SENTINEL_KEY))
            .and_then(Value::as_str)
            == Some("timestamp")
    }
}

/// Splits a slash-separated path into its non-empty segments.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Joins `child` onto `parent`.
pub fn child(parent: &str, child: &str) -> String {
    let parent = parent.trim_end_matches('/');
    let child = child.trim_start_matches('/');
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{}/{}", parent, child)
    }
}

/// Returns true if one path is an ancestor of (or equal to) the other.
pub fn overlaps(a: &str, b: &str) -> bool {
    segments(a).zip(segments(b)).all(|(x, y)| x == y)
}
