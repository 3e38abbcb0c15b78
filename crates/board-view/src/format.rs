//! Text formatting helpers.

use chrono::DateTime;

/// Escapes the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

/// Formats a millisecond timestamp as `YYYY/MM/DD HH:MM` (UTC).
///
/// Out-of-range values render as an empty string.
pub fn format_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|at| at.format("%Y/%m/%d %H:%M").to_string())
        .unwrap_or_default()
}
