//! Hashtag extraction.
//!
//! A hashtag is `#` followed by a run of characters that are neither
//! whitespace nor `#`. Tags are case-folded and kept in order of appearance,
//! duplicates included.

use regex::Regex;
use std::sync::OnceLock;

fn hashtag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#[^\s#]+").expect("hashtag pattern is valid"))
}

/// Extracts `#`-prefixed, lowercased hashtags from post content.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    hashtag_regex()
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}
