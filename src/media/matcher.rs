use regex::Regex;
use std::sync::LazyLock;

/// Reel and post URLs, query string included so the whole span under the
/// cursor can be replaced later.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://(www\.)?instagram\.com/(reels?|p)/[A-Za-z0-9_-]+/?(\?[^\s]*)?")
        .expect("url pattern is valid")
});

/// Stricter validation pattern, applied after cleaning.
static SUPPORTED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://(www\.)?instagram\.com/(reels?|p)/[A-Za-z0-9_-]+")
        .expect("supported pattern is valid")
});

/// A recognized URL inside one line. Offsets are character offsets, matching
/// editor cursor columns; `end` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMatch {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Finds the URL whose span the cursor touches. A cursor sitting directly
/// after the last character still counts as touching.
pub fn find_url_at_cursor(line: &str, cursor: usize) -> Option<UrlMatch> {
    for m in URL_PATTERN.find_iter(line) {
        let start = line[..m.start()].chars().count();
        let end = start + m.as_str().chars().count();
        if cursor >= start && cursor <= end {
            return Some(UrlMatch {
                start,
                end,
                text: m.as_str().to_string(),
            });
        }
    }
    None
}

/// Drops the query string and at most one trailing slash.
pub fn clean_url(raw: &str) -> String {
    let cleaned = match raw.find('?') {
        Some(pos) => &raw[..pos],
        None => raw,
    };
    cleaned.strip_suffix('/').unwrap_or(cleaned).to_string()
}

pub fn is_supported_url(url: &str) -> bool {
    SUPPORTED_PATTERN.is_match(url)
}
