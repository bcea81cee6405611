use regex::Regex;
use std::sync::LazyLock;
use std::time::{SystemTime, UNIX_EPOCH};

static SHORTCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/(reels?|p)/([A-Za-z0-9_-]+)").expect("shortcode pattern is valid")
});

/// Stable artifact name derived from the URL's shortcode. URLs without one
/// get a timestamped fallback name.
pub fn derive_filename(url: &str) -> String {
    if let Some(caps) = SHORTCODE.captures(url) {
        if let Some(id) = caps.get(2) {
            return format!("{}.mp4", id.as_str());
        }
    }

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("reel_{}.mp4", millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_filename_from_shortcode() {
        assert_eq!(
            derive_filename("https://instagram.com/reel/ABC123"),
            "ABC123.mp4"
        );
        assert_eq!(
            derive_filename("https://www.instagram.com/reels/XYZ_9-8"),
            "XYZ_9-8.mp4"
        );
        assert_eq!(derive_filename("http://instagram.com/p/abc/"), "abc.mp4");
    }

    #[test]
    fn test_fallback_is_timestamped() {
        let name = derive_filename("https://instagram.com/explore");
        let stem = name
            .strip_prefix("reel_")
            .and_then(|rest| rest.strip_suffix(".mp4"))
            .unwrap();
        assert!(!stem.is_empty());
        assert!(stem.chars().all(|c| c.is_ascii_digit()));
    }
}
