use regex::Regex;
use std::sync::OnceLock;

fn url_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([a-zA-Z0-9_-]{11})").expect("valid video url regex")
    })
}

fn bare_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([a-zA-Z0-9_-]{11})$").expect("valid video id regex"))
}

/// Video id from a watch/short/embed URL or a bare 11-character id.
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    [url_pattern(), bare_pattern()]
        .iter()
        .find_map(|re| re.captures(input))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
