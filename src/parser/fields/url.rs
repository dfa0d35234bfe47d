use std::sync::LazyLock;

use regex::Regex;

static LOCATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Snapshot-Content-Location:\s*(https?://\S+)").unwrap());

/// Used when the snapshot header is missing; points at the site's index.
pub const FALLBACK_URL: &str = "https://www.mypcnow.org/fast-facts";

pub fn extract(content: &str) -> String {
    LOCATION_RE
        .captures(content)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| FALLBACK_URL.to_string())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_location() {
        let content =
            "Snapshot-Content-Location: https://www.mypcnow.org/fast-fact/medicare-hospice/\n";
        assert_eq!(
            extract(content),
            "https://www.mypcnow.org/fast-fact/medicare-hospice/"
        );
    }

    #[test]
    fn missing_header_uses_fallback() {
        assert_eq!(extract("Subject: nothing"), FALLBACK_URL);
    }
}
