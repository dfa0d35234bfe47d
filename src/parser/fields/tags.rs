use std::sync::LazyLock;

use regex::Regex;

static CATEGORIES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)Categories:.*?<a href=3D.*?</p>").unwrap());
static TITLE_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"title=3D"([^"]+)""#).unwrap());
static ANCHOR_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r">([^<]+)</a>").unwrap());
static SOFT_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"=\s*\n\s*").unwrap());
static TRAILING_EQ_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"=\s*$").unwrap());
static WHITESPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Category tags from the escaped Categories block. Anchor `title`
/// attributes are authoritative; inner anchor text is the fallback when the
/// template omits them. No block at all means no tags, not an error.
pub fn extract(content: &str) -> Vec<String> {
    let Some(block) = CATEGORIES_RE.find(content) else {
        return Vec::new();
    };
    let block = block.as_str();

    let mut candidates: Vec<&str> = TITLE_ATTR_RE
        .captures_iter(block)
        .map(|caps| caps.get(1).unwrap().as_str())
        .collect();
    if candidates.is_empty() {
        candidates = ANCHOR_TEXT_RE
            .captures_iter(block)
            .map(|caps| caps.get(1).unwrap().as_str())
            .collect();
    }

    let mut tags: Vec<String> = Vec::new();
    for candidate in candidates {
        let mut tag = candidate
            .replace("=3D", "=")
            .replace("&lt;", "<")
            .replace("&gt;", ">");
        tag = SOFT_BREAK_RE.replace_all(&tag, "").into_owned();
        tag = TRAILING_EQ_RE.replace_all(&tag, "").into_owned();
        tag = tag.replace('=', "");
        tag = WHITESPACE_RUN_RE.replace_all(&tag, " ").trim().to_string();
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_attributes() {
        let content = "<p>Categories: <a href=3D\"https://x/c/hospice/\" title=3D\"Hospice\">\
                       Hospice</a>, <a href=3D\"https://x/c/medicare/\" title=3D\"Medicare\">\
                       Medicare</a></p>";
        assert_eq!(extract(content), ["Hospice", "Medicare"]);
    }

    #[test]
    fn anchor_text_fallback() {
        let content = "<p>Categories: <a href=3D\"https://x/c/opioids/\">Opioids</a>, \
                       <a href=3D\"https://x/c/pain/\">Pain Managemen=\nt</a></p>";
        assert_eq!(extract(content), ["Opioids", "Pain Management"]);
    }

    #[test]
    fn duplicates_collapse_in_order() {
        let content = "<p>Categories: <a href=3D\"https://x/a\" title=3D\"Ethics\">Ethics</a>\
                       <a href=3D\"https://x/b\" title=3D\"Ethics\">Ethics</a>\
                       <a href=3D\"https://x/c\" title=3D\"Goals of Care\">Goals</a></p>";
        assert_eq!(extract(content), ["Ethics", "Goals of Care"]);
    }

    #[test]
    fn no_categories_block() {
        assert!(extract("<p>No categories here.</p>").is_empty());
    }
}
