use std::sync::LazyLock;

use regex::Regex;

use crate::parser::mime;

static SUBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)Subject:\s*(.+?)\s+Date:").unwrap());
static SOFT_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"=\s*\n\s*").unwrap());
static TRAILING_EQ_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"=\s*$").unwrap());
static FF_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^FF #\d+\s*").unwrap());
static SITE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\|\s*Palliative Care Network of Wisconsin\s*$").unwrap());

pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Title lives in the MIME headers between `Subject:` and `Date:`; decode
/// it and strip the site's numbering prefix and name suffix.
pub fn extract(content: &str) -> String {
    let Some(caps) = SUBJECT_RE.captures(content) else {
        return UNKNOWN_TITLE.to_string();
    };
    let mut title = mime::decode(caps[1].trim());
    title = SOFT_BREAK_RE.replace_all(&title, "").into_owned();
    title = TRAILING_EQ_RE.replace_all(&title, "").into_owned();
    title = FF_PREFIX_RE.replace(&title, "").into_owned();
    title = SITE_SUFFIX_RE.replace(&title, "").into_owned();
    title.trim().to_string()
}

// ── Tests ──
