use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::parser::mime;

static FF_HASH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)FF\s*#\s*(\d+)").unwrap());
static SUBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)Subject:\s*(.+?)\s+Date:").unwrap());
static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Fast Fact Number:\s*(\d+)").unwrap());
static ENCODED_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Fast Fact Number:=\s*\n\s*(\d+)").unwrap());
static URL_SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)fast-fact.*?(\d+)").unwrap());
static FACT_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Fast Fact\s*#\s*(\d+)").unwrap());
static HEAD_COMBO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:FF\s*#|Fast Fact\s*#?)\s*(\d+)").unwrap());
static HEAD_FACT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:Fact|FF)\s*#?\s*(\d{1,3})").unwrap());
static META_CONTENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"content=3D"[^"]*?(\d{1,3})[^"]*?""#).unwrap());

/// Only the first chunk of the document is trusted by the loosest
/// strategies; beyond it any number could match.
const HEAD_LEN: usize = 1000;

/// Everything a strategy may look at. Borrowed views into the pipeline's
/// intermediates so each strategy stays a pure function.
pub struct IdentifierContext<'a> {
    pub file_name: &'a str,
    pub content: &'a str,
    pub html_part: &'a str,
    pub rendered_text: &'a str,
}

type Strategy = fn(&IdentifierContext) -> Option<String>;

/// Strict priority order, first success wins. Each entry is independently
/// testable so new document variants can add a tier without perturbing the
/// existing ones.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("filename", from_file_name),
    ("number label", from_label),
    ("number label (encoded)", from_encoded_label),
    ("number label (rendered)", from_rendered_label),
    ("title", from_title),
    ("url slug", from_url_slug),
    ("fact heading", from_fact_heading),
    ("document head", from_document_head),
    ("last resort", from_last_resort),
];

/// Resolve the numeric identifier, returning the value and the name of the
/// strategy that produced it. `None` means all nine strategies failed; the
/// caller is expected to synthesize a fallback and log the degradation.
pub fn extract(ctx: &IdentifierContext) -> Option<(String, &'static str)> {
    for (name, strategy) in STRATEGIES.iter().copied() {
        if let Some(value) = strategy(ctx) {
            debug!(strategy = name, value = %value, "identifier resolved");
            return Some((value, name));
        }
    }
    debug!("identifier unresolved after all strategies");
    None
}

fn from_file_name(ctx: &IdentifierContext) -> Option<String> {
    capture(&FF_HASH_RE, ctx.file_name)
}

fn from_label(ctx: &IdentifierContext) -> Option<String> {
    capture(&LABEL_RE, ctx.content)
}

/// The label split by a quoted-printable soft line-break, as it appears in
/// the raw HTML part.
fn from_encoded_label(ctx: &IdentifierContext) -> Option<String> {
    capture(&ENCODED_LABEL_RE, ctx.html_part)
}

fn from_rendered_label(ctx: &IdentifierContext) -> Option<String> {
    capture(&LABEL_RE, ctx.rendered_text)
}

/// The numbering prefix survives in the decoded subject even when it has
/// been stripped from the presentation title.
fn from_title(ctx: &IdentifierContext) -> Option<String> {
    let caps = SUBJECT_RE.captures(ctx.content)?;
    capture(&FF_HASH_RE, &mime::decode(caps[1].trim()))
}

fn from_url_slug(ctx: &IdentifierContext) -> Option<String> {
    capture(&URL_SLUG_RE, ctx.content)
}

fn from_fact_heading(ctx: &IdentifierContext) -> Option<String> {
    capture(&FACT_HEADING_RE, ctx.content)
}

fn from_document_head(ctx: &IdentifierContext) -> Option<String> {
    capture(&HEAD_COMBO_RE, head(ctx.content))
}

/// Maximally restrictive last resort: a short number near a Fact/FF token,
/// else a 1-999 number inside an escaped meta `content` attribute.
fn from_last_resort(ctx: &IdentifierContext) -> Option<String> {
    let head = head(ctx.content);
    if let Some(value) = capture(&HEAD_FACT_RE, head) {
        return Some(value);
    }
    META_CONTENT_RE
        .captures_iter(head)
        .map(|caps| caps[1].to_string())
        .find(|value| value.parse::<u32>().is_ok_and(|n| (1..=999).contains(&n)))
}

fn capture(re: &Regex, haystack: &str) -> Option<String> {
    re.captures(haystack).map(|caps| caps[1].to_string())
}

fn head(content: &str) -> &str {
    if content.len() <= HEAD_LEN {
        return content;
    }
    let mut end = HEAD_LEN;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    &content[..end]
}

// ── Tests ──
