use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::render::RenderedText;

static REFERENCES_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)references").unwrap());
static RESOURCES_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)resources").unwrap());

const START_MARKER: &str = "Published On:";
const MIME_BOUNDARY_MARKER: &str = "------MultipartBoundary";

/// Occurrences inside this disclaimer sentence are prose, not a section
/// heading.
const DISCLAIMER: &str = "consult other relevant and up-to-date experts";

/// A Resources hit whose recent context contains one of these came from
/// navigation chrome that survived tag stripping.
const NAV_MARKERS: &[&str] = &["menu", "nav", "search", "www.mypcnow.org", "fusion-"];

const REFERENCES_HEADINGS: &[&str] = &["References", "References:", "REFERENCES", "REFERENCES:"];
const RESOURCES_HEADINGS: &[&str] = &["resources", "resources:"];

/// Byte offsets into `RenderedText.text`. Valid only when `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummarySpan {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub span: SummarySpan,
    /// Which tier produced the end offset, for the extraction trace.
    pub end_tier: &'static str,
}

/// Locate the summary span: from the line after `Published On:` to the
/// References/Resources section head. Tiered end detection; fails closed
/// (`None`) rather than guessing when either marker is missing or the span
/// would be empty.
pub fn find_bounds(rendered: &RenderedText) -> Option<Bounds> {
    let text = &rendered.text;
    let marker = text.find(START_MARKER)?;
    let start = marker + text[marker..].find('\n')? + 1;

    let (mut end, mut tier) = find_end(rendered)?;

    // Real content never extends past a MIME part boundary; anything after
    // one is leaked CSS/script payload.
    if let Some(boundary) = text.find(MIME_BOUNDARY_MARKER) {
        if boundary < end {
            end = boundary;
            tier = "mime boundary override";
        }
    }

    if start >= end {
        return None;
    }
    debug!(tier, start, end, "summary bounds located");
    Some(Bounds {
        span: SummarySpan { start, end },
        end_tier: tier,
    })
}

fn find_end(rendered: &RenderedText) -> Option<(usize, &'static str)> {
    if let Some(pos) = structural_heading(rendered, REFERENCES_HEADINGS, false, false) {
        return Some((pos, "references (structural)"));
    }
    if let Some(pos) = textual_heading(&rendered.text, &REFERENCES_TEXT_RE, false) {
        return Some((pos, "references (textual)"));
    }
    if let Some(pos) = structural_heading(rendered, RESOURCES_HEADINGS, true, true) {
        return Some((pos, "resources (structural)"));
    }
    if let Some(pos) = textual_heading(&rendered.text, &RESOURCES_TEXT_RE, true) {
        return Some((pos, "resources (textual)"));
    }
    None
}

/// Scan block-level tags (and `strong` runs nested in them) for an exact
/// section heading; the boundary is the heading text's position in the
/// rendered text. First hit wins.
fn structural_heading(
    rendered: &RenderedText,
    headings: &[&str],
    case_insensitive: bool,
    guard_nav: bool,
) -> Option<usize> {
    for block in &rendered.blocks {
        let candidates =
            std::iter::once(block.text.as_str()).chain(block.strong.iter().map(String::as_str));
        for candidate in candidates {
            let hit = if case_insensitive {
                headings.contains(&candidate.to_lowercase().as_str())
            } else {
                headings.contains(&candidate)
            };
            if !hit {
                continue;
            }
            let Some(pos) = rendered.text.find(candidate) else { continue };
            if guard_nav && has_nav_context(&rendered.text, pos) {
                continue;
            }
            return Some(pos);
        }
    }
    None
}

/// Case-insensitive text scan with disambiguation: skip disclaimer prose
/// (or navigation context for the Resources fallback), mid-sentence hits,
/// and in-text citations like "references 2 and 3". A surviving candidate
/// must look like a heading: capital first letter, then end-of-text,
/// space, newline, or a colon.
fn textual_heading(text: &str, word_re: &Regex, guard_nav: bool) -> Option<usize> {
    let bytes = text.as_bytes();
    for hit in word_re.find_iter(text) {
        let pos = hit.start();
        if guard_nav {
            if has_nav_context(text, pos) {
                continue;
            }
        } else if context_before(text, pos, 50).contains(DISCLAIMER) {
            continue;
        }
        if pos > 0 && !matches!(bytes[pos - 1], b' ' | b'\n' | b'.' | b':' | b';') {
            continue;
        }
        let next_word = text[hit.end()..].split_whitespace().next();
        if next_word.is_some_and(|w| w.bytes().all(|b| b.is_ascii_digit())) {
            continue;
        }
        if bytes[pos] != b'R' {
            continue;
        }
        if hit.end() >= text.len() || matches!(bytes[hit.end()], b'\n' | b' ' | b':') {
            return Some(pos);
        }
    }
    None
}

fn has_nav_context(text: &str, pos: usize) -> bool {
    let context = context_before(text, pos, 100).to_lowercase();
    NAV_MARKERS.iter().any(|marker| context.contains(marker))
}

fn context_before(text: &str, pos: usize, len: usize) -> &str {
    let mut start = pos.saturating_sub(len);
    while !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..pos]
}

// ── Tests ──
