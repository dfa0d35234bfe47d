use std::sync::LazyLock;

use regex::Regex;

use super::mime;

static NEWLINE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n+").unwrap());
static WHITESPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// The published date leaks into the span when it sits on its own line;
/// three formats appear across the document family.
static DATE_PREFIX_RES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"^[A-Z][a-z]+ \d{1,2}, \d{4}\s*").unwrap(),
        Regex::new(r"^[A-Z][a-z]+ \d{1,2} \d{4}\s*").unwrap(),
        Regex::new(r"^[A-Z][a-z]+ \d{1,2},? \d{4}\s*").unwrap(),
    ]
});

static NAV_PHRASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Home|About|Contact|Privacy|Terms|Login|Register|Search").unwrap()
});

/// Soft line-breaks inside a tag leave fragments like `<=\n/p>` behind.
static BROKEN_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<=\s*\n\s*[^>]*>").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&[a-zA-Z0-9#]+;").unwrap());

static FINAL_PUNCT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+([.!?])\s*$").unwrap());
static MID_PUNCT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+([.!?])\s+").unwrap());

/// Clean an extracted summary span. Fixed layering: whitespace collapse,
/// MIME/entity repair, leading-date removal, residual navigation phrases,
/// leftover markup, final spacing. Best-effort string rewriting at every
/// stage; running it twice yields the same output.
pub fn normalize(raw: &str) -> String {
    let mut text = NEWLINE_RUN_RE.replace_all(raw.trim(), " ").into_owned();
    text = WHITESPACE_RUN_RE.replace_all(&text, " ").into_owned();

    text = mime::repair_body(&text);

    for re in DATE_PREFIX_RES.iter() {
        text = re.replace(&text, "").into_owned();
    }

    text = NAV_PHRASE_RE.replace_all(&text, "").into_owned();

    text = BROKEN_TAG_RE.replace_all(&text, "").into_owned();
    text = TAG_RE.replace_all(&text, "").into_owned();
    text = ENTITY_RE.replace_all(&text, "").into_owned();

    text = WHITESPACE_RUN_RE.replace_all(text.trim(), " ").into_owned();
    text = FINAL_PUNCT_RE.replace(&text, "$1").into_owned();
    text = MID_PUNCT_RE.replace_all(&text, "$1 ").into_owned();
    text.trim().to_string()
}

// ── Tests ──
