use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

static CHROME_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("nav, aside, footer, header, script, style").unwrap());
static CLASSED_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("[class]").unwrap());
static BLOCK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p, h1, h2, h3, h4, h5, h6").unwrap());
static STRONG_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("strong").unwrap());

static NAV_CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)menu|nav|sidebar|footer|header|breadcrumb").unwrap());
static CONTENT_CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)content|main|article|post|entry").unwrap());

const NAV_LABELS: &[&str] = &[
    "home", "about", "contact", "privacy", "terms", "login", "register", "search",
];

/// Plain text rendered from one HTML part, paired with the structural block
/// runs the boundary detector needs for its tag-level scan.
#[derive(Debug)]
pub struct RenderedText {
    /// Trimmed text runs joined with `\n`, in document order.
    pub text: String,
    pub blocks: Vec<BlockText>,
}

/// Trimmed text of one block-level tag (`p`, `h1`..`h6`) plus the text of
/// each `strong` nested within it.
#[derive(Debug)]
pub struct BlockText {
    pub text: String,
    pub strong: Vec<String>,
}

/// Render an HTML fragment to plain text, dropping navigational chrome
/// before serialization.
pub fn render(html: &str) -> RenderedText {
    let mut doc = Html::parse_document(html);
    strip_chrome(&mut doc);
    strip_nav_labels(&mut doc);
    RenderedText {
        text: serialize_text(&doc),
        blocks: collect_blocks(&doc),
    }
}

/// Detach structural chrome: nav/aside/footer/header/script/style elements
/// and anything classed like navigation.
fn strip_chrome(doc: &mut Html) {
    let mut doomed: Vec<_> = doc.select(&CHROME_SELECTOR).map(|el| el.id()).collect();
    doomed.extend(
        doc.select(&CLASSED_SELECTOR)
            .filter(|el| el.value().attr("class").is_some_and(|c| NAV_CLASS_RE.is_match(c)))
            .map(|el| el.id()),
    );
    for id in doomed {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Detach elements whose text is exactly a common navigation label, unless
/// the enclosing element mentions references or carries a content-area
/// class. Both guards overlap and can misfire on edge cases; the behavior
/// is kept as a known heuristic limitation.
fn strip_nav_labels(doc: &mut Html) {
    let mut doomed = Vec::new();
    for node in doc.root_element().descendants() {
        let Node::Text(text) = node.value() else { continue };
        let label = text.trim();
        if !NAV_LABELS.iter().any(|nav| label.eq_ignore_ascii_case(nav)) {
            continue;
        }
        let Some(parent) = node.parent().and_then(ElementRef::wrap) else { continue };
        let parent_text = parent.text().collect::<String>().to_lowercase();
        if parent_text.contains("references") {
            continue;
        }
        if parent
            .value()
            .attr("class")
            .is_some_and(|c| CONTENT_CLASS_RE.is_match(c))
        {
            continue;
        }
        doomed.push(parent.id());
    }
    for id in doomed {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Depth-first text serialization: every text node trimmed, empties
/// skipped, runs joined with newlines.
fn serialize_text(doc: &Html) -> String {
    let mut runs: Vec<&str> = Vec::new();
    for node in doc.root_element().descendants() {
        if let Node::Text(text) = node.value() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                runs.push(trimmed);
            }
        }
    }
    runs.join("\n")
}

fn collect_blocks(doc: &Html) -> Vec<BlockText> {
    doc.select(&BLOCK_SELECTOR)
        .map(|el| BlockText {
            text: element_text(el),
            strong: el.select(&STRONG_SELECTOR).map(element_text).collect(),
        })
        .collect()
}

fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

// ── Tests ──
