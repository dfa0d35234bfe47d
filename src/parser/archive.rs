use std::sync::LazyLock;

use regex::Regex;

static CONTENT_TYPE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)Content-Type:").unwrap());

/// Markers tried in order to find where the MIME headers of a part end and
/// the document markup begins.
const ROOT_MARKERS: &[&str] = &["<!DOCTYPE", "<html", "<body"];

/// One `Content-Type:`-delimited slice of an archive document, headers
/// included.
#[derive(Debug)]
pub struct MimePart<'a> {
    pub content_type: String,
    pub raw: &'a str,
}

/// The retained HTML part: the full raw span (used for escaped-label
/// searches) plus the body trimmed to the first HTML root indicator.
#[derive(Debug)]
pub struct HtmlPart<'a> {
    pub raw: &'a str,
    pub body: &'a str,
}

/// Split an archive into its MIME parts. Each part greedily spans from its
/// `Content-Type:` header to the next one (or end of document); the type is
/// the first line's value up to any `;` parameter.
pub fn split_parts(content: &str) -> Vec<MimePart<'_>> {
    let marks: Vec<_> = CONTENT_TYPE_RE.find_iter(content).collect();
    marks
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let end = marks.get(i + 1).map_or(content.len(), |next| next.start());
            let value = content[m.end()..end].lines().next().unwrap_or("");
            MimePart {
                content_type: value.split(';').next().unwrap_or("").trim().to_string(),
                raw: &content[m.start()..end],
            }
        })
        .collect()
}

/// Isolate the first `text/html` part and trim its leading MIME headers.
/// Returns `None` when the archive has no usable HTML, which is terminal
/// for the document.
pub fn locate_html_part(content: &str) -> Option<HtmlPart<'_>> {
    let part = split_parts(content)
        .into_iter()
        .find(|p| p.content_type.eq_ignore_ascii_case("text/html"))?;
    let start = ROOT_MARKERS
        .iter()
        .find_map(|marker| part.raw.find(marker))
        .or_else(|| part.raw.find('<'))?;
    Some(HtmlPart {
        raw: part.raw,
        body: &part.raw[start..],
    })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "Subject: FF #7 Test\n\
        Content-Type: multipart/related; boundary=\"x\"\n\n\
        Content-Type: text/html; charset=\"utf-8\"\n\
        Content-Transfer-Encoding: quoted-printable\n\n\
        <!DOCTYPE html><html><body><p>hi</p></body></html>\n\
        Content-Type: text/css\n\nbody {}\n";

    #[test]
    fn splits_typed_parts() {
        let parts = split_parts(DOC);
        let types: Vec<&str> = parts.iter().map(|p| p.content_type.as_str()).collect();
        assert_eq!(types, ["multipart/related", "text/html", "text/css"]);
    }

    #[test]
    fn locates_html_and_trims_headers() {
        let part = locate_html_part(DOC).unwrap();
        assert!(part.body.starts_with("<!DOCTYPE html>"));
        assert!(part.raw.contains("Content-Transfer-Encoding"));
        assert!(!part.raw.contains("text/css"));
    }

    #[test]
    fn first_html_part_wins() {
        let doc = "Content-Type: text/html\n\n<p>first</p>\n\
            Content-Type: text/html\n\n<p>second</p>\n";
        let part = locate_html_part(doc).unwrap();
        assert!(part.body.starts_with("<p>first</p>"));
    }

    #[test]
    fn falls_back_to_first_tag() {
        let doc = "Content-Type: text/html\n\n<div>no doctype here</div>\n";
        let part = locate_html_part(doc).unwrap();
        assert!(part.body.starts_with("<div>"));
    }

    #[test]
    fn no_html_part() {
        assert!(locate_html_part("Content-Type: text/plain\n\nhello\n").is_none());
    }

    #[test]
    fn html_part_without_markup_is_discarded() {
        assert!(locate_html_part("Content-Type: text/html\n\njust text\n").is_none());
    }
}
