use std::sync::LazyLock;

use quoted_printable::ParseMode;
use regex::Regex;
use tracing::debug;

static SOFT_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"=\s*\n\s*").unwrap());
static TRAILING_EQ_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"=\s*$").unwrap());
static BROKEN_NBSP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&nb=\s*sp;").unwrap());
static EQ_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"=\s*").unwrap());

/// Multi-byte escapes first: decoding `=3D` before `=E2=80=93` would corrupt
/// sequences that share bytes with the single-byte table.
const MULTI_BYTE_ESCAPES: &[(&str, &str)] = &[
    ("=E2=80=9C", "\""),
    ("=E2=80=9D", "\""),
    ("=E2=80=99", "'"),
    ("=E2=80=98", "'"),
    ("=E2=80=93", "\u{2013}"),
    ("=E2=80=94", "\u{2014}"),
    ("=E2=80=A6", "\u{2026}"),
    ("=C2=A0", " "),
];

const SINGLE_BYTE_ESCAPES: &[(&str, &str)] = &[
    ("=3D", "="),
    ("=20", " "),
    ("=2E", "."),
    ("=2C", ","),
    ("=27", "'"),
    ("=22", "\""),
    ("=28", "("),
    ("=29", ")"),
    ("=3A", ":"),
    ("=3B", ";"),
    ("=21", "!"),
    ("=3F", "?"),
];

const HTML_ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
];

/// Decode a MIME header value or inline-escaped fragment. Tiered: standard
/// RFC 2047 decoding, then a manual quoted-printable pass over the payload,
/// then the whole token; never fails, worst case returns the input unchanged.
pub fn decode(token: &str) -> String {
    if token.contains("=?utf-8?Q?") {
        if let Ok((header, _)) = mailparse::parse_header(format!("Subject: {token}").as_bytes()) {
            return header.get_value();
        }
    }

    if let Some(inner) = token
        .strip_prefix("=?utf-8?Q?")
        .and_then(|rest| rest.strip_suffix("?="))
    {
        if let Ok(bytes) = quoted_printable::decode(inner, ParseMode::Robust) {
            if let Ok(decoded) = String::from_utf8(bytes) {
                return decoded;
            }
        }
    }

    match quoted_printable::decode(token, ParseMode::Robust) {
        Ok(bytes) => {
            let decoded = String::from_utf8_lossy(&bytes).into_owned();
            if decoded == token {
                debug!("decode left token unchanged");
            }
            decoded
        }
        Err(_) => {
            debug!("decode fell through, returning token unchanged");
            token.to_string()
        }
    }
}

/// Repair quoted-printable and entity artifacts in body text that was never
/// run through a real MIME decoder. Order matters: soft breaks, multi-byte
/// escapes, single-byte escapes, leftover `=` artifacts, then entities.
pub fn repair_body(text: &str) -> String {
    let mut out = SOFT_BREAK_RE.replace_all(text, "").into_owned();
    out = TRAILING_EQ_RE.replace_all(&out, "").into_owned();
    for (escape, replacement) in MULTI_BYTE_ESCAPES {
        out = out.replace(escape, replacement);
    }
    for (escape, replacement) in SINGLE_BYTE_ESCAPES {
        out = out.replace(escape, replacement);
    }
    out = BROKEN_NBSP_RE.replace_all(&out, " ").into_owned();
    out = EQ_RUN_RE.replace_all(&out, "").into_owned();
    for (entity, replacement) in HTML_ENTITIES {
        out = out.replace(entity, replacement);
    }
    out
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_encoded_word() {
        let decoded = decode("=?utf-8?Q?FF_=2382_Medicare_Hospice_Benefit?=");
        assert_eq!(decoded, "FF #82 Medicare Hospice Benefit");
    }

    #[test]
    fn decode_folded_encoded_words() {
        let decoded = decode("=?utf-8?Q?Opioid_Dose?=\n =?utf-8?Q?_Conversions?=");
        assert_eq!(decoded, "Opioid Dose Conversions");
    }

    #[test]
    fn decode_bare_escapes() {
        assert_eq!(decode("caf=C3=A9 visit"), "caf\u{e9} visit");
    }

    #[test]
    fn decode_plain_token_unchanged() {
        assert_eq!(decode("Medicare Hospice Benefit"), "Medicare Hospice Benefit");
    }

    #[test]
    fn repair_soft_breaks_rejoin_words() {
        assert_eq!(repair_body("termi=\nnal illness"), "terminal illness");
    }

    #[test]
    fn repair_multi_byte_before_single_byte() {
        let repaired = repair_body("she said =E2=80=9Cyes=E2=80=9D=2C then=20left");
        assert_eq!(repaired, "she said \"yes\", then left");
    }

    #[test]
    fn repair_entities() {
        assert_eq!(repair_body("a&nbsp;&amp;&nbsp;b &lt;c&gt;"), "a & b <c>");
    }

    #[test]
    fn repair_broken_nbsp() {
        assert_eq!(repair_body("pain&nb=\nsp;control"), "pain control");
    }

    #[test]
    fn repair_strips_residual_equals() {
        assert_eq!(repair_body("dose = titration="), "dose titration");
    }
}
