pub mod archive;
pub mod boundary;
pub mod fields;
pub mod mime;
pub mod render;
pub mod summary;

use std::path::Path;

use crate::error::ExtractError;
use crate::record::{
    Degradation, ExtractedRecord, Extraction, ExtractionTrace, FieldSet, SUMMARY_UNAVAILABLE,
};
use fields::identifier::IdentifierContext;

/// Extract one archive document into a structured record: isolate the HTML
/// part, render it, pull the fields, bound and normalize the summary.
///
/// Pure and synchronous; safe to call from any number of threads at once.
/// Field-level failures degrade the record and are noted in the trace; only
/// a missing HTML part fails the document.
pub fn extract(source_path: &str, content: &str) -> Result<Extraction, ExtractError> {
    let part = archive::locate_html_part(content).ok_or_else(|| ExtractError::NoHtmlContent {
        path: source_path.to_string(),
    })?;
    let rendered = render::render(part.body);

    let title = fields::title::extract(content);
    let url = fields::url::extract(content);

    let file_name = Path::new(source_path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(source_path);
    let identifier = fields::identifier::extract(&IdentifierContext {
        file_name,
        content,
        html_part: part.raw,
        rendered_text: &rendered.text,
    });
    let tags = fields::tags::extract(content);

    let bounds = boundary::find_bounds(&rendered);
    let summary = bounds
        .as_ref()
        .map(|b| summary::normalize(&rendered.text[b.span.start..b.span.end]));

    let mut degradations = Vec::new();
    if identifier.is_none() {
        degradations.push(Degradation::IdentifierUnresolved);
    }
    if bounds.is_none() {
        degradations.push(Degradation::BoundaryUnavailable);
    }

    Ok(Extraction {
        trace: ExtractionTrace {
            identifier_strategy: identifier.as_ref().map(|(_, strategy)| *strategy),
            boundary_tier: bounds.as_ref().map(|b| b.end_tier),
            degradations,
        },
        record: ExtractedRecord {
            fields: FieldSet {
                title,
                url,
                identifier: identifier.map(|(value, _)| value),
                tags,
            },
            summary: summary.unwrap_or_else(|| SUMMARY_UNAVAILABLE.to_string()),
            source_path: source_path.to_string(),
        },
    })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_fixture(name: &str) -> Extraction {
        let path = format!("tests/fixtures/{name}.mhtml");
        let content = std::fs::read_to_string(&path).unwrap();
        extract(&path, &content).unwrap()
    }

    #[test]
    fn medicare_fixture() {
        let extraction = extract_fixture("ff82");
        let fields = &extraction.record.fields;
        assert_eq!(fields.title, "Medicare Hospice Benefit");
        assert_eq!(
            fields.url,
            "https://www.mypcnow.org/fast-fact/medicare-hospice-benefit-part-1/"
        );
        assert_eq!(fields.identifier.as_deref(), Some("82"));
        assert_eq!(fields.tags, ["Hospice", "Medicare"]);
        assert_eq!(
            extraction.record.summary,
            "The Medicare Hospice Benefit covers care for patients with a terminal illness. \
             Eligible patients must have a prognosis of six months or less if the disease runs \
             its expected course."
        );
        assert_eq!(extraction.trace.identifier_strategy, Some("number label"));
        assert_eq!(extraction.trace.boundary_tier, Some("references (structural)"));
        assert!(extraction.trace.degradations.is_empty());
    }

    #[test]
    fn opioid_fixture_uses_fallback_tiers() {
        let extraction = extract_fixture("ff110");
        let fields = &extraction.record.fields;
        assert_eq!(fields.title, "Opioid Dose Conversions");
        assert_eq!(fields.identifier.as_deref(), Some("110"));
        assert_eq!(fields.tags, ["Opioids", "Pain Management"]);
        assert_eq!(
            extraction.record.summary,
            "Equianalgesic conversions are used when a patient's current opioid regimen must \
             be changed to a different drug or route. Published dose ratios are a starting \
             point only; individual titration remains essential."
        );
        assert_eq!(
            extraction.trace.identifier_strategy,
            Some("number label (encoded)")
        );
        assert_eq!(extraction.trace.boundary_tier, Some("resources (structural)"));
    }

    #[test]
    fn missing_html_part_is_terminal() {
        let err = extract("plain.mhtml", "Content-Type: text/plain\n\nhello").unwrap_err();
        assert!(matches!(err, ExtractError::NoHtmlContent { .. }));
    }

    #[test]
    fn unbounded_summary_degrades_to_sentinel() {
        let content = "Subject: FF #9 Short Note Date: Mon, 1 Jun 2020\n\
            Content-Type: text/html\n\n\
            <html><body><p>No markers at all.</p></body></html>\n";
        let extraction = extract("note.mhtml", content).unwrap();
        assert_eq!(extraction.record.summary, SUMMARY_UNAVAILABLE);
        assert_eq!(extraction.record.fields.identifier.as_deref(), Some("9"));
        assert!(extraction
            .trace
            .degradations
            .contains(&Degradation::BoundaryUnavailable));
    }

    #[test]
    fn round_trip_encoded_document() {
        let content = "From: <Saved by Blink>\n\
            Snapshot-Content-Location: https://www.mypcnow.org/fast-fact/dyspnea-assessment/\n\
            Subject: =?utf-8?Q?FF_=23212_Dyspnea_Assessment_=7C_Palliative_Care_Network_of_Wisconsin?=\n\
            Date: Tue, 5 May 2020 08:00:00 -0000\n\
            MIME-Version: 1.0\n\
            Content-Type: multipart/related; boundary=\"----MultipartBoundary--r7\"\n\
            \n\
            ------MultipartBoundary--r7\n\
            Content-Type: text/html\n\
            Content-Transfer-Encoding: quoted-printable\n\
            \n\
            <!DOCTYPE html><html><body>\n\
            <p>Published On:\nMay 5, 2020</p>\n\
            <p>Dyspnea is the subjective sensation of =E2=80=9Cbreathlessness=E2=80=9D \
            reported by the patient.</p>\n\
            <p><strong>References</strong></p>\n\
            <p>1. Some citation.</p>\n\
            <p>Categories: <a href=3D\"https://www.mypcnow.org/category/symptoms/\" \
            title=3D\"Symptom Assessment\">Symptom Assessment</a></p>\n\
            </body></html>\n\
            \n\
            ------MultipartBoundary--r7--\n";
        let extraction = extract("dyspnea.mhtml", content).unwrap();
        let fields = &extraction.record.fields;
        assert_eq!(fields.title, "Dyspnea Assessment");
        assert_eq!(
            fields.url,
            "https://www.mypcnow.org/fast-fact/dyspnea-assessment/"
        );
        assert_eq!(fields.identifier.as_deref(), Some("212"));
        assert_eq!(fields.tags, ["Symptom Assessment"]);
        assert_eq!(
            extraction.record.summary,
            "Dyspnea is the subjective sensation of \"breathlessness\" reported by the patient."
        );
        assert_eq!(extraction.trace.identifier_strategy, Some("title"));
    }
}
