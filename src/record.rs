use serde::Serialize;

/// Sentinel for a summary that could not be bounded. Deliberately a visible
/// string rather than an empty one, so downstream consumers can tell
/// "unavailable" from "successfully empty".
pub const SUMMARY_UNAVAILABLE: &str = "Summary not available";

/// Fields pulled from the MIME headers and rendered text.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSet {
    pub title: String,
    pub url: String,
    /// `None` only after all nine fallback strategies failed. The mapping
    /// layer downstream is expected to synthesize its own fallback (e.g. a
    /// content hash) and log the degradation.
    pub identifier: Option<String>,
    /// Deduplicated case-sensitively, first-seen order preserved.
    pub tags: Vec<String>,
}

/// One record per source document, immutable after construction. Handed to
/// the external mapping/storage layer as a JSON object.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedRecord {
    #[serde(flatten)]
    pub fields: FieldSet,
    pub summary: String,
    pub source_path: String,
}

/// Non-fatal degraded paths taken while extracting one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Degradation {
    /// All nine identifier strategies failed.
    IdentifierUnresolved,
    /// Start/end markers not located; summary degraded to the sentinel.
    BoundaryUnavailable,
}

/// Which strategy/tier produced each heuristic result.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionTrace {
    pub identifier_strategy: Option<&'static str>,
    pub boundary_tier: Option<&'static str>,
    pub degradations: Vec<Degradation>,
}

/// The pipeline's full output: the record plus its diagnostics.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub record: ExtractedRecord,
    pub trace: ExtractionTrace,
}
