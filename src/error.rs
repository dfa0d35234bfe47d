use thiserror::Error;

/// Document-terminal extraction failures. Field-level problems are not
/// errors: a missing identifier is `None`, a missing summary is the
/// sentinel string, and both are carried in the extraction trace.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No usable `text/html` part was found in the archive. Nothing else
    /// can be rendered, so the whole document is reported as failed.
    #[error("no usable HTML part in {path}")]
    NoHtmlContent { path: String },
}
