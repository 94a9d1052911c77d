//! Error types produced by report intake.
//!
//! Every variant describes a problem with the submitted draft itself, so all
//! of them map to a client error in HTTP contexts.
use thiserror::Error;

/// Errors that can occur while turning a [`ReportDraft`](crate::ReportDraft)
/// into a stored-ready [`Report`](crate::Report).
///
/// # Examples
///
/// ```rust
/// use ingest::IngestError;
///
/// let err = IngestError::MissingField("title");
/// assert_eq!(err.to_string(), "missing required field: title");
/// assert_eq!(err.http_status_code(), 400);
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IngestError {
    /// The draft did not say whether the item was lost or found.
    #[error("report type is required (LOST or FOUND)")]
    MissingType,

    /// A field required by the intake policy was empty after sanitization.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A free-text field exceeded its configured length limit.
    #[error("{field} exceeds limit of {limit} characters (got {actual})")]
    FieldTooLong {
        field: &'static str,
        limit: usize,
        actual: usize,
    },

    /// The date could not be read as an ISO calendar date.
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The contact email is present but obviously malformed.
    #[error("invalid contact email '{0}'")]
    InvalidEmail(String),
}

impl IngestError {
    /// Returns a suggested HTTP status code for this error.
    ///
    /// Oversized fields map to 413, everything else to 400.
    pub fn http_status_code(&self) -> u16 {
        match self {
            IngestError::FieldTooLong { .. } => 413,
            _ => 400,
        }
    }
}
