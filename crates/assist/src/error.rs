use thiserror::Error;

/// Errors surfaced by the assist services.
///
/// Callers on the submit path never see these: they go through
/// [`crate::enhance_or_original`] and [`crate::search_or_unavailable`],
/// which log the error and fall back.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssistError {
    #[error("invalid assist config: {0}")]
    InvalidConfig(String),
    /// Assist is switched off or no API key is configured.
    #[error("assist service disabled")]
    Disabled,
    /// Transport failure (connect, timeout, TLS).
    #[error("http request failed: {0}")]
    Http(String),
    /// Non-success HTTP status from the upstream API.
    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// The upstream answered but produced no text.
    #[error("empty response")]
    EmptyResponse,
}

impl AssistError {
    /// Whether a retry has a chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        match self {
            AssistError::Http(_) => true,
            AssistError::Status { status, .. } => {
                matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
            }
            _ => false,
        }
    }
}
