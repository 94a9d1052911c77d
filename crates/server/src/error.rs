use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use retrieveit::{IngestError, PortalError};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    #[error("Store error: {0}")]
    Store(#[from] retrieveit::StoreError),

    #[error("Match error: {0}")]
    Match(#[from] retrieveit::MatchError),

    #[error("Report '{0}' not found")]
    ReportNotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Ingest(err) => StatusCode::from_u16(err.http_status_code())
                .unwrap_or(StatusCode::BAD_REQUEST),
            ServerError::ReportNotFound(_) | ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Match(_) | ServerError::Internal(_) | ServerError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get error code string
    fn error_code(&self) -> &'static str {
        match self {
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::Ingest(_) => "INGEST_ERROR",
            ServerError::Store(_) => "STORE_ERROR",
            ServerError::Match(_) => "MATCH_ERROR",
            ServerError::ReportNotFound(_) => "REPORT_NOT_FOUND",
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::Config(_) => "CONFIG_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }
}

impl From<PortalError> for ServerError {
    fn from(err: PortalError) -> Self {
        match err {
            PortalError::Ingest(e) => ServerError::Ingest(e),
            PortalError::Store(e) => ServerError::Store(e),
            PortalError::Match(e) => ServerError::Match(e),
            PortalError::Config(e) => ServerError::Config(e.to_string()),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request_failed");
        }

        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

impl From<std::net::AddrParseError> for ServerError {
    fn from(err: std::net::AddrParseError) -> Self {
        ServerError::Config(format!("Invalid address: {err}"))
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}
