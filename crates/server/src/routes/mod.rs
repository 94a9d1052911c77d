//! API route handlers
//!
//! - `health`: Health checks, readiness, and metrics
//! - `reports`: Report submission, listing and matches
//! - `assist`: Description enhancement and location search

pub mod assist;
pub mod health;
pub mod reports;

use crate::error::{ServerError, ServerResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API version and base info
///
/// # Response
///
/// ```json
/// {
///   "name": "Retrieve It Server",
///   "version": "0.1.0",
///   "api_version": "v1",
///   "endpoints": ["..."]
/// }
/// ```
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "Retrieve It Server",
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": "v1",
        "endpoints": [
            "/api/v1/reports",
            "/api/v1/reports/{id}",
            "/api/v1/reports/{id}/matches",
            "/api/v1/assist/enhance",
            "/api/v1/assist/locations",
            "/health",
            "/ready",
            "/metrics"
        ]
    })))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
