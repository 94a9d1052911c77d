use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use retrieveit::{Match, Report, ReportDraft, ReportFilter, SubmitOutcome};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Submit request: a report draft plus submission options.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(flatten)]
    pub draft: ReportDraft,

    /// Polish the description with the enhancer before intake
    #[serde(default)]
    pub enhance: bool,
}

/// Report listing response
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportList {
    pub total: usize,
    pub reports: Vec<Report>,
}

/// Matches computed for one stored report
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchesResponse {
    pub report_id: String,
    pub total_matches: usize,
    pub matches: Vec<Match>,
}

/// Submit a report and return it with its matches.
///
/// Responds `201 Created` when the report was stored and `202 Accepted`
/// when intake succeeded but the store rejected the save.
pub async fn submit_report(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<SubmitRequest>,
) -> ServerResult<impl IntoResponse> {
    let outcome: SubmitOutcome = if request.enhance {
        state.portal.submit_enhanced(request.draft).await?
    } else {
        state.portal.submit(request.draft)?
    };

    let status = if outcome.persisted {
        StatusCode::CREATED
    } else {
        StatusCode::ACCEPTED
    };
    Ok((status, Json(outcome)))
}

/// List stored reports, optionally filtered by `type` and `status`.
pub async fn list_reports(
    State(state): State<Arc<ServerState>>,
    Query(filter): Query<ReportFilter>,
) -> ServerResult<impl IntoResponse> {
    let reports = state.portal.reports(&filter)?;
    Ok(Json(ReportList {
        total: reports.len(),
        reports,
    }))
}

pub async fn get_report(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> ServerResult<impl IntoResponse> {
    state
        .portal
        .report(&id)?
        .map(Json)
        .ok_or(ServerError::ReportNotFound(id))
}

/// Matches for a stored report against the current store contents.
pub async fn report_matches(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> ServerResult<impl IntoResponse> {
    let Some(matches) = state.portal.matches_for(&id)? else {
        return Err(ServerError::ReportNotFound(id));
    };
    Ok(Json(MatchesResponse {
        report_id: id,
        total_matches: matches.len(),
        matches,
    }))
}
