use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use retrieveit::{enhance_or_original, search_or_unavailable, ItemType};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct EnhanceRequest {
    pub text: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EnhanceResponse {
    pub text: String,
    /// False when the original text came back unchanged
    pub enhanced: bool,
}

/// Location search query: `q` plus optional coordinates.
#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub q: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

/// Polish a description. Never fails on upstream errors.
pub async fn enhance_description(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<EnhanceRequest>,
) -> ServerResult<impl IntoResponse> {
    if request.text.trim().is_empty() {
        return Err(ServerError::BadRequest("text must not be empty".into()));
    }

    let enhancer = state.portal.assist().enhancer.as_ref();
    let text = enhance_or_original(enhancer, &request.text, request.item_type).await;
    Ok(Json(EnhanceResponse {
        enhanced: text != request.text,
        text,
    }))
}

/// Suggest places for a location name. Upstream failures answer
/// "Search currently unavailable." with no links.
pub async fn search_locations(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<LocationQuery>,
) -> ServerResult<impl IntoResponse> {
    if query.q.trim().is_empty() {
        return Err(ServerError::BadRequest("q must not be empty".into()));
    }

    let lookup = state.portal.assist().locations.as_ref();
    Ok(Json(
        search_or_unavailable(lookup, &query.q, query.lat, query.lng).await,
    ))
}
