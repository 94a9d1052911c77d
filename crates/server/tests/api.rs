//! Integration tests for the HTTP API, driven through the router with
//! `tower::ServiceExt::oneshot` against an in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use retrieveit::{
    AssistError, AssistServices, BackendConfig, CollectionStore, DescriptionEnhancer,
    IngestConfig, ItemType, LocationLink, LocationLookup, LocationSearch, Matcher, Portal,
};
use serde_json::{json, Value};
use server::{build_router, ServerConfig, ServerState};
use tower::ServiceExt;

fn portal() -> Portal {
    let store = CollectionStore::new(BackendConfig::in_memory()).unwrap();
    Portal::new(IngestConfig::default(), Arc::new(store), Matcher::default())
}

fn app_with(portal: Portal) -> Router {
    build_router(Arc::new(ServerState::with_portal(
        ServerConfig::default(),
        portal,
    )))
}

fn app() -> Router {
    app_with(portal())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn draft(item_type: &str, title: &str, category: &str, date: &str) -> Value {
    json!({
        "type": item_type,
        "title": title,
        "category": category,
        "date": date,
        "locationName": "Library",
        "contactName": "Sam",
        "contactEmail": "sam@example.com",
    })
}

#[tokio::test]
async fn health_and_info_endpoints() {
    let app = app();

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, get("/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["components"]["store"], "ready");

    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["api_version"], "v1");
}

#[tokio::test]
async fn submit_then_match_across_populations() {
    let app = app();

    let (status, found) = send(
        &app,
        post_json(
            "/api/v1/reports",
            draft("FOUND", "iPhone", "Electronics", "2024-01-12"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(found["persisted"], true);
    assert_eq!(found["report"]["status"], "ACTIVE");
    assert_eq!(found["matches"], json!([]));
    let found_id = found["report"]["id"].as_str().unwrap().to_string();

    let (status, lost) = send(
        &app,
        post_json(
            "/api/v1/reports",
            draft("LOST", "Blue iPhone 13", "Electronics", "2024-01-10"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let matches = lost["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["matchId"], found_id.as_str());
    assert_eq!(matches[0]["score"], 100);
    assert_eq!(
        matches[0]["reason"],
        "Category Match, Title Similarity, Reported within same week"
    );

    let (status, body) = send(&app, get(&format!("/api/v1/reports/{found_id}/matches"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reportId"], found_id.as_str());
    assert_eq!(body["totalMatches"], 1);
    assert_eq!(body["matches"][0]["score"], 100);
}

#[tokio::test]
async fn list_filters_by_type_and_status() {
    let app = app();
    send(
        &app,
        post_json("/api/v1/reports", draft("FOUND", "Keys", "Keys", "2024-01-01")),
    )
    .await;
    let mut resolved = draft("LOST", "Wallet", "Wallets & Bags", "2024-01-01");
    resolved["status"] = json!("RESOLVED");
    send(&app, post_json("/api/v1/reports", resolved)).await;

    let (_, all) = send(&app, get("/api/v1/reports")).await;
    assert_eq!(all["total"], 2);
    assert_eq!(all["reports"][0]["title"], "Keys");

    let (_, lost) = send(&app, get("/api/v1/reports?type=LOST")).await;
    assert_eq!(lost["total"], 1);
    assert_eq!(lost["reports"][0]["title"], "Wallet");

    let (_, active) = send(&app, get("/api/v1/reports?status=ACTIVE")).await;
    assert_eq!(active["total"], 1);
    assert_eq!(active["reports"][0]["type"], "FOUND");
}

#[tokio::test]
async fn get_report_round_trips_and_unknown_is_404() {
    let app = app();
    let mut body = draft("FOUND", "Umbrella", "Other", "2024-03-01");
    body["id"] = json!("r-1");
    send(&app, post_json("/api/v1/reports", body)).await;

    let (status, report) = send(&app, get("/api/v1/reports/r-1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["title"], "Umbrella");

    let (status, err) = send(&app, get("/api/v1/reports/missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"]["code"], "REPORT_NOT_FOUND");

    let (status, _) = send(&app, get("/api/v1/reports/missing/matches")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_draft_is_rejected() {
    let app = app();
    let mut body = draft("LOST", "", "Other", "2024-01-01");
    body["title"] = json!("   ");

    let (status, err) = send(&app, post_json("/api/v1/reports", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["code"], "INGEST_ERROR");

    let (_, all) = send(&app, get("/api/v1/reports")).await;
    assert_eq!(all["total"], 0);
}

#[tokio::test]
async fn duplicate_id_is_accepted_but_not_persisted() {
    let app = app();
    let mut body = draft("FOUND", "Keys", "Keys", "2024-01-01");
    body["id"] = json!("dup");

    let (status, _) = send(&app, post_json("/api/v1/reports", body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, outcome) = send(&app, post_json("/api/v1/reports", body)).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(outcome["persisted"], false);
    assert!(outcome["storeError"].as_str().unwrap().contains("dup"));
}

#[tokio::test]
async fn unknown_route_uses_error_envelope() {
    let (status, err) = send(&app(), get("/api/v2/nothing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn request_id_is_echoed() {
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-42");

    let response = app().oneshot(get("/health")).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

struct UppercaseAssist;

#[async_trait]
impl DescriptionEnhancer for UppercaseAssist {
    async fn enhance(&self, text: &str, _item_type: ItemType) -> Result<String, AssistError> {
        Ok(text.to_uppercase())
    }
}

#[async_trait]
impl LocationLookup for UppercaseAssist {
    async fn search(
        &self,
        query: &str,
        _lat: Option<f64>,
        _lng: Option<f64>,
    ) -> Result<LocationSearch, AssistError> {
        Ok(LocationSearch {
            text: format!("Places near {query}"),
            links: vec![LocationLink {
                title: "City Library".into(),
                url: "https://maps.example/lib".into(),
            }],
        })
    }
}

fn assisted_app() -> Router {
    let assist = Arc::new(UppercaseAssist);
    app_with(portal().with_assist(AssistServices {
        enhancer: assist.clone(),
        locations: assist,
    }))
}

#[tokio::test]
async fn enhance_endpoint_uses_service_and_falls_back() {
    let request = json!({ "text": "black wallet", "type": "FOUND" });

    let (status, body) = send(
        &assisted_app(),
        post_json("/api/v1/assist/enhance", request.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "BLACK WALLET");
    assert_eq!(body["enhanced"], true);

    let (status, body) = send(&app(), post_json("/api/v1/assist/enhance", request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "black wallet");
    assert_eq!(body["enhanced"], false);

    let (status, _) = send(
        &app(),
        post_json("/api/v1/assist/enhance", json!({ "text": " ", "type": "LOST" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn submit_with_enhance_stores_polished_description() {
    let mut body = draft("LOST", "Wallet", "Wallets & Bags", "2024-01-01");
    body["description"] = json!("brown leather");
    body["enhance"] = json!(true);

    let (status, outcome) = send(&assisted_app(), post_json("/api/v1/reports", body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(outcome["report"]["description"], "BROWN LEATHER");
}

#[tokio::test]
async fn location_search_and_unavailable_fallback() {
    let (status, body) = send(
        &assisted_app(),
        get("/api/v1/assist/locations?q=library&lat=51.5&lng=-0.12"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Places near library");
    assert_eq!(body["links"][0]["title"], "City Library");

    let (status, body) = send(&app(), get("/api/v1/assist/locations?q=library")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Search currently unavailable.");
    assert_eq!(body["links"], json!([]));
}
