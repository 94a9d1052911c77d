//! HTTP client for a Gemini-style `generateContent` API.
//!
//! Requests go to `{api_base}/models/{model}:generateContent` with the key in
//! the `x-goog-api-key` header. Transient failures are retried per
//! [`RetryConfig`](crate::RetryConfig).
use std::time::Duration;

use async_trait::async_trait;
use ingest::ItemType;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::retry::execute_with_retry;
use crate::{AssistConfig, AssistError, DescriptionEnhancer, LocationLink, LocationLookup, LocationSearch};

/// Prompt sent to the enhancement model.
pub fn enhance_prompt(text: &str, item_type: ItemType) -> String {
    format!(
        "You are an AI assistant for a professional Lost and Found portal.\n\
         The user is reporting a {item_type} item with the following rough description: \"{text}\".\n\
         \n\
         Task:\n\
         1. Rewrite this into a professional, clear, and detailed description.\n\
         2. Focus on physical characteristics (color, brand, material, unique marks).\n\
         3. Ensure the tone is helpful and concise.\n\
         4. Do not include personal contact information.\n\
         \n\
         Return only the enhanced description text."
    )
}

/// Prompt sent to the location model.
pub fn location_prompt(query: &str) -> String {
    format!("Help me find specific locations or landmarks near: {query}")
}

/// Client for both assist operations, sharing one connection pool.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    cfg: AssistConfig,
    api_key: String,
}

impl GeminiClient {
    /// Build a client, resolving the key from config or environment.
    pub fn from_config(cfg: &AssistConfig) -> Result<Self, AssistError> {
        cfg.validate()?;
        if !cfg.enabled {
            return Err(AssistError::Disabled);
        }
        let api_key = cfg.resolve_api_key().ok_or(AssistError::Disabled)?;
        Self::new(cfg.clone(), api_key)
    }

    pub fn new(cfg: AssistConfig, api_key: impl Into<String>) -> Result<Self, AssistError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AssistError::InvalidConfig(format!("http client: {e}")))?;
        Ok(Self {
            http,
            cfg,
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.cfg.api_base.trim_end_matches('/'),
            model
        )
    }

    async fn generate(&self, model: &str, body: Value) -> Result<GenerateContentResponse, AssistError> {
        let url = self.endpoint(model);
        execute_with_retry(&self.cfg.retry, |attempt| {
            let url = url.clone();
            let body = body.clone();
            async move {
                if attempt > 0 {
                    debug!(attempt, %url, "gemini_retry_attempt");
                }
                self.send(&url, &body).await
            }
        })
        .await
    }

    async fn send(&self, url: &str, body: &Value) -> Result<GenerateContentResponse, AssistError> {
        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AssistError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| AssistError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl DescriptionEnhancer for GeminiClient {
    async fn enhance(&self, text: &str, item_type: ItemType) -> Result<String, AssistError> {
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": enhance_prompt(text, item_type) }] }],
        });
        let response = self.generate(&self.cfg.enhance_model, body).await?;
        let enhanced = response.text();
        if enhanced.trim().is_empty() {
            return Err(AssistError::EmptyResponse);
        }
        info!(
            model = %self.cfg.enhance_model,
            input_len = text.len(),
            output_len = enhanced.len(),
            "assist_enhance"
        );
        Ok(enhanced.trim().to_string())
    }
}

#[async_trait]
impl LocationLookup for GeminiClient {
    async fn search(
        &self,
        query: &str,
        lat: Option<f64>,
        lng: Option<f64>,
    ) -> Result<LocationSearch, AssistError> {
        let mut body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": location_prompt(query) }] }],
            "tools": [{ "googleMaps": {} }],
        });
        if let (Some(latitude), Some(longitude)) = (lat, lng) {
            body["toolConfig"] = json!({
                "retrievalConfig": { "latLng": { "latitude": latitude, "longitude": longitude } }
            });
        }

        let response = self.generate(&self.cfg.location_model, body).await?;
        let result = LocationSearch {
            text: response.text(),
            links: response.map_links(),
        };
        info!(
            model = %self.cfg.location_model,
            links = result.links.len(),
            "assist_location_search"
        );
        Ok(result)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Default, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    maps: Option<MapsChunk>,
}

#[derive(Debug, Default, Deserialize)]
struct MapsChunk {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    /// Maps grounding chunks of the first candidate that carry a URI.
    fn map_links(&self) -> Vec<LocationLink> {
        self.candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|meta| {
                meta.grounding_chunks
                    .iter()
                    .filter_map(|chunk| chunk.maps.as_ref())
                    .filter_map(|maps| {
                        let url = maps.uri.clone().filter(|u| !u.is_empty())?;
                        Some(LocationLink {
                            title: maps.title.clone().unwrap_or_default(),
                            url,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
