//! Retrieve It assist services.
//!
//! Two optional helpers sit next to the report form: one polishes a rough
//! item description, the other suggests named places for `locationName`.
//! Both are backed by an external generative API and neither is allowed to
//! break a submission: [`enhance_or_original`] falls back to the user's own
//! text and [`search_or_unavailable`] to a fixed "unavailable" answer.
//!
//! ```
//! use assist::{enhance_or_original, DisabledAssist};
//! use ingest::ItemType;
//!
//! # tokio_test_block_on(async {
//! let text = enhance_or_original(&DisabledAssist, "blue phone", ItemType::Lost).await;
//! assert_eq!(text, "blue phone");
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```
use std::sync::Arc;

use async_trait::async_trait;
use ingest::ItemType;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

mod config;
mod error;
mod gemini;
mod retry;

pub use crate::config::{AssistConfig, API_KEY_ENV_VARS};
pub use crate::error::AssistError;
pub use crate::gemini::{enhance_prompt, location_prompt, GeminiClient};
pub use crate::retry::{execute_with_retry, RetryConfig};

/// Text shown when location search fails.
pub const LOCATION_UNAVAILABLE: &str = "Search currently unavailable.";

/// Rewrites a rough description into a clearer one.
#[async_trait]
pub trait DescriptionEnhancer: Send + Sync {
    async fn enhance(&self, text: &str, item_type: ItemType) -> Result<String, AssistError>;
}

/// Suggests places near a free-text query and optional coordinates.
#[async_trait]
pub trait LocationLookup: Send + Sync {
    async fn search(
        &self,
        query: &str,
        lat: Option<f64>,
        lng: Option<f64>,
    ) -> Result<LocationSearch, AssistError>;
}

/// A suggested place. Selecting one sets the report's `locationName`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationLink {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSearch {
    pub text: String,
    pub links: Vec<LocationLink>,
}

impl LocationSearch {
    pub fn unavailable() -> Self {
        Self {
            text: LOCATION_UNAVAILABLE.to_string(),
            links: Vec::new(),
        }
    }
}

/// Enhance `text`, or return it unchanged on any failure.
pub async fn enhance_or_original(
    enhancer: &dyn DescriptionEnhancer,
    text: &str,
    item_type: ItemType,
) -> String {
    match enhancer.enhance(text, item_type).await {
        Ok(enhanced) => enhanced,
        Err(AssistError::Disabled) => text.to_string(),
        Err(err) => {
            warn!(error = %err, "assist_enhance_fallback");
            text.to_string()
        }
    }
}

/// Search for places, or return [`LocationSearch::unavailable`] on any failure.
pub async fn search_or_unavailable(
    lookup: &dyn LocationLookup,
    query: &str,
    lat: Option<f64>,
    lng: Option<f64>,
) -> LocationSearch {
    match lookup.search(query, lat, lng).await {
        Ok(result) => result,
        Err(err) => {
            warn!(error = %err, "assist_location_fallback");
            LocationSearch::unavailable()
        }
    }
}

/// Stand-in used when assist is switched off or no key is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledAssist;

#[async_trait]
impl DescriptionEnhancer for DisabledAssist {
    async fn enhance(&self, _text: &str, _item_type: ItemType) -> Result<String, AssistError> {
        Err(AssistError::Disabled)
    }
}

#[async_trait]
impl LocationLookup for DisabledAssist {
    async fn search(
        &self,
        _query: &str,
        _lat: Option<f64>,
        _lng: Option<f64>,
    ) -> Result<LocationSearch, AssistError> {
        Err(AssistError::Disabled)
    }
}

/// The pair of assist services a portal or server runs with.
#[derive(Clone)]
pub struct AssistServices {
    pub enhancer: Arc<dyn DescriptionEnhancer>,
    pub locations: Arc<dyn LocationLookup>,
}

impl AssistServices {
    /// Gemini-backed services when enabled and a key resolves, otherwise
    /// [`DisabledAssist`]. Only an invalid config is an error.
    pub fn from_config(cfg: &AssistConfig) -> Result<Self, AssistError> {
        match GeminiClient::from_config(cfg) {
            Ok(client) => {
                let client = Arc::new(client);
                info!(
                    enhance_model = %cfg.enhance_model,
                    location_model = %cfg.location_model,
                    "assist_enabled"
                );
                Ok(Self {
                    enhancer: client.clone(),
                    locations: client,
                })
            }
            Err(AssistError::Disabled) => {
                info!("assist_disabled");
                Ok(Self::disabled())
            }
            Err(err) => Err(err),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enhancer: Arc::new(DisabledAssist),
            locations: Arc::new(DisabledAssist),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingAssist;

    #[async_trait]
    impl DescriptionEnhancer for FailingAssist {
        async fn enhance(&self, _text: &str, _item_type: ItemType) -> Result<String, AssistError> {
            Err(AssistError::Status {
                status: 500,
                body: "boom".into(),
            })
        }
    }

    #[async_trait]
    impl LocationLookup for FailingAssist {
        async fn search(
            &self,
            _query: &str,
            _lat: Option<f64>,
            _lng: Option<f64>,
        ) -> Result<LocationSearch, AssistError> {
            Err(AssistError::Http("connection refused".into()))
        }
    }

    struct UppercaseEnhancer;

    #[async_trait]
    impl DescriptionEnhancer for UppercaseEnhancer {
        async fn enhance(&self, text: &str, _item_type: ItemType) -> Result<String, AssistError> {
            Ok(text.to_uppercase())
        }
    }

    #[tokio::test]
    async fn enhance_falls_back_to_original() {
        let text = enhance_or_original(&FailingAssist, "red scarf", ItemType::Found).await;
        assert_eq!(text, "red scarf");
        let text = enhance_or_original(&DisabledAssist, "red scarf", ItemType::Found).await;
        assert_eq!(text, "red scarf");
    }

    #[tokio::test]
    async fn enhance_uses_service_result() {
        let text = enhance_or_original(&UppercaseEnhancer, "red scarf", ItemType::Lost).await;
        assert_eq!(text, "RED SCARF");
    }

    #[tokio::test]
    async fn search_falls_back_to_unavailable() {
        let result = search_or_unavailable(&FailingAssist, "library", None, None).await;
        assert_eq!(result.text, "Search currently unavailable.");
        assert!(result.links.is_empty());
    }

    #[test]
    fn disabled_config_yields_disabled_services() {
        let cfg = AssistConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(AssistServices::from_config(&cfg).is_ok());

        let bad = AssistConfig {
            api_base: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            AssistServices::from_config(&bad),
            Err(AssistError::InvalidConfig(_))
        ));
    }
}
