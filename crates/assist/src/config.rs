use serde::{Deserialize, Serialize};

use crate::retry::RetryConfig;
use crate::AssistError;

/// Environment variables consulted, in order, when no key is configured.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Settings for the generative assist services.
///
/// ```yaml
/// assist:
///   enabled: true
///   api_base: "https://generativelanguage.googleapis.com/v1beta"
///   enhance_model: "gemini-3-flash-preview"
///   location_model: "gemini-2.5-flash"
///   timeout_ms: 30000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistConfig {
    #[serde(default = "AssistConfig::default_enabled")]
    pub enabled: bool,
    #[serde(default = "AssistConfig::default_api_base")]
    pub api_base: String,
    /// Inline key. Prefer the environment; this exists for local setups.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "AssistConfig::default_enhance_model")]
    pub enhance_model: String,
    #[serde(default = "AssistConfig::default_location_model")]
    pub location_model: String,
    /// Per-request timeout.
    #[serde(default = "AssistConfig::default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub retry: RetryConfig,
}

impl AssistConfig {
    fn default_enabled() -> bool {
        true
    }

    fn default_api_base() -> String {
        "https://generativelanguage.googleapis.com/v1beta".to_string()
    }

    fn default_enhance_model() -> String {
        "gemini-3-flash-preview".to_string()
    }

    fn default_location_model() -> String {
        "gemini-2.5-flash".to_string()
    }

    fn default_timeout_ms() -> u64 {
        30_000
    }

    pub fn validate(&self) -> Result<(), AssistError> {
        if self.api_base.trim().is_empty() {
            return Err(AssistError::InvalidConfig("api_base must not be empty".into()));
        }
        if self.enhance_model.trim().is_empty() || self.location_model.trim().is_empty() {
            return Err(AssistError::InvalidConfig(
                "model names must not be empty".into(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(AssistError::InvalidConfig(
                "timeout_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// The configured key, else the first non-empty `GEMINI_API_KEY` /
    /// `API_KEY` from the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                API_KEY_ENV_VARS
                    .iter()
                    .filter_map(|var| std::env::var(var).ok())
                    .find(|k| !k.trim().is_empty())
            })
    }
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            api_base: Self::default_api_base(),
            api_key: None,
            enhance_model: Self::default_enhance_model(),
            location_model: Self::default_location_model(),
            timeout_ms: Self::default_timeout_ms(),
            retry: RetryConfig::default(),
        }
    }
}
