//! YAML configuration for the portal.
//!
//! One file configures every layer. Each section maps onto the config type
//! of its crate and may be omitted to take that crate's defaults.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "campus portal"
//!
//! ingest:
//!   require_title: true
//!   require_contact_email: true
//!   max_title_chars: 120
//!   max_description_chars: 4000
//!   default_date_to_today: true
//!
//! store:
//!   backend:
//!     kind: redb
//!     path: "./data/retrieveit.redb"
//!   collection: "retrieve_it_reports_v2"
//!
//! matcher:
//!   min_score: 40
//!   category_weight: 50
//!   title_weight: 30
//!   date_weight: 20
//!   date_window_days: 7
//!
//! assist:
//!   enabled: true
//!   enhance_model: "gemini-3-flash-preview"
//!   location_model: "gemini-2.5-flash"
//! ```

use std::fs;
use std::path::Path;

use assist::AssistConfig;
use ingest::IngestConfig;
use matcher::MatchConfig;
use serde::{Deserialize, Serialize};
use store::StoreConfig;
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration for a [`crate::Portal`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Configuration format version.
    #[serde(default = "PortalConfig::default_version")]
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub ingest: IngestConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub matcher: MatchConfig,

    #[serde(default)]
    pub assist: AssistConfig,
}

impl PortalConfig {
    fn default_version() -> String {
        "1.0".to_string()
    }

    /// Load a YAML configuration file from the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate YAML configuration from a string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: PortalConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.ingest
            .validate()
            .map_err(|e| ConfigLoadError::Validation(e.to_string()))?;
        if self.store.collection.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "store.collection must not be empty".into(),
            ));
        }
        self.matcher
            .validate()
            .map_err(|e| ConfigLoadError::Validation(e.to_string()))?;
        self.assist
            .validate()
            .map_err(|e| ConfigLoadError::Validation(e.to_string()))?;

        Ok(())
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            version: Self::default_version(),
            name: None,
            ingest: IngestConfig::default(),
            store: StoreConfig::default(),
            matcher: MatchConfig::default(),
            assist: AssistConfig::default(),
        }
    }
}
