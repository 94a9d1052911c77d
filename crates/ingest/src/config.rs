//! Configuration types for report intake.
//!
//! [`IngestConfig`] controls how drafts are validated and defaulted. It is
//! cheap to clone and deserializes from the `ingest:` section of the portal
//! YAML file.
//!
//! ```rust
//! use ingest::IngestConfig;
//!
//! let config = IngestConfig::default();
//! config.validate().expect("default config is valid");
//! ```
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Runtime configuration for intake behavior.
///
/// The defaults accept everything the report form can produce:
/// a title and a contact email are required, dates must be ISO calendar
/// dates, and free text is bounded so one submission cannot bloat the
/// persisted collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestConfig {
    /// Configuration schema version.
    #[serde(default = "IngestConfig::default_version")]
    pub version: u32,

    /// Reject drafts whose title is empty after sanitization.
    #[serde(default = "default_true")]
    pub require_title: bool,

    /// Reject drafts without a contact email.
    #[serde(default = "default_true")]
    pub require_contact_email: bool,

    /// Maximum title length in characters, after sanitization.
    #[serde(default = "IngestConfig::default_max_title_chars")]
    pub max_title_chars: usize,

    /// Maximum description length in characters, after sanitization.
    #[serde(default = "IngestConfig::default_max_description_chars")]
    pub max_description_chars: usize,

    /// Fill an empty `date` with today's UTC date instead of rejecting it.
    #[serde(default = "default_true")]
    pub default_date_to_today: bool,
}

/// Errors raised by [`IngestConfig::validate`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid ingest config: {0}")]
    Invalid(String),
}

impl IngestConfig {
    fn default_version() -> u32 {
        1
    }

    fn default_max_title_chars() -> usize {
        120
    }

    fn default_max_description_chars() -> usize {
        4000
    }

    /// Validate the configuration at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 {
            return Err(ConfigError::Invalid("version must be >= 1".into()));
        }
        if self.max_title_chars == 0 {
            return Err(ConfigError::Invalid(
                "max_title_chars must be greater than zero".into(),
            ));
        }
        if self.max_description_chars == 0 {
            return Err(ConfigError::Invalid(
                "max_description_chars must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            version: Self::default_version(),
            require_title: true,
            require_contact_email: true,
            max_title_chars: Self::default_max_title_chars(),
            max_description_chars: Self::default_max_description_chars(),
            default_date_to_today: true,
        }
    }
}

fn default_true() -> bool {
    true
}
