//! Retrieve It intake layer
//!
//! This is where reports enter the portal. A [`ReportDraft`] from a form or
//! an API client is validated, sanitized and defaulted into a [`Report`]
//! that the store can append and the matcher can score.
//!
//! ## What we do here
//!
//! - **Assign ids** - drafts without an id get a random UUID (simple form).
//! - **Sanitize free text** - `title` and `description` keep printable ASCII
//!   and whitespace only, see [`sanitize_text`].
//! - **Apply defaults** - `status` falls back to `ACTIVE`, an empty `date`
//!   to today's UTC date.
//! - **Enforce policy** - required fields, length limits, date and email
//!   shape, all driven by [`IngestConfig`].
//! - **Log everything** - structured events via `tracing`.
//!
//! ## Example
//!
//! ```
//! use ingest::{ingest_report, IngestConfig, ItemType, ReportDraft, ReportStatus};
//!
//! let mut draft = ReportDraft::new(ItemType::Lost);
//! draft.title = "Blue iPhone 13\u{7}".into();
//! draft.date = "2024-01-10".into();
//! draft.contact_email = "owner@example.com".into();
//!
//! let report = ingest_report(draft, &IngestConfig::default()).unwrap();
//! assert_eq!(report.title, "Blue iPhone 13");
//! assert_eq!(report.status, ReportStatus::Active);
//! assert!(!report.id.is_empty());
//! ```
use std::time::Instant;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn, Level};
use uuid::Uuid;

mod config;
mod error;
mod sanitize;
mod types;

pub use crate::config::{ConfigError, IngestConfig};
pub use crate::error::IngestError;
pub use crate::sanitize::{is_sanitized, sanitize_text};
pub use crate::types::{Category, Coordinates, ItemType, Report, ReportDraft, ReportStatus};

/// Turn a draft into a report ready to be saved.
pub fn ingest_report(draft: ReportDraft, cfg: &IngestConfig) -> Result<Report, IngestError> {
    let start = Instant::now();
    let id_hint = draft.id.clone();

    let span = tracing::span!(
        Level::INFO,
        "ingest.report",
        item_type = ?draft.item_type,
        category = %draft.category
    );
    let _guard = span.enter();

    match ingest_inner(draft, cfg) {
        Ok(report) => {
            let elapsed_micros = start.elapsed().as_micros();
            info!(
                report_id = %report.id,
                item_type = %report.item_type,
                title_len = report.title.len(),
                description_len = report.description.len(),
                elapsed_micros,
                "ingest_success"
            );
            Ok(report)
        }
        Err(err) => {
            let elapsed_micros = start.elapsed().as_micros();
            warn!(
                report_id = ?id_hint,
                error = %err,
                elapsed_micros,
                "ingest_failure"
            );
            Err(err)
        }
    }
}

fn ingest_inner(draft: ReportDraft, cfg: &IngestConfig) -> Result<Report, IngestError> {
    let ReportDraft {
        id,
        item_type,
        title,
        description,
        category,
        date,
        location_name,
        coordinates,
        contact_name,
        contact_email,
        status,
        images,
        reporter_id,
    } = draft;

    let item_type = item_type.ok_or(IngestError::MissingType)?;

    let title = sanitize_text(&title).trim().to_string();
    if cfg.require_title && title.is_empty() {
        return Err(IngestError::MissingField("title"));
    }
    enforce_length("title", &title, cfg.max_title_chars)?;

    let description = sanitize_text(&description).trim().to_string();
    enforce_length("description", &description, cfg.max_description_chars)?;

    let contact_email = contact_email.trim().to_string();
    if contact_email.is_empty() {
        if cfg.require_contact_email {
            return Err(IngestError::MissingField("contactEmail"));
        }
    } else if !looks_like_email(&contact_email) {
        return Err(IngestError::InvalidEmail(contact_email));
    }

    let date = normalize_date(&date, cfg)?;

    let id = id
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .unwrap_or_else(new_report_id);

    Ok(Report {
        id,
        item_type,
        title,
        description,
        category,
        date,
        location_name: location_name.trim().to_string(),
        coordinates,
        contact_name: contact_name.trim().to_string(),
        contact_email,
        status: status.unwrap_or_default(),
        images,
        reporter_id: reporter_id.filter(|r| !r.trim().is_empty()),
    })
}

/// Fresh opaque report identifier.
pub fn new_report_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn enforce_length(field: &'static str, value: &str, limit: usize) -> Result<(), IngestError> {
    let actual = value.chars().count();
    if actual > limit {
        return Err(IngestError::FieldTooLong {
            field,
            limit,
            actual,
        });
    }
    Ok(())
}

fn normalize_date(raw: &str, cfg: &IngestConfig) -> Result<String, IngestError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        if cfg.default_date_to_today {
            return Ok(Utc::now().date_naive().format("%Y-%m-%d").to_string());
        }
        return Err(IngestError::MissingField("date"));
    }
    let valid = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(trimmed).is_ok();
    if !valid {
        return Err(IngestError::InvalidDate(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
