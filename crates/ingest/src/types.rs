//! Report data model shared by every crate in the workspace.
//!
//! The JSON layout mirrors what the portal has always persisted: camelCase
//! field names, upper-case `type`/`status` values and human-readable
//! category labels. Keep schema changes here explicit, since the store
//! reads old payloads back with these same definitions.
use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a report describes something lost or something found.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemType {
    Lost,
    Found,
}

impl ItemType {
    /// The population a report of this type is matched against.
    pub fn opposite(self) -> Self {
        match self {
            ItemType::Lost => ItemType::Found,
            ItemType::Found => ItemType::Lost,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Lost => "LOST",
            ItemType::Found => "FOUND",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a report. Only `Active` reports are matchable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportStatus {
    #[default]
    Active,
    Matched,
    Resolved,
    Expired,
}

impl ReportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Active => "ACTIVE",
            ReportStatus::Matched => "MATCHED",
            ReportStatus::Resolved => "RESOLVED",
            ReportStatus::Expired => "EXPIRED",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Item category offered by the report form.
///
/// Labels that are not part of the fixed set are kept verbatim in
/// [`Category::Unlisted`] so stored data survives a round trip and
/// comparison stays an exact, case-sensitive match on the label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    #[default]
    Electronics,
    WalletsAndBags,
    JewelryAndWatches,
    Keys,
    Documents,
    Pets,
    Other,
    Unlisted(String),
}

impl Category {
    /// Every category the form offers, in display order.
    pub const LISTED: [Category; 7] = [
        Category::Electronics,
        Category::WalletsAndBags,
        Category::JewelryAndWatches,
        Category::Keys,
        Category::Documents,
        Category::Pets,
        Category::Other,
    ];

    pub fn label(&self) -> &str {
        match self {
            Category::Electronics => "Electronics",
            Category::WalletsAndBags => "Wallets & Bags",
            Category::JewelryAndWatches => "Jewelry & Watches",
            Category::Keys => "Keys",
            Category::Documents => "Documents",
            Category::Pets => "Pets",
            Category::Other => "Other",
            Category::Unlisted(label) => label,
        }
    }

    pub fn is_listed(&self) -> bool {
        !matches!(self, Category::Unlisted(_))
    }

    pub(crate) fn missing() -> Self {
        Category::Unlisted(String::new())
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Electronics" => Category::Electronics,
            "Wallets & Bags" => Category::WalletsAndBags,
            "Jewelry & Watches" => Category::JewelryAndWatches,
            "Keys" => Category::Keys,
            "Documents" => Category::Documents,
            "Pets" => Category::Pets,
            "Other" => Category::Other,
            _ => Category::Unlisted(label),
        }
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        Category::from(label.to_string())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Unlisted(label) => label,
            listed => listed.label().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map position picked alongside a location name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A stored lost-or-found submission.
///
/// Only `id` and `type` are mandatory when reading persisted data; every
/// other field falls back to its default so that one sparse record never
/// prevents the rest of the collection from loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// A record stored without a category reads back as an empty
    /// [`Category::Unlisted`] label, which matches no other category.
    #[serde(default = "Category::missing")]
    pub category: Category,
    /// Calendar date the item was lost or found, ISO `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub location_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub status: ReportStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter_id: Option<String>,
}

impl Report {
    pub fn is_active(&self) -> bool {
        self.status == ReportStatus::Active
    }
}

/// A submission as it arrives from a form or API client, before intake.
///
/// `id` and `status` are optional here; [`crate::ingest_report`] assigns
/// an id and defaults the status to [`ReportStatus::Active`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReportDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<ItemType>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub location_name: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub status: Option<ReportStatus>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub reporter_id: Option<String>,
}

impl ReportDraft {
    /// Start a draft of the given type with the form's defaults.
    pub fn new(item_type: ItemType) -> Self {
        Self {
            item_type: Some(item_type),
            ..Default::default()
        }
    }
}
