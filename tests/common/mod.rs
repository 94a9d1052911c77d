#![allow(dead_code)]

use std::sync::Arc;

use retrieveit::{
    BackendConfig, Category, CollectionStore, IngestConfig, ItemType, Matcher, Portal, Report,
    ReportStatus,
};

pub fn report(id: &str, item_type: ItemType, category: &str, title: &str, date: &str) -> Report {
    Report {
        id: id.into(),
        item_type,
        title: title.into(),
        description: String::new(),
        category: Category::from(category.to_string()),
        date: date.into(),
        location_name: "Main Library".into(),
        coordinates: None,
        contact_name: "Sam".into(),
        contact_email: "sam@example.com".into(),
        status: ReportStatus::Active,
        images: Vec::new(),
        reporter_id: None,
    }
}

pub fn with_status(mut report: Report, status: ReportStatus) -> Report {
    report.status = status;
    report
}

pub fn memory_store() -> CollectionStore {
    CollectionStore::new(BackendConfig::in_memory()).unwrap()
}

pub fn memory_portal() -> Portal {
    Portal::new(
        IngestConfig::default(),
        Arc::new(memory_store()),
        Matcher::default(),
    )
}
