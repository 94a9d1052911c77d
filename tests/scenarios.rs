//! Scoring scenarios and the matching properties, run through a real store.

mod common;

use common::{memory_store, report, with_status};
use retrieveit::{ItemType, Matcher, ReportStatus, ReportStore};

fn query() -> retrieveit::Report {
    report("q", ItemType::Lost, "Electronics", "Blue iPhone 13", "2024-01-10")
}

#[test]
fn perfect_candidate_scores_100_with_all_reasons() {
    let store = memory_store();
    store
        .save(report("r", ItemType::Found, "Electronics", "iPhone", "2024-01-12"))
        .unwrap();

    let matches = Matcher::default().match_report(&store, &query()).unwrap();
    assert_eq!(matches.len(), 1);
    let m = &matches[0];
    assert_eq!(m.report_id, "q");
    assert_eq!(m.match_id, "r");
    assert_eq!(m.score, 100);
    assert_eq!(
        m.reason,
        "Category Match, Title Similarity, Reported within same week"
    );
}

#[test]
fn unrelated_candidate_is_excluded() {
    let store = memory_store();
    store
        .save(report("r", ItemType::Found, "Keys", "House Keys", "2024-02-09"))
        .unwrap();

    assert!(Matcher::default()
        .match_report(&store, &query())
        .unwrap()
        .is_empty());
}

#[test]
fn same_type_candidate_is_excluded() {
    let store = memory_store();
    let q = report("q", ItemType::Found, "Electronics", "iPhone", "2024-01-10");
    store
        .save(report("r", ItemType::Found, "Electronics", "iPhone", "2024-01-10"))
        .unwrap();

    assert!(Matcher::default().match_report(&store, &q).unwrap().is_empty());
}

#[test]
fn resolved_candidate_is_excluded() {
    let store = memory_store();
    store
        .save(with_status(
            report("r", ItemType::Found, "Electronics", "iPhone", "2024-01-12"),
            ReportStatus::Resolved,
        ))
        .unwrap();

    assert!(Matcher::default()
        .match_report(&store, &query())
        .unwrap()
        .is_empty());
}

#[test]
fn matches_respect_population_threshold_and_order() {
    let store = memory_store();
    let candidates = [
        report("f1", ItemType::Found, "Electronics", "Charger", "2024-03-01"),
        report("f2", ItemType::Found, "Electronics", "iPhone", "2024-01-11"),
        report("l1", ItemType::Lost, "Electronics", "iPhone", "2024-01-11"),
        report("f3", ItemType::Found, "Other", "iphone case", "2024-01-09"),
        with_status(
            report("f4", ItemType::Found, "Electronics", "iPhone", "2024-01-10"),
            ReportStatus::Matched,
        ),
        report("f5", ItemType::Found, "Pets", "Cat", "2024-01-10"),
        report("f6", ItemType::Found, "Electronics", "Laptop", "2024-01-13"),
    ];
    for candidate in candidates.clone() {
        store.save(candidate).unwrap();
    }

    let matches = Matcher::default().match_report(&store, &query()).unwrap();
    let ids: Vec<(&str, u32)> = matches
        .iter()
        .map(|m| (m.match_id.as_str(), m.score))
        .collect();
    // f3: "iphone case" does not contain "blue iphone 13" nor the reverse.
    assert_eq!(ids, vec![("f2", 100), ("f6", 70), ("f1", 50)]);

    for m in &matches {
        assert!(m.score >= 40);
        let candidate = candidates.iter().find(|c| c.id == m.match_id).unwrap();
        assert_eq!(candidate.item_type, ItemType::Found);
        assert_eq!(candidate.status, ReportStatus::Active);
    }
    assert!(matches.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn equal_scores_keep_insertion_order() {
    let store = memory_store();
    for id in ["c", "a", "b"] {
        store
            .save(report(id, ItemType::Found, "Electronics", "Tablet", "2023-06-01"))
            .unwrap();
    }

    let matches = Matcher::default().match_report(&store, &query()).unwrap();
    let ids: Vec<&str> = matches.iter().map(|m| m.match_id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
}

#[test]
fn date_window_is_inclusive_and_handles_timestamps() {
    let store = memory_store();
    store
        .save(report("edge", ItemType::Found, "Electronics", "Tablet", "2024-01-17"))
        .unwrap();
    store
        .save(report(
            "late",
            ItemType::Found,
            "Electronics",
            "Tablet",
            "2024-01-17T12:00:00Z",
        ))
        .unwrap();
    store
        .save(report("bad", ItemType::Found, "Electronics", "Tablet", "someday"))
        .unwrap();

    let matches = Matcher::default().match_report(&store, &query()).unwrap();
    let scores: Vec<(&str, u32)> = matches
        .iter()
        .map(|m| (m.match_id.as_str(), m.score))
        .collect();
    assert_eq!(scores, vec![("edge", 70), ("late", 50), ("bad", 50)]);
}
