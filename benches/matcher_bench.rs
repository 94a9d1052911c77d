use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use retrieveit::{
    sanitize_text, BackendConfig, Category, CollectionStore, ItemType, Matcher, Report,
    ReportStatus, ReportStore,
};

const CATEGORIES: [&str; 4] = ["Electronics", "Keys", "Wallets & Bags", "Other"];
const TITLES: [&str; 5] = ["iPhone", "House Keys", "Black wallet", "Umbrella", "iPad mini"];

fn sample_reports(count: usize) -> Vec<Report> {
    (0..count)
        .map(|i| Report {
            id: format!("r{i}"),
            item_type: if i % 2 == 0 {
                ItemType::Found
            } else {
                ItemType::Lost
            },
            title: TITLES[i % TITLES.len()].to_string(),
            description: String::new(),
            category: Category::from(CATEGORIES[i % CATEGORIES.len()].to_string()),
            date: format!("2024-01-{:02}", 1 + i % 28),
            location_name: String::new(),
            coordinates: None,
            contact_name: String::new(),
            contact_email: "bench@example.com".into(),
            status: if i % 7 == 0 {
                ReportStatus::Resolved
            } else {
                ReportStatus::Active
            },
            images: Vec::new(),
            reporter_id: None,
        })
        .collect()
}

fn query() -> Report {
    let mut q = sample_reports(2).remove(1);
    q.id = "query".into();
    q.title = "Blue iPhone 13".into();
    q.category = Category::Electronics;
    q.date = "2024-01-10".into();
    q
}

/// Pure scoring over in-memory snapshots of growing size.
fn bench_find_matches(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_matches");
    let matcher = Matcher::default();
    let q = query();

    for size in [100usize, 1_000, 10_000] {
        let snapshot = sample_reports(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &snapshot, |b, snapshot| {
            b.iter(|| matcher.find_matches(black_box(&q), black_box(snapshot)))
        });
    }

    group.finish();
}

/// Snapshot load plus scoring through the store.
fn bench_match_report(c: &mut Criterion) {
    let store = CollectionStore::new(BackendConfig::in_memory()).expect("in-memory store");
    for report in sample_reports(1_000) {
        store.save(report).expect("save");
    }
    let matcher = Matcher::default();
    let q = query();

    c.bench_function("match_report_1000", |b| {
        b.iter(|| matcher.match_report(black_box(&store), black_box(&q)))
    });
}

fn bench_sanitize(c: &mut Criterion) {
    let text = "Black leather wallet \u{1F45B} with caf\u{e9} receipt\tand two cards ".repeat(20);
    c.bench_function("sanitize_text", |b| b.iter(|| sanitize_text(black_box(&text))));
}

criterion_group!(benches, bench_find_matches, bench_match_report, bench_sanitize);
criterion_main!(benches);
