//! Benchmark for the daily health trend over long commit histories.
//!
//! Every trend point re-scores an as-of view of the snapshot, so cost grows
//! with days x commits.

use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use repopulse::config::Settings;
use repopulse::ingest::{normalize_snapshot, RawCommit, RawId, RawMember, RawSnapshot};
use repopulse::{MetricsEngine, Snapshot};
use std::hint::black_box;

const AUTHORS: &[&str] = &["ana", "ben", "cy", "dee", "eli"];
const FILES: &[&str] = &[
    "server/services/orders.js",
    "client/pages/Cart.jsx",
    "server/auth/login.js",
    "db/migrations/002_orders.sql",
    "server/socket/chat.js",
];

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 20, 12, 0, 0).unwrap()
}

fn create_history(days: i64, commits_per_day: usize) -> Snapshot {
    let mut raw = RawSnapshot::default();
    raw.team.members = AUTHORS
        .iter()
        .map(|id| RawMember {
            id: Some(RawId::Text(id.to_string())),
            name: Some(id.to_uppercase()),
            avatar: None,
            color: None,
        })
        .collect();

    for day in 0..days {
        for n in 0..commits_per_day {
            let i = day as usize * commits_per_day + n;
            raw.commits.push(RawCommit {
                id: Some(RawId::Text(format!("c{i}"))),
                author: Some(AUTHORS[i % AUTHORS.len()].to_string()),
                message: Some(format!("feat: extend {} handling", FILES[i % FILES.len()])),
                date: Some((now() - Duration::days(day) - Duration::hours(n as i64)).to_rfc3339()),
                files: vec![FILES[i % FILES.len()].to_string()],
                additions: 20,
                deletions: 4,
            });
        }
    }

    normalize_snapshot(raw, now(), &Settings::default()).unwrap()
}

fn bench_health_trend(c: &mut Criterion) {
    let settings = Settings::default();
    let mut group = c.benchmark_group("health_trend");

    for days in [30, 90, 180] {
        let snapshot = create_history(days, 4);
        group.bench_with_input(BenchmarkId::from_parameter(days), &snapshot, |b, snapshot| {
            b.iter(|| {
                let engine = MetricsEngine::new(black_box(snapshot), &settings, now());
                black_box(engine.health_trend())
            })
        });
    }

    group.finish();
}

fn bench_live_health(c: &mut Criterion) {
    let settings = Settings::default();
    let snapshot = create_history(180, 4);

    c.bench_function("health_score_180_days", |b| {
        b.iter(|| MetricsEngine::new(black_box(&snapshot), &settings, now()).health_score())
    });
}

criterion_group!(benches, bench_health_trend, bench_live_health);
criterion_main!(benches);
