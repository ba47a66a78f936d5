// Criterion benchmarks for Crime Stats

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use crime_stats::core::{flatten_records, frequency_table, normalize_label, Breakdown, RecordLimit};
use crime_stats::services::crime_api::decode_outcomes;
use serde_json::json;

const OUTCOMES: [&str; 6] = [
    "Investigation complete; no suspect identified",
    "Unable to prosecute suspect",
    "Local resolution",
    "Offender given a caution",
    "Under investigation",
    "Status update unavailable",
];

fn create_records(n: usize) -> Vec<serde_json::Value> {
    (0..n)
        .map(|i| {
            json!({
                "category": { "code": format!("code-{}", i % 12), "name": OUTCOMES[i % OUTCOMES.len()] },
                "date": "2023-01",
                "person_id": null,
                "crime": {
                    "category": if i % 3 == 0 { "violent-crime" } else { "other-theft" },
                    "location_type": "Force",
                    "location": {
                        "latitude": "51.509865",
                        "longitude": "-0.118092",
                        "street": { "id": i, "name": "On or near Strand" }
                    },
                    "context": "",
                    "persistent_id": format!("{:x}", i),
                    "id": i,
                    "location_subtype": if i % 2 == 0 { "ROAD" } else { "" },
                    "month": "2023-01"
                }
            })
        })
        .collect()
}

fn bench_normalize_label(c: &mut Criterion) {
    c.bench_function("normalize_label", |b| {
        b.iter(|| normalize_label(black_box("Violence and sexual offences  (with injury)")))
    });
}

fn bench_frequency_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("frequency_table");

    for size in [100, 1000, 10000].iter() {
        let labels: Vec<&str> = (0..*size).map(|i| OUTCOMES[i % OUTCOMES.len()]).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &labels, |b, labels| {
            b.iter(|| frequency_table(black_box(labels.iter())))
        });
    }

    group.finish();
}

fn bench_breakdowns(c: &mut Criterion) {
    let batch = decode_outcomes(create_records(2000));

    c.bench_function("tabulate_all_breakdowns", |b| {
        b.iter(|| {
            for breakdown in [Breakdown::Outcome, Breakdown::Location, Breakdown::Category] {
                black_box(breakdown.tabulate(&batch.records));
            }
        })
    });

    c.bench_function("flatten_records_all", |b| {
        b.iter(|| flatten_records(black_box(&batch.records), RecordLimit::All))
    });
}

criterion_group!(benches, bench_normalize_label, bench_frequency_table, bench_breakdowns);
criterion_main!(benches);
