use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use avian_flu_ingest::ingestion::{IngestionOptions, ingest_bytes};
use avian_flu_ingest::store::MemoryStore;
use avian_flu_ingest::types::CanonicalRecord;

const HEADER: &str = "latitude,longitude,species,H5N1,H5N2,H7N2,H7N8,timestamp,provenance";

fn csv_body(rows: usize) -> Vec<u8> {
    let mut out = String::with_capacity(rows * 64);
    out.push_str(HEADER);
    out.push('\n');
    for i in 0..rows {
        let h5n1 = if i % 3 == 0 { String::new() } else { format!("{}", (i % 10) as f64 / 10.0) };
        out.push_str(&format!(
            "{:.4},{:.4},Mallard,{h5n1},,0.5,,2024-01-{:02},FieldSurvey\n",
            46.0 + (i % 100) as f64 * 0.01,
            6.0 + (i % 50) as f64 * 0.01,
            i % 28 + 1
        ));
    }
    out.into_bytes()
}

fn json_body(rows: usize) -> Vec<u8> {
    let records: Vec<CanonicalRecord> = (0..rows)
        .map(|i| CanonicalRecord {
            latitude: 46.0 + (i % 100) as f64 * 0.01,
            longitude: 6.0 + (i % 50) as f64 * 0.01,
            species: "Mallard".to_string(),
            h5n1: (i % 10) as f64 / 10.0,
            timestamp: "2024-01-01".to_string(),
            provenance: "FieldSurvey".to_string(),
            ..Default::default()
        })
        .collect();
    serde_json::to_vec(&records).unwrap()
}

fn bench_ingest(c: &mut Criterion) {
    let opts = IngestionOptions::default();
    let mut group = c.benchmark_group("ingest_bytes");

    for rows in [1_000usize, 10_000] {
        group.throughput(Throughput::Elements(rows as u64));

        let csv = csv_body(rows);
        group.bench_with_input(BenchmarkId::new("csv", rows), &csv, |b, body| {
            let store = MemoryStore::new();
            b.iter(|| ingest_bytes(&store, "bench.csv", black_box(body), &opts).unwrap())
        });

        let json = json_body(rows);
        group.bench_with_input(BenchmarkId::new("json", rows), &json, |b, body| {
            let store = MemoryStore::new();
            b.iter(|| ingest_bytes(&store, "bench.json", black_box(body), &opts).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_ingest);
criterion_main!(benches);
