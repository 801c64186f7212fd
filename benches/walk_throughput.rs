//! Benchmark suite for schema walk throughput
//!
//! This benchmark measures how fast schemas are walked with:
//! - Wide records (many sibling fields)
//! - Deeply nested records (long namespace and type chains)
//! - Recursive and alias-heavy schemas (registry lookups)
//!
//! # Configuration
//!
//! Benchmark behavior can be configured via environment variables:
//!
//! - `BENCH_SAMPLE_SIZE`: Number of samples to collect (default: 100)
//! - `BENCH_MEASUREMENT_TIME`: Measurement time in seconds (default: 5)
//! - `BENCH_WARM_UP_TIME`: Warm-up time in seconds (default: 3)
//!
//! # Examples
//!
//! ```bash
//! BENCH_SAMPLE_SIZE=50 BENCH_MEASUREMENT_TIME=3 cargo bench
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};
use std::hint::black_box;
use std::str::FromStr;
use std::time::Duration;

use avrowalk::{flatten, walk, SchemaError, SchemaTree, WalkOptions};

/// Read a `BENCH_*` setting, warning on values that do not parse.
fn bench_setting<T: FromStr>(var: &str) -> Option<T> {
    let raw = std::env::var(var).ok()?;
    let parsed = raw.parse().ok();
    if parsed.is_none() {
        eprintln!("Warning: ignoring {}={:?}", var, raw);
    }
    parsed
}

fn configure_criterion() -> Criterion {
    let mut criterion = Criterion::default();
    if let Some(samples) = bench_setting::<usize>("BENCH_SAMPLE_SIZE") {
        criterion = criterion.sample_size(samples);
    }
    if let Some(secs) = bench_setting::<u64>("BENCH_MEASUREMENT_TIME") {
        criterion = criterion.measurement_time(Duration::from_secs(secs));
    }
    if let Some(secs) = bench_setting::<u64>("BENCH_WARM_UP_TIME") {
        criterion = criterion.warm_up_time(Duration::from_secs(secs));
    }
    criterion
}

/// A record with `width` fields cycling through primitives and containers
fn wide_record(width: usize) -> Value {
    let fields: Vec<Value> = (0..width)
        .map(|i| {
            let ty = match i % 4 {
                0 => json!("long"),
                1 => json!(["null", "string"]),
                2 => json!({"type": "array", "items": "double"}),
                _ => json!({"type": "map", "values": "bytes"}),
            };
            json!({"name": format!("f{}", i), "type": ty})
        })
        .collect();
    json!({"type": "record", "name": "Wide", "namespace": "bench", "fields": fields})
}

/// Records nested `depth` levels deep, the innermost pointing back at the root
fn nested_record(depth: usize) -> Value {
    let mut schema = json!({
        "type": "record",
        "name": format!("Level{}", depth),
        "fields": [{"name": "back", "type": ["null", "bench.l0.Level0"]}]
    });
    for level in (0..depth).rev() {
        schema = json!({
            "type": "record",
            "name": format!("Level{}", level),
            "namespace": format!("bench.l{}", level % 3),
            "fields": [
                {"name": "value", "type": "int"},
                {"name": "child", "type": schema}
            ]
        });
    }
    schema
}

/// `count` enums, each referred to through an alias
fn alias_heavy(count: usize) -> Value {
    let mut fields = Vec::with_capacity(count * 2);
    for i in 0..count {
        fields.push(json!({
            "name": format!("def{}", i),
            "type": {
                "type": "enum",
                "name": format!("E{}", i),
                "aliases": [format!("OldE{}", i)],
                "symbols": ["A", "B"]
            }
        }));
        fields.push(json!({"name": format!("use{}", i), "type": format!("OldE{}", i)}));
    }
    json!({"type": "record", "name": "Aliases", "namespace": "bench", "fields": fields})
}

fn count_nodes(roots: &[Value]) -> usize {
    walk(roots, |n: usize, _, _| Ok::<_, SchemaError>(n + 1), || 0)
        .map(|counts| counts.into_iter().sum())
        .unwrap_or(0)
}

/// Benchmark the visitor fold over schemas of increasing width
fn bench_wide_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("wide_record_walk");

    for width in [10, 100, 1_000] {
        let roots = vec![wide_record(width)];
        group.throughput(Throughput::Elements(count_nodes(&roots) as u64));
        group.bench_with_input(BenchmarkId::new("walk", width), &roots, |b, roots| {
            b.iter(|| {
                let counts =
                    walk(roots, |n: usize, _, _| Ok::<_, SchemaError>(n + 1), || 0).unwrap();
                black_box(counts)
            });
        });
    }

    group.finish();
}

/// Benchmark deep nesting, where the type chain check dominates
fn bench_nested_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested_record_walk");

    for depth in [8, 64, 256] {
        let roots = vec![nested_record(depth)];
        group.throughput(Throughput::Elements(count_nodes(&roots) as u64));
        group.bench_with_input(BenchmarkId::new("flatten", depth), &roots, |b, roots| {
            b.iter(|| black_box(flatten(roots, &WalkOptions::default()).unwrap()));
        });
    }

    group.finish();
}

/// Benchmark reference resolution through aliases
fn bench_alias_references(c: &mut Criterion) {
    let mut group = c.benchmark_group("alias_reference_walk");

    for count in [10, 100, 1_000] {
        let roots = vec![alias_heavy(count)];
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("walk", count), &roots, |b, roots| {
            b.iter(|| {
                let refs = walk(
                    roots,
                    |n: usize, visit, _| Ok::<_, SchemaError>(n + visit.is_reference as usize),
                    || 0,
                )
                .unwrap();
                black_box(refs)
            });
        });
    }

    group.finish();
}

/// Benchmark building the linked tree view
fn bench_tree_build(c: &mut Criterion) {
    let roots = vec![wide_record(500), nested_record(32)];

    c.bench_function("tree_build", |b| {
        b.iter(|| black_box(SchemaTree::build(&roots, &WalkOptions::default()).unwrap()));
    });
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets = bench_wide_records, bench_nested_records, bench_alias_references, bench_tree_build
}

criterion_main!(benches);
