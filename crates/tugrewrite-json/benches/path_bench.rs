// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Benchmarks for parsing, printing and path matching.
//!
//! Run with:
//! ```bash
//! cargo bench -p tugrewrite-json
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use tugrewrite_core::{Cursor, RecipeRunner, RunOptions, VisitResult};
use tugrewrite_json::{parse, print, ChangeValue, Json, JsonPathMatcher, JsonVisitor};

// =============================================================================
// Test Data Generation
// =============================================================================

/// A JSON5 document with `count` commented entries.
fn generate_document(count: usize) -> String {
    let mut source = String::from("{\n  // generated\n  \"items\": [\n");
    for i in 0..count {
        source.push_str(&format!(
            "    {{ \"name\": \"item_{i}\", \"weight\": {i}, tags: ['a', 'b'], /* entry {i} */ }},\n"
        ));
    }
    source.push_str("  ],\n  \"meta\": { \"count\": ");
    source.push_str(&count.to_string());
    source.push_str(" }\n}\n");
    source
}

/// Counts the cursors the matcher accepts.
struct CountMatches<'m> {
    matcher: &'m JsonPathMatcher,
    count: usize,
}

impl JsonVisitor<()> for CountMatches<'_> {
    fn pre_visit(&mut self, _tree: &Json, cursor: &Cursor<'_, Json>, _: &mut ()) -> VisitResult {
        if self.matcher.matches(cursor).unwrap_or(false) {
            self.count += 1;
        }
        VisitResult::Continue
    }
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for size in [10, 100, 1000] {
        let source = generate_document(size);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{size}_items")),
            &source,
            |b, source| b.iter(|| parse(black_box(source))),
        );
    }
    group.finish();
}

fn bench_print(c: &mut Criterion) {
    let mut group = c.benchmark_group("print");
    for size in [10, 100, 1000] {
        let source = generate_document(size);
        let json = parse(&source).unwrap();
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{size}_items")),
            &json,
            |b, json| b.iter(|| print(black_box(json))),
        );
    }
    group.finish();
}

fn bench_matcher(c: &mut Criterion) {
    let mut group = c.benchmark_group("matcher");
    let json = parse(&generate_document(100)).unwrap();
    for expression in [
        "$.meta.count",
        "$.items[*].name",
        "$.items[-5:]",
        "$.items[?(@.name == 'item_50')]",
        "$.items[?(@.name =~ /item_9.*/)]",
        "$..weight",
    ] {
        let matcher = JsonPathMatcher::new(expression).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(expression),
            &matcher,
            |b, matcher| {
                b.iter(|| {
                    let mut visitor = CountMatches { matcher, count: 0 };
                    visitor.visit(black_box(&json), None, &mut ());
                    visitor.count
                })
            },
        );
    }
    group.finish();
}

fn bench_recipe(c: &mut Criterion) {
    let mut group = c.benchmark_group("change_value");
    let recipe = ChangeValue::new("$.items[?(@.name == 'item_7')]", "null").unwrap();
    let documents: Vec<Json> = (0..32)
        .map(|_| parse(&generate_document(50)).unwrap())
        .collect();
    for (name, options) in [
        ("sequential", RunOptions::sequential()),
        ("parallel", RunOptions::default()),
    ] {
        let runner = RecipeRunner::new(options);
        group.bench_function(name, |b| b.iter(|| runner.run(&recipe, black_box(&documents))));
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_print, bench_matcher, bench_recipe);
criterion_main!(benches);
