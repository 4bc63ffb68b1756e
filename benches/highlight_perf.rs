use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use rosp::highlight::{
    build_bookmark_ranges, build_highlight_ranges, deserialize_highlights, serialize_highlights,
};

const DURATION_MS: f64 = 300_000.0;

fn synth_spans(count: usize) -> (Vec<i32>, Vec<i32>) {
    let step = DURATION_MS as i32 / count as i32;
    let starts: Vec<i32> = (0..count as i32).map(|i| i * step).collect();
    let ends: Vec<i32> = starts.iter().map(|s| s + step / 2).collect();
    (starts, ends)
}

fn bench_builders(c: &mut Criterion) {
    let (starts, ends) = synth_spans(5000);
    let bookmarks: Vec<i32> = (0..200).map(|i| i * 1500).collect();
    c.bench_function("object_ranges_5k", |b| {
        b.iter(|| build_highlight_ranges(black_box(&starts), black_box(&ends), DURATION_MS));
    });
    c.bench_function("bookmark_ranges_200", |b| {
        b.iter(|| build_bookmark_ranges(black_box(&bookmarks), DURATION_MS));
    });
}

fn bench_serialization(c: &mut Criterion) {
    let (starts, ends) = synth_spans(5000);
    let ranges = build_highlight_ranges(&starts, &ends, DURATION_MS);
    let serialized = serialize_highlights(&ranges);
    c.bench_function("serialize_ranges", |b| {
        b.iter(|| serialize_highlights(black_box(&ranges)));
    });
    c.bench_function("deserialize_ranges", |b| {
        b.iter(|| deserialize_highlights(black_box(&serialized)));
    });
}

criterion_group!(benches, bench_builders, bench_serialization);
criterion_main!(benches);
