//! Performance benchmarks for token counting and prompt rendering
//!
//! Run with: cargo bench --bench token_count_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use repo_prompt_mcp::prompt::{PromptAssembler, SourceFile};
use repo_prompt_mcp::tokens::{BpeCounter, Encoding, TokenCounter};
use std::sync::Arc;

fn source_text(bytes: usize) -> String {
    let line = "fn compute(value: u64) -> u64 { value.wrapping_mul(31).rotate_left(7) }\n";
    line.repeat(bytes / line.len() + 1)[..bytes].to_string()
}

fn bench_count_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("count_by_size");
    let counter = BpeCounter::new(Encoding::Cl100kBase);

    // Per-keystroke recounts should stay well under a millisecond up to ~50 KB
    for size in [1_024, 10 * 1_024, 50 * 1_024] {
        let text = source_text(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| counter.count(black_box(text)));
        });
    }

    group.finish();
}

fn bench_count_by_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("count_by_encoding");
    let text = source_text(10 * 1_024);

    for encoding in [Encoding::Cl100kBase, Encoding::O200kBase, Encoding::P50kBase] {
        let counter = BpeCounter::new(encoding);
        group.bench_with_input(BenchmarkId::from_parameter(encoding), &text, |b, text| {
            b.iter(|| counter.count(black_box(text)));
        });
    }

    group.finish();
}

fn bench_render_prompt(c: &mut Criterion) {
    let assembler = PromptAssembler::new(Arc::new(BpeCounter::new(Encoding::Cl100kBase)));
    let files = (0..50)
        .map(|i| SourceFile::from_path(format!("src/module_{i}.rs"), source_text(4 * 1_024)))
        .collect();
    assembler.initialize(files);

    c.bench_function("render_prompt_50_files", |b| {
        b.iter(|| black_box(assembler.render_prompt()));
    });
}

criterion_group!(
    benches,
    bench_count_by_size,
    bench_count_by_encoding,
    bench_render_prompt
);
criterion_main!(benches);
