use criterion::{Criterion, criterion_group, criterion_main};
use lightmark_engine::{classify_lines, estimated_size, outer_markup};

fn synthetic_book(lines: usize) -> Vec<String> {
    (0..lines)
        .map(|i| match i % 4 {
            0 => format!("Chapter {i}"),
            1 => format!("  A quoted passage, number {i}."),
            2 => "A paragraph of prose comfortably past the length cutoff.".to_string(),
            _ => "Short.".to_string(),
        })
        .collect()
}

fn bench_pipeline(c: &mut Criterion) {
    let lines = synthetic_book(500);

    c.bench_function("classify_500_lines", |b| {
        b.iter(|| classify_lines(lines.iter()).unwrap())
    });

    let doc = classify_lines(lines.iter()).unwrap();
    c.bench_function("outer_markup_500_lines", |b| {
        b.iter(|| outer_markup(&doc.tree, doc.root).unwrap())
    });
    c.bench_function("estimated_size_500_lines", |b| {
        b.iter(|| estimated_size(&doc.tree, doc.root).unwrap())
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
