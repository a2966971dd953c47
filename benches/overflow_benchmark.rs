use criterion::{Criterion, black_box, criterion_group, criterion_main};
use activity_qa::detector::{Candidate, DetectorConfig, detect_overflow};
use activity_qa::geometry::Rect;

/// A dense slide: a grid of text blocks, some spilling past the right edge
fn slide_candidates(count: usize) -> Vec<Candidate> {
    (0..count)
        .map(|i| {
            let column = (i % 4) as f64;
            let row = (i / 4) as f64;
            let width = if i % 7 == 0 { 180.0 } else { 70.0 };
            Candidate::new(
                format!("p.text.item-{}", i),
                Rect::new(5.0 + column * 85.0, 5.0 + row * 22.0, width, 18.0),
                i % 11 != 0,
            )
        })
        .collect()
}

fn benchmark_detect_overflow(c: &mut Criterion) {
    let reference = Rect::new(0.0, 0.0, 355.0, 647.0);
    let config = DetectorConfig::default();
    let candidates = slide_candidates(120);

    c.bench_function("detect_overflow_120_candidates", |b| {
        b.iter(|| detect_overflow(black_box(Some(&reference)), black_box(&candidates), &config))
    });
}

criterion_group!(benches, benchmark_detect_overflow);
criterion_main!(benches);
