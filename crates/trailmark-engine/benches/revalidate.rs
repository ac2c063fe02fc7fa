use criterion::{Criterion, criterion_group, criterion_main};
use trailmark_engine::{Buffer, WhitespaceMarker};

fn dirty_document(lines: usize) -> String {
    let mut text = String::new();
    for i in 0..lines {
        text.push_str(&format!("let field_{i} = {i};  \n"));
    }
    text
}

fn bench_marker_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("marker");
    group.sample_size(10);

    let content = dirty_document(1_000);
    let buffer = Buffer::from_text(&content);

    group.bench_function("full_scan", |b| {
        b.iter(|| {
            let marker = WhitespaceMarker::new(std::hint::black_box(&buffer));
            std::hint::black_box(marker.cache().len());
        });
    });

    group.bench_function("sync_after_edit", |b| {
        b.iter(|| {
            let mut buffer = Buffer::from_text(&content);
            let mut marker = WhitespaceMarker::new(&buffer);
            let patch = buffer.edit(0..0, "x");
            marker.sync(&buffer, &patch).unwrap();
            std::hint::black_box(marker.cache().len());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_marker_operations);
criterion_main!(benches);
