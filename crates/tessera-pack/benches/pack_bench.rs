use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tessera_pack::Layout;

fn bench_place(c: &mut Criterion) {
    let mut group = c.benchmark_group("place");

    group.bench_function("uniform_1000x1", |b| {
        b.iter(|| {
            let mut layout = Layout::new(64);
            for i in 0..1000usize {
                black_box(layout.place(i, 1));
            }
            layout
        });
    });

    group.bench_function("mixed_1000", |b| {
        b.iter(|| {
            let mut layout = Layout::new(64);
            for i in 0..1000usize {
                let tier = (i % 5 + 1) as u32;
                black_box(layout.place(i, tier));
            }
            layout
        });
    });

    group.finish();
}

criterion_group!(benches, bench_place);
criterion_main!(benches);
