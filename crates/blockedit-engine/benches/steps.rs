use criterion::{criterion_group, criterion_main, Criterion};

use blockedit_engine::editing::{Bias, Step, StepMap};

mod common;

fn bench_step_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("steps");
    group.sample_size(10);

    let doc = common::generate_document(100);

    group.bench_function("insert_text", |b| {
        let mut d = doc.clone();
        b.iter(|| {
            let step = Step::InsertText {
                block: std::hint::black_box(50),
                offset: 3,
                text: "test".to_string(),
            };
            let result = step.apply(&mut d).unwrap();
            std::hint::black_box(result);
        });
    });

    group.bench_function("undo_redo_cycle", |b| {
        let mut d = doc.clone();
        b.iter(|| {
            let step = Step::SplitBlock {
                index: std::hint::black_box(25),
                offset: 4,
            };
            let result = step.apply(&mut d).unwrap();
            result.inverse.apply(&mut d).unwrap();
        });
    });

    group.bench_function("move_blocks", |b| {
        let mut d = doc.clone();
        b.iter(|| {
            let there = Step::MoveBlock {
                from: std::hint::black_box(10),
                to: 80,
                count: 5,
            };
            let result = there.apply(&mut d).unwrap();
            result.inverse.apply(&mut d).unwrap();
        });
    });

    group.finish();
}

fn bench_position_mapping(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_map");

    let map = StepMap::of(1_000, 50, 10);
    group.bench_function("map_single_range", |b| {
        b.iter(|| {
            let mut acc = 0usize;
            for pos in 0..2_000 {
                acc = acc.wrapping_add(map.map(std::hint::black_box(pos), Bias::Left));
            }
            std::hint::black_box(acc);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_step_apply, bench_position_mapping);
criterion_main!(benches);
