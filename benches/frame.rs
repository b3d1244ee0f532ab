//! Full-frame tick benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ship_duel::{ClassCatalog, FrameInput, MatchConfig, MatchLoop, Playfield, Vec2};

fn scripted_inputs(count: usize) -> Vec<FrameInput> {
    let mut rng = StdRng::seed_from_u64(2024);
    (0..count)
        .map(|_| {
            let mut stick = || Vec2::new(rng.gen_range(-1.0f32..=1.0), rng.gen_range(-1.0f32..=1.0));
            let moves = [stick(), stick()];
            FrameInput::new(1.0, Playfield::default(), moves).sanitized()
        })
        .collect()
}

fn bench_frames(c: &mut Criterion) {
    let catalog = ClassCatalog::builtin();
    let inputs = scripted_inputs(600);

    let mut group = c.benchmark_group("match_loop");
    for (a, b) in [("sidewinder", "bouncer"), ("demolition", "portal"), ("quantum", "retreat")] {
        let (Some(first), Some(second)) = (catalog.get(a), catalog.get(b)) else {
            continue;
        };

        group.bench_function(format!("{a}_vs_{b}_600_frames"), |bencher| {
            bencher.iter_batched(
                || MatchLoop::new((first.clone(), second.clone()), Playfield::default(), MatchConfig::default()),
                |mut match_loop| {
                    for input in &inputs {
                        black_box(match_loop.tick(input));
                    }
                    match_loop
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();

    c.bench_function("snapshot_bincode", |bencher| {
        let mut match_loop = MatchLoop::with_catalog(&catalog, Playfield::default(), MatchConfig::default())
            .unwrap();
        for input in inputs.iter().take(120) {
            match_loop.tick(input);
        }
        bencher.iter(|| black_box(match_loop.snapshot().to_bytes().unwrap()))
    });

    c.bench_function("state_hash", |bencher| {
        let match_loop = MatchLoop::with_catalog(&catalog, Playfield::default(), MatchConfig::default())
            .unwrap();
        bencher.iter(|| black_box(match_loop.compute_hash()))
    });
}

criterion_group!(benches, bench_frames);
criterion_main!(benches);
