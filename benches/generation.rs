//! Benchmarks for floor generation and field of view.
//!
//! Run with: cargo bench --bench generation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fleshtower::utils::fov::compute_fov;
use fleshtower::{
    generate_floor, ConcreteAction, FloorKind, GameState, GenerationConfig, Settings, WaitAction,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_floor_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("floor_generation");

    for floor in [1u32, 4, 8] {
        let config = GenerationConfig::new(floor);
        group.bench_with_input(BenchmarkId::from_parameter(floor), &config, |b, config| {
            let mut rng = StdRng::seed_from_u64(1);
            b.iter(|| {
                let map = generate_floor(black_box(config), FloorKind::Dungeon, &mut rng);
                black_box(map)
            });
        });
    }

    group.finish();
}

fn bench_fov(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);
    let map = generate_floor(&GenerationConfig::new(3), FloorKind::Dungeon, &mut rng)
        .expect("benchmark floor");
    let origin = map.player_start;

    c.bench_function("fov_radius_8", |b| {
        b.iter(|| black_box(compute_fov(&map, black_box(origin), 8)))
    });
}

fn bench_turns(c: &mut Criterion) {
    c.bench_function("hundred_wait_turns", |b| {
        b.iter(|| {
            let mut state = GameState::new(3, Settings::default()).expect("new game");
            let wait: ConcreteAction = WaitAction::new(state.player_id).into();
            for _ in 0..100 {
                let _ = state.handle_player_action(&wait);
            }
            black_box(state.turn_number)
        })
    });
}

criterion_group!(benches, bench_floor_generation, bench_fov, bench_turns);
criterion_main!(benches);
