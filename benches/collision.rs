//! Collision benchmarks
//!
//! Compares the spatial-hash query against the exact per-segment scan as
//! trails accumulate, to keep the per-tick cost flat over round length.
//!
//! Run with: cargo bench --bench collision

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use kurve_engine::config::SimConfig;
use kurve_engine::game::collision;
use kurve_engine::game::constants::physics::DT;
use kurve_engine::game::game_loop::GameLoop;
use kurve_engine::game::state::GameState;
use kurve_engine::util::vec2::Vec2;
use rand::Rng;

/// Build a state where each player has driven a winding trail of
/// `trail_points` samples, stamped into the grid as the loop would
fn create_state_with_trails(players: usize, trail_points: usize) -> GameState {
    let mut state = GameState::new(SimConfig::default());
    let mut rng = rand::thread_rng();

    for i in 0..players {
        let id = state.add_player(format!("Player{}", i)).unwrap();
        let start = Vec2::new(
            rng.gen_range(2.0..14.0),
            rng.gen_range(2.0..7.0),
        );
        let mut heading: f32 = rng.gen_range(0.0..360.0);
        let player = state.get_player_mut(id).unwrap();
        player.spawn(start, heading);

        let mut position = start;
        for _ in 0..trail_points {
            heading = (heading + rng.gen_range(-3.0..3.0)).rem_euclid(360.0);
            let next = position + Vec2::from_heading_deg(heading) * 0.02;
            // Reflect off the walls rather than clamping into them
            if !state.bounds.contains(next) {
                heading = (heading + 180.0).rem_euclid(360.0);
                continue;
            }
            let player = state.get_player_mut(id).unwrap();
            player.trail.push(next);
            player.position = next;
            position = next;
        }
    }

    state.frame = trail_points as u64;
    let frame = state.frame;
    state.grid.rebuild_from_trails(&state.players, frame);
    state
}

fn bench_grid_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_query");

    for trail_points in [500, 2000, 8000] {
        let state = create_state_with_trails(6, trail_points);
        let probes: Vec<Vec2> = (0..64)
            .map(|i| Vec2::new(1.0 + (i as f32 * 0.21) % 14.0, 1.0 + (i as f32 * 0.13) % 7.0))
            .collect();

        group.throughput(Throughput::Elements(probes.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(trail_points),
            &trail_points,
            |b, _| {
                b.iter(|| {
                    let mut hits = 0u32;
                    for probe in &probes {
                        if collision::check_trail_collision(black_box(*probe), 1, &state) {
                            hits += 1;
                        }
                    }
                    hits
                })
            },
        );
    }
    group.finish();
}

fn bench_exact_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact_scan");

    for trail_points in [500, 2000, 8000] {
        let state = create_state_with_trails(6, trail_points);
        let probes: Vec<Vec2> = (0..64)
            .map(|i| Vec2::new(1.0 + (i as f32 * 0.21) % 14.0, 1.0 + (i as f32 * 0.13) % 7.0))
            .collect();

        group.throughput(Throughput::Elements(probes.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(trail_points),
            &trail_points,
            |b, _| {
                b.iter(|| {
                    let mut hits = 0u32;
                    for probe in &probes {
                        if collision::check_trail_collision_exact(black_box(*probe), 1, &state) {
                            hits += 1;
                        }
                    }
                    hits
                })
            },
        );
    }
    group.finish();
}

fn bench_full_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_tick");

    for players in [2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::from_parameter(players),
            &players,
            |b, &players| {
                b.iter_batched(
                    || {
                        let mut game_loop = GameLoop::new(SimConfig::default());
                        for i in 0..players {
                            game_loop.add_player(format!("Player{}", i));
                        }
                        game_loop.force_reset();
                        game_loop
                    },
                    |mut game_loop| {
                        for _ in 0..60 {
                            black_box(game_loop.advance(DT));
                        }
                        game_loop
                    },
                    criterion::BatchSize::SmallInput,
                )
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_grid_query, bench_exact_scan, bench_full_tick);
criterion_main!(benches);
