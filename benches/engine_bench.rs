//! Benchmarks for the hand engine.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use blackjack_table::engine::{score_hand, Hand};
use blackjack_table::sim::{play_round, SimConfig, Simulator, StandOn};

fn score_hand_benchmark(c: &mut Criterion) {
    let hand = Hand::parse("AsAh5c2dAd4s").unwrap();

    c.bench_function("score_hand_three_aces", |b| {
        b.iter(|| black_box(score_hand(black_box(hand.cards()))))
    });
}

fn single_round_benchmark(c: &mut Criterion) {
    let policy = StandOn::default();
    let mut rng = StdRng::seed_from_u64(42);

    c.bench_function("play_round_stand_on_17", |b| {
        b.iter(|| black_box(play_round(&policy, &mut rng)))
    });
}

fn simulation_benchmark(c: &mut Criterion) {
    c.bench_function("simulate_100k_rounds", |b| {
        b.iter(|| {
            let config = SimConfig::default().with_seed(42);
            let sim = Simulator::new(StandOn::default(), config).unwrap();
            sim.run(black_box(100_000)).unwrap()
        })
    });
}

criterion_group!(
    benches,
    score_hand_benchmark,
    single_round_benchmark,
    simulation_benchmark
);
criterion_main!(benches);
