//! Benchmarks for running complete matches.
//!
//! This benchmarks the full AI-vs-AI loop plus the two hot spots inside it:
//! reachability and the AI turn.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use nexus_tactics::game::TurnController;
use nexus_tactics::tournament::{MatchConfig, generate_layout, run_match};
use nexus_tactics::{AiConfig, AiPolicy, MatchState, RulesConfig, UnitType};

fn bench_single_match(c: &mut Criterion) {
    let config = MatchConfig::default();

    c.bench_function("single_match", |b| {
        b.iter(|| {
            let result = run_match(black_box(42), black_box(&config));
            black_box(result)
        });
    });
}

fn bench_match_batch(c: &mut Criterion) {
    // Ten matches back to back, without parallel overhead
    let config = MatchConfig::default();

    c.bench_function("10_matches_sequential", |b| {
        b.iter(|| {
            for seed in 0..10u64 {
                let result = run_match(black_box(seed), black_box(&config));
                let _ = black_box(result);
            }
        });
    });
}

fn bench_large_board(c: &mut Criterion) {
    let mut config = MatchConfig::default();
    config.rules.board_size = 21;
    config.rules.max_turns = 100;

    c.bench_function("large_board_match", |b| {
        b.iter(|| {
            let result = run_match(black_box(42), black_box(&config));
            black_box(result)
        });
    });
}

fn bench_reachable(c: &mut Criterion) {
    let rules = RulesConfig::default();
    let layout = generate_layout(42, &rules).unwrap();
    let mut state = MatchState::new(layout, rules, 42);
    let spawn = state.placement_tiles(UnitType::Scout, 1)[0];
    let scout = state.place_unit(UnitType::Scout, spawn, 1).unwrap();

    c.bench_function("reachable_scout", |b| {
        b.iter(|| black_box(state.reachable(black_box(scout))));
    });
}

fn bench_ai_turn(c: &mut Criterion) {
    let rules = RulesConfig {
        starting_energy: 20,
        ..RulesConfig::default()
    };
    let layout = generate_layout(7, &rules).unwrap();
    let state = MatchState::new(layout, rules, 7);

    c.bench_function("ai_opening_turn", |b| {
        b.iter(|| {
            let mut state = state.clone();
            let mut policy = AiPolicy::new(AiConfig::default());
            black_box(policy.take_turn(&mut state))
        });
    });
}

criterion_group!(
    benches,
    bench_single_match,
    bench_match_batch,
    bench_large_board,
    bench_reachable,
    bench_ai_turn
);
criterion_main!(benches);
