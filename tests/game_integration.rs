//! Multi-turn integration tests for complete AI-vs-AI matches.
//!
//! These tests verify that matches run to completion on generated maps,
//! replay identically from the same seed and never leave the state
//! inconsistent along the way.
//!
//! Run with: cargo test --release game_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::cell::RefCell;
use std::rc::Rc;

use nexus_tactics::game::{GameEvent, Seat, StateObserver, check_invariants};
use nexus_tactics::tournament::{MatchConfig, TournamentStats, generate_layout, play_match, run_match};
use nexus_tactics::{AiConfig, AiPolicy, MatchState, Outcome, RulesConfig, Session};

fn config(max_turns: u32) -> MatchConfig {
    MatchConfig {
        rules: RulesConfig {
            max_turns,
            ..RulesConfig::default()
        },
        ai: AiConfig::default(),
    }
}

type Shared<T> = Rc<RefCell<Vec<T>>>;

/// Checks every invariant after every event.
struct InvariantWatcher(Shared<String>);

impl StateObserver for InvariantWatcher {
    fn on_event(&mut self, event: &GameEvent, state: &MatchState) {
        self.0.borrow_mut().extend(
            check_invariants(state)
                .into_iter()
                .map(|v| format!("{v} after {event:?}")),
        );
    }
}

/// Records every event.
struct Recorder(Shared<GameEvent>);

impl StateObserver for Recorder {
    fn on_event(&mut self, event: &GameEvent, _state: &MatchState) {
        self.0.borrow_mut().push(event.clone());
    }
}

#[test]
fn test_full_match_completes() {
    let result = run_match(42, &config(200)).unwrap();
    assert!(result.turns <= 201);
    assert_eq!(result.controller_faults, 0);
    assert_eq!(result.players.len(), 2);
}

#[test]
fn test_same_seed_same_result() {
    let config = config(120);
    for seed in [1, 7, 99] {
        assert_eq!(run_match(seed, &config).unwrap(), run_match(seed, &config).unwrap());
    }
}

#[test]
fn test_multiple_seeds_no_fault() {
    let config = config(100);
    let mut stats = TournamentStats::default();
    for seed in 0..20 {
        let result = run_match(seed, &config).unwrap();
        assert_eq!(result.controller_faults, 0, "seed {seed}");
        stats.add_result(&result);
    }
    assert_eq!(stats.games_played, 20);
    assert_eq!(stats.wins[0] + stats.wins[1] + stats.draws, 20);
}

#[test]
fn test_outcome_matches_final_hp() {
    for seed in 0..10 {
        let (result, state) = play_match(seed, &config(80), None).unwrap();
        let (one, two) = (state.player(1).hp, state.player(2).hp);
        match result.outcome {
            Outcome::Winner(1) => assert!(two <= 0 || one > two, "seed {seed}"),
            Outcome::Winner(_) => assert!(one <= 0 || two > one, "seed {seed}"),
            Outcome::Draw => assert!((one <= 0 && two <= 0) || one == two, "seed {seed}"),
        }
    }
}

#[test]
fn test_invariants_hold_after_every_event() {
    let rules = config(60).rules;
    for seed in 0..5 {
        let layout = generate_layout(seed, &rules).unwrap();
        let state = MatchState::new(layout, rules, seed);
        let violations = Shared::default();
        let mut session = Session::new(
            state,
            Seat::Controller(Box::new(AiPolicy::new(AiConfig::default()))),
            Seat::Controller(Box::new(AiPolicy::new(AiConfig::default()))),
        )
        .with_observer(Box::new(InvariantWatcher(violations.clone())));
        session.start().unwrap();

        assert!(violations.borrow().is_empty(), "seed {seed}: {:?}", violations.borrow());
        assert!(session.state().is_over(), "seed {seed}");
        assert!(check_invariants(session.state()).is_empty(), "seed {seed}");
    }
}

#[test]
fn test_observer_sees_game_over() {
    let seen = Shared::default();
    let (result, _) = play_match(3, &config(40), Some(Box::new(Recorder(seen.clone())))).unwrap();

    let events = seen.borrow();
    assert!(matches!(
        events.last(),
        Some(GameEvent::GameOver { outcome }) if *outcome == result.outcome
    ));
    let ends = events
        .iter()
        .filter(|e| matches!(e, GameEvent::TurnEnded { .. }))
        .count();
    assert!(ends >= 1);
}

#[test]
fn test_small_board_match() {
    let mut config = config(60);
    config.rules.board_size = 7;
    let result = run_match(5, &config).unwrap();
    assert!(result.turns <= 61);
}
