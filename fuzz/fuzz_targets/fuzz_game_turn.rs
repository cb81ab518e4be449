#![no_main]

//! Full match intent fuzzer.
//!
//! This fuzz target drives a generated match with arbitrary intents:
//! 1. Place, move, attack, use abilities, build and demolish
//! 2. End turns, letting the AI play the second seat
//! 3. Check that every rejected intent left the state untouched
//! 4. Check invariants after every step
//!
//! This catches integration bugs that the combat fuzzer misses.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use nexus_tactics::game::{Seat, UnitType, check_invariants};
use nexus_tactics::tournament::generate_layout;
use nexus_tactics::{AiConfig, AiPolicy, Coord, MatchState, RulesConfig, Session, UnitId};

/// A fuzzer-generated intent for the human seat.
#[derive(Arbitrary, Debug, Clone)]
enum FuzzIntent {
    Place { kind: u8, x: u8, y: u8 },
    Move { unit: u8, x: u8, y: u8 },
    Attack { unit: u8, x: u8, y: u8 },
    Ability { unit: u8, index: u8 },
    BuildWall { unit: u8, x: u8, y: u8 },
    BreakWall { unit: u8, x: u8, y: u8 },
    BuildBridge { unit: u8, x: u8, y: u8 },
    EndTurn,
}

/// Structured input for match fuzzing.
#[derive(Arbitrary, Debug)]
struct MatchInput {
    /// Seed for the map and the AI.
    seed: u64,
    /// Board size offset above the minimum.
    size: u8,
    /// Intents for player 1.
    intents: Vec<FuzzIntent>,
}

fuzz_target!(|input: MatchInput| {
    let size = 7 + u16::from(input.size % 8);
    let rules = RulesConfig {
        board_size: size,
        max_turns: 40,
        ..RulesConfig::default()
    };
    let Ok(layout) = generate_layout(input.seed, &rules) else {
        return;
    };
    let state = MatchState::new(layout, rules, input.seed);
    let mut session = Session::new(
        state,
        Seat::Human,
        Seat::Controller(Box::new(AiPolicy::new(AiConfig::default()))),
    );

    for intent in input.intents.iter().take(64) {
        if session.state().is_over() {
            break;
        }
        let before = session.state().snapshot();
        let coord = |x: u8, y: u8| Coord::new(u16::from(x) % size, u16::from(y) % size);
        let unit = |n: u8| UnitId(u32::from(n % 32));

        let rejected = match *intent {
            FuzzIntent::Place { kind, x, y } => {
                let kind = UnitType::ALL[usize::from(kind) % UnitType::ALL.len()];
                session.act(|s| s.place_unit(kind, coord(x, y), 1)).is_err()
            }
            FuzzIntent::Move { unit: n, x, y } => {
                session.act(|s| s.move_unit(unit(n), coord(x, y))).is_err()
            }
            FuzzIntent::Attack { unit: n, x, y } => {
                session.act(|s| s.attack(unit(n), coord(x, y))).is_err()
            }
            FuzzIntent::Ability { unit: n, index } => session
                .act(|s| s.use_ability(unit(n), usize::from(index % 4)))
                .is_err(),
            FuzzIntent::BuildWall { unit: n, x, y } => {
                session.act(|s| s.build_wall(unit(n), coord(x, y))).is_err()
            }
            FuzzIntent::BreakWall { unit: n, x, y } => {
                session.act(|s| s.break_wall(unit(n), coord(x, y))).is_err()
            }
            FuzzIntent::BuildBridge { unit: n, x, y } => {
                session.act(|s| s.build_bridge(unit(n), coord(x, y))).is_err()
            }
            FuzzIntent::EndTurn => {
                assert!(session.end_turn().is_ok(), "end turn refused mid-game");
                false
            }
        };

        if rejected {
            assert_eq!(session.state().snapshot(), before, "rejected {intent:?} mutated state");
        }

        let violations = check_invariants(session.state());
        assert!(
            violations.is_empty(),
            "Invariants violated after {intent:?}: {violations:?}"
        );
    }

    assert_eq!(session.controller_faults(), 0);
});
