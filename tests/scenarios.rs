//! Hand-built scenarios for combat, nexus damage and the AI turn.
//!
//! Each test sets up a small board by hand and checks one rule end to end
//! through the public API.
//!
//! Run with: cargo test scenarios

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::cell::RefCell;
use std::rc::Rc;

use nexus_tactics::game::{
    AbilityContext, AbilityKind, AiHint, AttackTarget, Catalog, Seat, Session, StateObserver,
    StatusExpiry, TurnController, TurnSummary, check_invariants,
};
use nexus_tactics::{
    AbilityError, ActionError, AiConfig, AiPolicy, Coord, GameEvent, Layout, MatchState, Outcome,
    Phase, RulesConfig, UnitType,
};

/// 9x9 open board: spawners on the centre column, hearts on the edges and a
/// single nexus at (4, 4).
fn arena() -> Layout {
    Layout::open(9, 9)
        .unwrap()
        .with_spawner(1, Coord::new(4, 7))
        .with_heart(1, Coord::new(4, 8))
        .with_spawner(2, Coord::new(4, 1))
        .with_heart(2, Coord::new(4, 0))
        .with_nexus(Coord::new(4, 4))
}

fn arena_state(rules: RulesConfig) -> MatchState {
    MatchState::new(arena(), rules, 1)
}

fn misfire(_ctx: &mut AbilityContext<'_>) -> Result<String, AbilityError> {
    Err(AbilityError::Failed("misfire".to_string()))
}

/// The standard catalog with every active ability swapped for one that
/// always fails and that the AI always wants to use.
fn misfiring_catalog() -> Catalog {
    let archetypes = Catalog::standard()
        .iter()
        .cloned()
        .map(|mut archetype| {
            for ability in &mut archetype.abilities {
                if let AbilityKind::Active { .. } = ability.kind {
                    ability.kind = AbilityKind::Active {
                        effect: misfire,
                        hint: AiHint::EnemyInRange { extra_range: 20 },
                    };
                }
            }
            archetype
        })
        .collect();
    Catalog::new(archetypes)
}

/// Counts abilities that ran without effect.
struct MisfireCounter(Rc<RefCell<u32>>);

impl StateObserver for MisfireCounter {
    fn on_event(&mut self, event: &GameEvent, _state: &MatchState) {
        if matches!(event, GameEvent::AbilityUsed { applied: false, .. }) {
            *self.0.borrow_mut() += 1;
        }
    }
}

#[test]
fn test_attack_reduces_hp_and_spends_action() {
    let mut state = arena_state(RulesConfig::default());
    let a = state.insert_unit(UnitType::Soldier, 1, Coord::new(2, 2)).unwrap();
    let b = state.insert_unit(UnitType::Tank, 2, Coord::new(3, 2)).unwrap();
    {
        let attacker = state.unit_mut(a).unwrap();
        attacker.hp = 6;
        attacker.attack = 4;
    }
    state.unit_mut(b).unwrap().hp = 8;
    let actions = state.unit(a).unwrap().actions_left;

    let report = state.attack(a, Coord::new(3, 2)).unwrap();

    assert_eq!(report.damage, 4);
    assert!(!report.killed);
    assert_eq!(state.unit(b).unwrap().hp, 4);
    assert_eq!(state.unit(b).unwrap().pos, Coord::new(3, 2));
    assert_eq!(state.unit(a).unwrap().actions_left, actions - 1);
    assert!(check_invariants(&state).is_empty());
}

#[test]
fn test_shield_absorbs_whole_hit() {
    let mut state = arena_state(RulesConfig::default());
    let a = state.insert_unit(UnitType::Soldier, 1, Coord::new(2, 2)).unwrap();
    let b = state.insert_unit(UnitType::Tank, 2, Coord::new(3, 2)).unwrap();
    state.unit_mut(b).unwrap().shielded = true;
    let hp = state.unit(b).unwrap().hp;

    let report = state.attack(a, Coord::new(3, 2)).unwrap();

    assert_eq!(report.damage, 0);
    assert!(report.absorbed);
    let defender = state.unit(b).unwrap();
    assert!(!defender.shielded);
    assert_eq!(defender.hp, hp);

    // The shield is gone, so the second hit lands.
    state.attack(a, Coord::new(3, 2)).unwrap();
    assert_eq!(state.unit(b).unwrap().hp, hp - 2);
}

#[test]
fn test_lethal_attack_removes_unit() {
    let mut state = arena_state(RulesConfig::default());
    let a = state.insert_unit(UnitType::Tank, 1, Coord::new(2, 2)).unwrap();
    let b = state.insert_unit(UnitType::Scout, 2, Coord::new(2, 3)).unwrap();

    let report = state.attack(a, Coord::new(2, 3)).unwrap();

    assert!(report.killed);
    assert!(state.unit(b).is_none());
    assert!(state.unit_at(Coord::new(2, 3)).is_none());
    assert!(matches!(
        report.target,
        AttackTarget::Unit {
            unit_type: UnitType::Scout,
            ..
        }
    ));
}

#[test]
fn test_freeze_wears_off_at_turn_end() {
    let mut state = arena_state(RulesConfig::default());
    let mage = state.insert_unit(UnitType::FrostMage, 1, Coord::new(2, 2)).unwrap();
    let tank = state.insert_unit(UnitType::Tank, 2, Coord::new(2, 3)).unwrap();
    state.unit_mut(mage).unwrap().freeze_next = true;

    assert!(state.attack(mage, Coord::new(2, 3)).unwrap().froze);
    assert!(state.unit(tank).unwrap().is_frozen());

    state.advance_turn().unwrap();
    assert!(!state.unit(tank).unwrap().is_frozen());
    assert!(state.can_move_to(tank, Coord::new(2, 4)));
}

#[test]
fn test_freeze_can_hold_through_opponent_turn() {
    let rules = RulesConfig {
        status_expiry: StatusExpiry::NextTurn,
        ..RulesConfig::default()
    };
    let mut state = arena_state(rules);
    let mage = state.insert_unit(UnitType::FrostMage, 1, Coord::new(2, 2)).unwrap();
    let tank = state.insert_unit(UnitType::Tank, 2, Coord::new(2, 3)).unwrap();
    state.unit_mut(mage).unwrap().freeze_next = true;
    state.attack(mage, Coord::new(2, 3)).unwrap();

    state.advance_turn().unwrap();
    assert!(state.unit(tank).unwrap().is_frozen());
    assert!(!state.can_move_to(tank, Coord::new(2, 4)));

    state.advance_turn().unwrap();
    assert!(!state.unit(tank).unwrap().is_frozen());
}

#[test]
fn test_held_nexus_damages_opponent_once() {
    let mut state = arena_state(RulesConfig::default());
    let id = state.insert_unit(UnitType::Soldier, 1, Coord::new(4, 5)).unwrap();
    state.move_unit(id, Coord::new(4, 4)).unwrap();
    assert_eq!(state.nexuses()[0].owner, Some(1));
    let hp_one = state.player(1).hp;
    let hp_two = state.player(2).hp;

    state.advance_turn().unwrap();

    assert_eq!(state.player(2).hp, hp_two - 1);
    assert_eq!(state.player(1).hp, hp_one);
    let ticks = state
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::NexusDamage { .. }))
        .count();
    assert_eq!(ticks, 1);
}

#[test]
fn test_nexus_ownership_is_sticky() {
    let mut state = arena_state(RulesConfig::default());
    let id = state.insert_unit(UnitType::Scout, 1, Coord::new(3, 4)).unwrap();
    state.move_unit(id, Coord::new(4, 4)).unwrap();
    state.move_unit(id, Coord::new(1, 4)).unwrap();

    assert_eq!(state.unit_at(Coord::new(4, 4)), None);
    assert_eq!(state.nexuses()[0].owner, Some(1));

    state.advance_turn().unwrap();
    assert_eq!(state.nexuses()[0].owner, Some(1));
    let rival = state.insert_unit(UnitType::Scout, 2, Coord::new(5, 4)).unwrap();
    state.move_unit(rival, Coord::new(4, 4)).unwrap();
    assert_eq!(state.nexuses()[0].owner, Some(2));
}

#[test]
fn test_nexus_damage_can_end_the_game() {
    let rules = RulesConfig {
        starting_hp: 1,
        ..RulesConfig::default()
    };
    let mut state = arena_state(rules);
    let id = state.insert_unit(UnitType::Soldier, 1, Coord::new(4, 5)).unwrap();
    state.move_unit(id, Coord::new(4, 4)).unwrap();

    let phase = state.advance_turn().unwrap();

    assert_eq!(
        phase,
        Phase::GameOver {
            outcome: Outcome::Winner(1)
        }
    );
    assert_eq!(state.advance_turn(), Err(ActionError::GameOver));
}

#[test]
fn test_broke_ai_with_no_units_does_nothing() {
    let rules = RulesConfig {
        starting_energy: 0,
        ..RulesConfig::default()
    };
    let mut state = arena_state(rules);
    let mut policy = AiPolicy::new(AiConfig::default());

    let summary = policy.take_turn(&mut state).unwrap();

    assert_eq!(summary, TurnSummary::default());
    assert_eq!(summary.total(), 0);
    assert_eq!(state.current_player(), Some(1));
    assert_eq!(state.turn(), 1);
}

#[test]
fn test_session_ends_turn_after_idle_ai() {
    let rules = RulesConfig {
        starting_energy: 0,
        ..RulesConfig::default()
    };
    let state = arena_state(rules);
    let mut session = Session::new(
        state,
        Seat::Controller(Box::new(AiPolicy::new(AiConfig::default()))),
        Seat::Human,
    );

    let phase = session.start().unwrap();

    assert_eq!(phase, Phase::PlayerTurn { player: 2 });
    assert_eq!(session.state().turn(), 2);
    assert!(session.state().units().is_empty());
    assert_eq!(session.controller_faults(), 0);
}

#[test]
fn test_ai_turn_survives_failing_abilities() {
    let rules = RulesConfig {
        starting_energy: 20,
        starting_hp: 100,
        ..RulesConfig::default()
    };
    let state = arena_state(rules).with_catalog(misfiring_catalog());
    let misfires = Rc::new(RefCell::new(0));
    let mut session = Session::new(
        state,
        Seat::Human,
        Seat::Controller(Box::new(AiPolicy::new(AiConfig::default()))),
    )
    .with_observer(Box::new(MisfireCounter(misfires.clone())));
    session.start().unwrap();

    for round in 0..5 {
        let phase = session.end_turn().unwrap();
        assert_eq!(phase, Phase::PlayerTurn { player: 1 }, "round {round}");
        assert!(check_invariants(session.state()).is_empty(), "round {round}");
    }

    assert_eq!(session.controller_faults(), 0);
    assert_eq!(session.state().turn(), 11);
    assert!(session.state().units_of(2).count() > 0);
    assert!(*misfires.borrow() > 0);
}

#[test]
fn test_rejected_intent_leaves_state_untouched() {
    let mut state = arena_state(RulesConfig::default());
    let id = state.insert_unit(UnitType::Soldier, 2, Coord::new(2, 2)).unwrap();
    let before = state.snapshot();

    assert_eq!(
        state.move_unit(id, Coord::new(2, 3)),
        Err(ActionError::NotYourTurn(2))
    );
    assert!(state.place_unit(UnitType::Tank, Coord::new(3, 7), 1).is_err());
    assert!(state.attack(id, Coord::new(4, 0)).is_err());

    assert_eq!(state.snapshot(), before);
}

#[test]
fn test_end_turn_sequence_terminates() {
    let rules = RulesConfig {
        max_turns: 10,
        ..RulesConfig::default()
    };
    let mut state = arena_state(rules);
    let mut advances = 0;
    while state.advance_turn().is_ok() {
        advances += 1;
        assert!(advances <= 10);
    }
    assert!(state.is_over());
    assert_eq!(advances, 10);
    assert_eq!(state.outcome(), Some(Outcome::Draw));
}
