#![no_main]

use arbitrary::Arbitrary;
use nexus_tactics::game::{UnitType, check_invariants};
use nexus_tactics::{Coord, Layout, MatchState, RulesConfig};
use libfuzzer_sys::fuzz_target;

/// Structured input for combat fuzzing.
#[derive(Arbitrary, Debug)]
struct CombatInput {
    /// Attacker type, index into the catalog.
    attacker: u8,
    /// Defender type, index into the catalog.
    defender: u8,
    /// Defender hp before the hit.
    defender_hp: u8,
    /// Attack bonus for this turn.
    temp_attack: u8,
    /// Defender terrain bonus.
    defense: u8,
    /// Defender carries a shield.
    shielded: bool,
    /// Attacker's next hit doubles.
    double_damage: bool,
    /// Attacker's next hit executes at or below this hp.
    execute_below: Option<u8>,
    /// Attacker's next hit freezes.
    freeze_next: bool,
    /// Distance between the two units along the row.
    gap: u8,
}

fuzz_target!(|input: CombatInput| {
    let attacker_kind = UnitType::ALL[usize::from(input.attacker) % UnitType::ALL.len()];
    let defender_kind = UnitType::ALL[usize::from(input.defender) % UnitType::ALL.len()];
    let gap = u16::from(input.gap % 8) + 1;

    let layout = match Layout::open(12, 5) {
        Some(layout) => layout,
        None => return,
    };
    let mut state = MatchState::new(layout, RulesConfig::default(), 0);
    let from = Coord::new(1, 2);
    let to = Coord::new(1 + gap, 2);

    // Water-only units cannot stand on open plains; nothing to test.
    let Ok(attacker) = state.insert_unit(attacker_kind, 1, from) else {
        return;
    };
    let Ok(defender) = state.insert_unit(defender_kind, 2, to) else {
        return;
    };

    if let Some(unit) = state.unit_mut(attacker) {
        unit.temp_attack = u32::from(input.temp_attack % 20);
        unit.double_damage = input.double_damage;
        unit.execute_below = input.execute_below.map(|hp| u32::from(hp % 15));
        unit.freeze_next = input.freeze_next;
    }
    if let Some(unit) = state.unit_mut(defender) {
        unit.hp = u32::from(input.defender_hp).clamp(1, unit.max_hp);
        unit.defense_bonus = u32::from(input.defense % 5);
        unit.shielded = input.shielded;
    }

    let before = state.snapshot();
    let hp_before = state.unit(defender).map_or(0, |u| u.hp);

    match state.attack(attacker, to) {
        Ok(report) => {
            let hp_after = state.unit(defender).map_or(0, |u| u.hp);
            assert_eq!(hp_before - hp_after, report.damage, "damage must match hp loss");
            assert_eq!(report.killed, state.unit(defender).is_none());
            if report.absorbed {
                assert_eq!(report.damage, 0);
            }
            if report.froze {
                assert!(!report.killed);
            }
            let actions = state.unit(attacker).map_or(0, |u| u.actions_left);
            assert_eq!(actions, RulesConfig::default().actions_per_turn - 1);
        }
        Err(_) => {
            assert_eq!(state.snapshot(), before, "rejected attack mutated state");
        }
    }

    let violations = check_invariants(&state);
    assert!(
        violations.is_empty(),
        "Invariants violated after combat: {:?}",
        violations
    );
});
