//! Combat phase: target selection.

use std::cmp::Reverse;

use tracing::debug;

use crate::ai::{ready_unit, roster};
use crate::error::AiError;
use crate::game::{Coord, MatchState, PlayerId, Unit, UnitId, opponent};

/// Ranking key for an enemy unit: killable first, then dearer, then weaker.
type TargetRank = (bool, u32, Reverse<u32>, Reverse<UnitId>);

/// The tile a unit should strike, if any.
///
/// The enemy heart wins whenever it can be hit. Otherwise the legal enemy
/// target that ranks highest.
pub(super) fn choose_target(state: &MatchState, unit: &Unit) -> Option<Coord> {
    let enemy = opponent(unit.owner);
    if let Some(heart) = state.heart_of(enemy) {
        if state.can_attack(unit.id, heart.pos) {
            return Some(heart.pos);
        }
    }

    let attack = unit.effective_attack();
    state
        .units_of(enemy)
        .filter(|target| state.can_attack(unit.id, target.pos))
        .max_by_key(|target| rank(state, attack, target))
        .map(|target| target.pos)
}

fn rank(state: &MatchState, attack: u32, target: &Unit) -> TargetRank {
    let cost = state.archetype(target.kind).map_or(0, |a| a.stats.cost);
    (target.hp <= attack, cost, Reverse(target.hp), Reverse(target.id))
}

/// Each ready unit attacks at most once. Returns the units that attacked.
pub(super) fn attack_all(state: &mut MatchState, player: PlayerId) -> Result<Vec<UnitId>, AiError> {
    let mut attackers = Vec::new();
    for id in roster(state, player) {
        if state.is_over() {
            break;
        }
        let Some(target) = ready_unit(state, id).and_then(|unit| choose_target(state, unit)) else {
            continue;
        };
        let report = state.attack(id, target)?;
        debug!(unit = %id, %target, damage = report.damage, killed = report.killed, "ai attack");
        attackers.push(id);
    }
    Ok(attackers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::UnitType;
    use crate::game::test_support::{duel_state, place};

    #[test]
    fn test_heart_beats_units() {
        let mut state = duel_state();
        let heart = state.heart_of(2).unwrap().pos;
        let archer = place(&mut state, UnitType::Archer, 1, Coord::new(heart.x + 1, heart.y + 1));
        place(&mut state, UnitType::Scout, 2, Coord::new(heart.x + 2, heart.y + 1));

        let unit = state.unit(archer).unwrap();
        assert_eq!(choose_target(&state, unit), Some(heart));
    }

    #[test]
    fn test_killable_beats_expensive() {
        let mut state = duel_state();
        let archer = place(&mut state, UnitType::Archer, 1, Coord::new(1, 5));
        let tank = place(&mut state, UnitType::Tank, 2, Coord::new(1, 6));
        let scout = place(&mut state, UnitType::Scout, 2, Coord::new(2, 5));
        state.unit_mut(scout).unwrap().hp = 2;

        let unit = state.unit(archer).unwrap();
        assert_eq!(choose_target(&state, unit), Some(Coord::new(2, 5)));

        state.unit_mut(scout).unwrap().hp = 3;
        let unit = state.unit(archer).unwrap();
        assert_eq!(
            choose_target(&state, unit),
            Some(state.unit(tank).unwrap().pos)
        );
    }

    #[test]
    fn test_lower_hp_breaks_cost_tie() {
        let mut state = duel_state();
        let archer = place(&mut state, UnitType::Archer, 1, Coord::new(1, 5));
        place(&mut state, UnitType::Medic, 2, Coord::new(1, 6));
        let builder = place(&mut state, UnitType::Builder, 2, Coord::new(2, 5));
        state.unit_mut(builder).unwrap().hp = 4;

        let unit = state.unit(archer).unwrap();
        assert_eq!(choose_target(&state, unit), Some(Coord::new(2, 5)));
    }

    #[test]
    fn test_attack_all_records_attackers() {
        let mut state = duel_state();
        let soldier = place(&mut state, UnitType::Soldier, 1, Coord::new(1, 5));
        let idle = place(&mut state, UnitType::Scout, 1, Coord::new(9, 9));
        let enemy = place(&mut state, UnitType::Tank, 2, Coord::new(1, 6));

        let attackers = attack_all(&mut state, 1).unwrap();
        assert_eq!(attackers, vec![soldier]);
        assert!(!attackers.contains(&idle));
        assert_eq!(state.unit(enemy).unwrap().hp, 10);
    }
}
