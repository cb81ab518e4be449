//! Ability phase: evaluate each active ability's hint against the board.

use crate::ai::{AiConfig, ready_unit, roster};
use crate::error::AiError;
use crate::game::{AiHint, Coord, MatchState, PlayerId, Terrain, Unit, opponent};

/// Invoke at most one ability per ready unit. Returns the number invoked.
pub(super) fn use_abilities(
    state: &mut MatchState,
    player: PlayerId,
    config: &AiConfig,
) -> Result<u32, AiError> {
    let mut used = 0;
    for id in roster(state, player) {
        if state.is_over() {
            break;
        }
        let Some(unit) = ready_unit(state, id) else {
            continue;
        };
        let choice = state
            .abilities_of(id)
            .into_iter()
            .find_map(|(index, ability)| {
                let hint = ability.hint()?;
                hint_holds(state, unit, hint, config).then_some(index)
            });
        if let Some(index) = choice {
            state.use_ability(id, index)?;
            used += 1;
        }
    }
    Ok(used)
}

/// Positions of visible enemy units and the enemy heart.
fn targets(state: &MatchState, unit: &Unit) -> Vec<Coord> {
    let enemy = opponent(unit.owner);
    state
        .units_of(enemy)
        .filter(|u| !u.is_invisible())
        .map(|u| u.pos)
        .chain(state.heart_of(enemy).map(|h| h.pos))
        .collect()
}

fn visible_enemies_in_range<'a>(state: &'a MatchState, unit: &Unit) -> impl Iterator<Item = &'a Unit> {
    let (owner, pos, range) = (unit.owner, unit.pos, unit.effective_range());
    state
        .units()
        .iter()
        .filter(move |u| u.owner != owner && !u.is_invisible() && u.pos.distance(pos) <= range)
}

/// Whether the situation calls for the ability described by `hint`.
pub(super) fn hint_holds(state: &MatchState, unit: &Unit, hint: AiHint, config: &AiConfig) -> bool {
    let range = unit.effective_range();
    let nearest = targets(state, unit)
        .into_iter()
        .map(|at| at.distance(unit.pos))
        .min();
    let threatened = !state
        .visible_enemies_near(unit.owner, unit.pos, config.threat_radius)
        .is_empty();

    match hint {
        AiHint::TargetOutOfReach => {
            unit.temp_move == 0
                && nearest.is_some_and(|d| d > unit.effective_movement() + range)
        }
        AiHint::EnemyInRange { extra_range } => nearest.is_some_and(|d| d <= range + extra_range),
        AiHint::UnitStrikeReady => {
            let heart_open = state
                .heart_of(opponent(unit.owner))
                .is_some_and(|h| state.can_attack(unit.id, h.pos));
            !unit.double_damage && !heart_open && visible_enemies_in_range(state, unit).next().is_some()
        }
        AiHint::EnemiesInRange { min } => visible_enemies_in_range(state, unit).count() >= min,
        AiHint::BeyondRange { extra } => nearest.is_some_and(|d| d > range && d <= range + extra),
        AiHint::ExecuteInRange => {
            let threshold = state.rules().execute_threshold;
            unit.execute_below.is_none()
                && visible_enemies_in_range(state, unit).any(|u| u.hp <= threshold)
        }
        AiHint::StrongTargetInRange { min_hp } => {
            !unit.freeze_next && visible_enemies_in_range(state, unit).any(|u| u.hp >= min_hp)
        }
        AiHint::WoundedAllyAdjacent => state
            .units_of(unit.owner)
            .any(|u| u.id != unit.id && u.pos.distance(unit.pos) == 1 && u.is_wounded()),
        AiHint::AdjacentWater => state
            .board()
            .neighbors(unit.pos)
            .any(|at| state.board().terrain(at) == Some(Terrain::Water)),
        AiHint::Guard => !unit.shielded && threatened,
        AiHint::Evade => unit.is_wounded() && !unit.is_invisible() && threatened,
    }
}
