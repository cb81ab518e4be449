//! Movement phase: score every reachable tile and step to the best one.

use rand::Rng;

use crate::ai::{AiConfig, ready_unit, roster};
use crate::error::AiError;
use crate::game::{Coord, MatchState, PlayerId, Terrain, Unit, UnitId, opponent};

/// Deterministic part of a tile's score for `unit`.
///
/// Rewards tiles that put enemies and the enemy heart in range or close,
/// standing on a nexus or approaching one not yet owned, and forests.
/// Penalises crowding friendlies and standing inside a ready enemy's range.
/// Invisible enemies are unknown to the scorer.
pub(super) fn score_tile(state: &MatchState, unit: &Unit, at: Coord) -> f64 {
    let enemy = opponent(unit.owner);
    let range = unit.effective_range();
    let mut score = 0.0;

    for foe in state.units_of(enemy).filter(|u| !u.is_invisible()) {
        let d = at.distance(foe.pos);
        score += if d <= range {
            20.0
        } else {
            f64::from(10u32.saturating_sub(d))
        };
        if foe.actions_left > 0 && d <= foe.effective_range() {
            score -= 8.0;
        }
    }

    if let Some(heart) = state.heart_of(enemy) {
        let d = at.distance(heart.pos);
        score += if d <= range {
            30.0
        } else {
            f64::from(20u32.saturating_sub(d))
        };
    }

    for nexus in state.nexuses() {
        let d = at.distance(nexus.pos);
        if d == 0 {
            score += 25.0;
        } else if nexus.owner != Some(unit.owner) {
            score += f64::from(15u32.saturating_sub(d));
        }
    }

    let crowding: u32 = state
        .units_of(unit.owner)
        .filter(|u| u.id != unit.id && u.pos.distance(at) <= 1)
        .map(|_| 1)
        .sum();
    score -= 2.0 * f64::from(crowding);

    if state.board().terrain(at) == Some(Terrain::Forest) {
        score += 5.0;
    }
    score
}

/// The best reachable tile, jittered by the match rng. Ties keep the
/// lowest tile in row-major order.
fn best_tile(state: &mut MatchState, id: UnitId, jitter: f64) -> Option<Coord> {
    let mut tiles: Vec<Coord> = state.reachable(id).into_iter().collect();
    tiles.sort_by_key(|c| (c.y, c.x));

    let scored: Vec<(Coord, f64)> = {
        let unit = state.unit(id)?;
        tiles
            .into_iter()
            .map(|at| (at, score_tile(state, unit, at)))
            .collect()
    };

    let mut best: Option<(Coord, f64)> = None;
    for (at, base) in scored {
        let score = base + state.rng_mut().random::<f64>() * jitter;
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((at, score));
        }
    }
    best.map(|(at, _)| at)
}

/// Move every ready unit that did not attack. Returns the number of moves.
pub(super) fn advance_units(
    state: &mut MatchState,
    player: PlayerId,
    attacked: &[UnitId],
    config: &AiConfig,
) -> Result<u32, AiError> {
    let mut moves = 0;
    for id in roster(state, player) {
        if state.is_over() {
            break;
        }
        if attacked.contains(&id) || ready_unit(state, id).is_none() {
            continue;
        }
        let Some(to) = best_tile(state, id, config.jitter) else {
            continue;
        };
        state.move_unit(id, to)?;
        moves += 1;
    }
    Ok(moves)
}
