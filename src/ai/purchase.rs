//! Purchase phase: value-per-energy unit selection and spawn placement.

use tracing::debug;

use crate::ai::AiConfig;
use crate::error::AiError;
use crate::game::{Archetype, Board, Coord, MatchState, PlayerId, Terrain, UnitType, opponent};

/// Terrain composition that shifts unit values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct MapProfile {
    water: usize,
    mountains: usize,
}

impl MapProfile {
    pub(super) fn of(board: &Board) -> Self {
        Self {
            water: board.count_terrain(Terrain::Water),
            mountains: board.count_terrain(Terrain::Mountain),
        }
    }
}

/// Estimated worth of an archetype to a player fielding `army` units.
pub(super) fn unit_value(archetype: &Archetype, profile: MapProfile, army: usize) -> f64 {
    let stats = archetype.stats;
    let traits = archetype.traits;
    let mut value = f64::from(stats.hp) * 0.5
        + f64::from(stats.attack) * 2.0
        + f64::from(stats.range) * 1.5
        + f64::from(stats.movement);

    if traits.can_cross_water && profile.water > 5 {
        value += 10.0;
    }
    if traits.can_fly && profile.mountains > 3 {
        value += 8.0;
    }
    if traits.builder && profile.water > 8 {
        value += 12.0;
    }
    if army == 0 && matches!(archetype.kind, UnitType::Soldier | UnitType::Archer) {
        value += 15.0;
    }
    if army >= 3 && stats.cost >= 5 {
        value += 10.0;
    }
    value
}

/// Buy units until nothing worthwhile is affordable or the cap is hit.
///
/// Returns the number of units bought.
pub(super) fn buy_units(
    state: &mut MatchState,
    player: PlayerId,
    config: &AiConfig,
) -> Result<u32, AiError> {
    let profile = MapProfile::of(state.board());
    let mut bought = 0;
    for _ in 0..config.purchase_cap {
        if state.is_over() {
            break;
        }
        let Some((kind, at)) = best_purchase(state, player, profile) else {
            break;
        };
        state.place_unit(kind, at, player)?;
        debug!(player, %kind, %at, "ai purchase");
        bought += 1;
    }
    Ok(bought)
}

/// The best affordable, not yet fielded kind with a legal tile.
fn best_purchase(
    state: &MatchState,
    player: PlayerId,
    profile: MapProfile,
) -> Option<(UnitType, Coord)> {
    let army = state.units_of(player).count();
    let owned = &state.player(player).purchased;
    let mut best: Option<(f64, UnitType, Coord)> = None;

    for archetype in state.catalog().iter() {
        if owned.contains(&archetype.kind) {
            continue;
        }
        let Ok(cost) = state.check_purchase(archetype.kind, player) else {
            continue;
        };
        let Some(at) = placement_for(state, archetype.kind, player) else {
            continue;
        };
        let value = unit_value(archetype, profile, army);
        if value <= 0.0 {
            continue;
        }
        let ratio = value / f64::from(cost.max(1));
        if best.is_none_or(|(top, ..)| ratio > top) {
            best = Some((ratio, archetype.kind, at));
        }
    }
    best.map(|(_, kind, at)| (kind, at))
}

/// The legal spawn tile closest to the opponent's heart and units.
pub(super) fn placement_for(state: &MatchState, kind: UnitType, player: PlayerId) -> Option<Coord> {
    let enemy = opponent(player);
    let assets: Vec<Coord> = state
        .heart_of(enemy)
        .map(|h| h.pos)
        .into_iter()
        .chain(state.units_of(enemy).map(|u| u.pos))
        .collect();

    state
        .placement_tiles(kind, player)
        .into_iter()
        .min_by_key(|&at| {
            let nearest = assets.iter().map(|&a| at.distance(a)).min().unwrap_or(0);
            (nearest, at)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_support::{duel_state, place};
    use crate::game::Catalog;

    #[test]
    fn test_first_unit_favours_frontline() {
        let catalog = Catalog::standard();
        let profile = MapProfile { water: 0, mountains: 0 };
        let soldier = catalog.get(UnitType::Soldier).unwrap();
        let scout = catalog.get(UnitType::Scout).unwrap();

        let fresh = unit_value(soldier, profile, 0);
        assert!((fresh - unit_value(soldier, profile, 1) - 15.0).abs() < f64::EPSILON);
        assert!((unit_value(scout, profile, 0) - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_wet_maps_favour_water_crossers() {
        let catalog = Catalog::standard();
        let marine = catalog.get(UnitType::Marine).unwrap();
        let dry = unit_value(marine, MapProfile { water: 0, mountains: 0 }, 1);
        let wet = unit_value(marine, MapProfile { water: 9, mountains: 0 }, 1);
        assert!((wet - dry - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_buys_within_budget_and_once_per_kind() {
        let mut state = duel_state();
        state.player_mut(1).energy = 12;
        let bought = buy_units(&mut state, 1, &AiConfig::default()).unwrap();

        assert!(bought >= 2);
        let mut kinds: Vec<_> = state.units_of(1).map(|u| u.kind).collect();
        let total = kinds.len();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), total);
        assert!(state.player(1).energy < 12);
    }

    #[test]
    fn test_purchase_cap_bounds_loop() {
        let mut state = duel_state();
        state.player_mut(1).energy = 20;
        let config = AiConfig {
            purchase_cap: 1,
            ..AiConfig::default()
        };
        assert_eq!(buy_units(&mut state, 1, &config).unwrap(), 1);
    }

    #[test]
    fn test_no_purchase_without_free_tile() {
        let mut state = duel_state();
        let spawner = state.spawners().iter().find(|s| s.owner == 1).unwrap().pos;
        for at in state.board().neighbors(spawner).collect::<Vec<_>>() {
            place(&mut state, UnitType::Tank, 2, at);
        }
        assert_eq!(buy_units(&mut state, 1, &AiConfig::default()).unwrap(), 0);
    }

    #[test]
    fn test_placement_leans_towards_enemy() {
        let state = duel_state();
        let at = placement_for(&state, UnitType::Soldier, 1).unwrap();
        let spawner = state.spawners().iter().find(|s| s.owner == 1).unwrap().pos;
        assert_eq!(at, Coord::new(spawner.x, spawner.y - 1));
    }
}
