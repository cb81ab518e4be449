//! Reachability: breadth-first search over the four cardinal directions.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::error::ActionError;
use crate::game::{Coord, GameEvent, Marker, MatchState, Terrain, Traits, UnitId};

/// Whether a unit with these traits may stand on the terrain.
#[must_use]
pub const fn terrain_allows(traits: Traits, terrain: Terrain) -> bool {
    if traits.water_only {
        return terrain.is_waterway();
    }
    match terrain {
        Terrain::Wall => false,
        Terrain::Mountain => traits.can_fly,
        Terrain::Water => traits.can_cross_water,
        Terrain::Plain | Terrain::Forest | Terrain::Bridge => true,
    }
}

impl MatchState {
    /// Whether a unit may step onto a tile, ignoring distance.
    fn can_enter(&self, traits: Traits, at: Coord) -> bool {
        let Some(cell) = self.board().get(at) else {
            return false;
        };
        if matches!(cell.marker, Some(Marker::Heart(_))) {
            return false;
        }
        if self.unit_at(at).is_some() {
            return false;
        }
        terrain_allows(traits, cell.terrain)
    }

    /// Tiles a unit can reach within `movement + temp_move` steps.
    ///
    /// The unit's own tile is never included. Unknown units reach nothing.
    #[must_use]
    pub fn reachable(&self, unit: UnitId) -> HashSet<Coord> {
        let mut reached = HashSet::new();
        let Some(unit) = self.unit(unit) else {
            return reached;
        };
        let traits = self.traits_of(unit.kind);
        let budget = unit.effective_movement();

        let mut seen = HashSet::from([unit.pos]);
        let mut queue = VecDeque::from([(unit.pos, 0u32)]);
        while let Some((pos, steps)) = queue.pop_front() {
            if steps == budget {
                continue;
            }
            for next in self.board().neighbors(pos) {
                if seen.contains(&next) || !self.can_enter(traits, next) {
                    continue;
                }
                seen.insert(next);
                reached.insert(next);
                queue.push_back((next, steps + 1));
            }
        }
        reached
    }

    /// Check a move without applying it.
    ///
    /// # Errors
    ///
    /// Returns why the move is illegal.
    pub fn check_move(&self, unit: UnitId, to: Coord) -> Result<(), ActionError> {
        self.acting_unit(unit)?;
        if !self.board().in_bounds(to) {
            return Err(ActionError::OutOfBounds(to));
        }
        if self.unit_at(to).is_some() {
            return Err(ActionError::Occupied(to));
        }
        if !self.reachable(unit).contains(&to) {
            return Err(ActionError::Unreachable(to));
        }
        Ok(())
    }

    /// Whether a move is legal right now.
    #[must_use]
    pub fn can_move_to(&self, unit: UnitId, to: Coord) -> bool {
        self.check_move(unit, to).is_ok()
    }

    /// Move a unit, spending one action.
    ///
    /// Entering a forest sets the unit's defense bonus; any other terrain
    /// clears it. Nexus ownership is updated afterwards.
    ///
    /// # Errors
    ///
    /// Returns an [`ActionError`] and changes nothing if the move is illegal.
    pub fn move_unit(&mut self, unit: UnitId, to: Coord) -> Result<(), ActionError> {
        self.check_move(unit, to)?;

        let defense = if self.board().terrain(to) == Some(Terrain::Forest) {
            self.rules().forest_defense
        } else {
            0
        };
        let Some(mover) = self.unit_mut(unit) else {
            return Err(ActionError::UnknownUnit(unit));
        };
        let from = mover.pos;
        mover.pos = to;
        mover.defense_bonus = defense;
        mover.actions_left -= 1;

        debug!(unit = %unit, %from, %to, "unit moved");
        self.push_event(GameEvent::Moved { unit, from, to });
        self.update_ownership();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::UnitType;
    use crate::game::test_support::{duel_state, place};

    #[test]
    fn test_reachable_respects_budget() {
        let mut state = duel_state();
        let soldier = place(&mut state, UnitType::Soldier, 1, Coord::new(3, 3));
        let reach = state.reachable(soldier);

        assert!(!reach.contains(&Coord::new(3, 3)));
        assert!(reach.contains(&Coord::new(3, 5)));
        assert!(reach.contains(&Coord::new(4, 4)));
        assert!(!reach.contains(&Coord::new(3, 6)));
        // Diamond of radius 2 minus the origin
        assert_eq!(reach.len(), 12);
    }

    #[test]
    fn test_reachable_blocked_by_units_and_walls() {
        let mut state = duel_state();
        let soldier = place(&mut state, UnitType::Soldier, 1, Coord::new(0, 0));
        place(&mut state, UnitType::Scout, 2, Coord::new(1, 0));
        state.set_terrain(Coord::new(0, 1), Terrain::Wall).unwrap();

        assert!(state.reachable(soldier).is_empty());
    }

    #[test]
    fn test_reachable_terrain_affordances() {
        let mut state = duel_state();
        state.set_terrain(Coord::new(1, 0), Terrain::Water).unwrap();
        state.set_terrain(Coord::new(0, 1), Terrain::Mountain).unwrap();
        let soldier = place(&mut state, UnitType::Soldier, 1, Coord::new(0, 0));
        let griffin = place(&mut state, UnitType::Griffin, 1, Coord::new(2, 0));
        let marine = place(&mut state, UnitType::Marine, 1, Coord::new(1, 1));

        let soldier_reach = state.reachable(soldier);
        assert!(!soldier_reach.contains(&Coord::new(1, 0)));
        assert!(!soldier_reach.contains(&Coord::new(0, 1)));

        assert!(state.reachable(griffin).contains(&Coord::new(1, 0)));
        assert!(state.reachable(marine).contains(&Coord::new(1, 0)));
        assert!(!state.reachable(marine).contains(&Coord::new(0, 1)));
    }

    #[test]
    fn test_water_only_stays_on_water() {
        let mut state = duel_state();
        for x in 0..4 {
            state.set_terrain(Coord::new(x, 1), Terrain::Water).unwrap();
        }
        state.set_terrain(Coord::new(4, 1), Terrain::Bridge).unwrap();
        let gunship = place(&mut state, UnitType::Gunship, 1, Coord::new(0, 1));

        let reach = state.reachable(gunship);
        assert!(reach.contains(&Coord::new(3, 1)));
        assert!(!reach.contains(&Coord::new(4, 1)));
        assert!(reach.iter().all(|c| c.y == 1));
    }

    #[test]
    fn test_hearts_are_never_reachable() {
        let mut state = duel_state();
        let heart = state.heart_of(2).unwrap().pos;
        let scout = place(&mut state, UnitType::Scout, 1, Coord::new(heart.x + 1, heart.y));
        assert!(!state.reachable(scout).contains(&heart));
    }

    #[test]
    fn test_move_unit_spends_action_and_sets_forest_bonus() {
        let mut state = duel_state();
        state.set_terrain(Coord::new(3, 4), Terrain::Forest).unwrap();
        let soldier = place(&mut state, UnitType::Soldier, 1, Coord::new(3, 3));

        state.move_unit(soldier, Coord::new(3, 4)).unwrap();
        let unit = state.unit(soldier).unwrap();
        assert_eq!(unit.pos, Coord::new(3, 4));
        assert_eq!(unit.actions_left, 1);
        assert_eq!(unit.defense_bonus, 2);

        state.move_unit(soldier, Coord::new(3, 5)).unwrap();
        assert_eq!(state.unit(soldier).unwrap().defense_bonus, 0);
    }

    #[test]
    fn test_move_unit_rejections() {
        let mut state = duel_state();
        let soldier = place(&mut state, UnitType::Soldier, 1, Coord::new(3, 3));
        let enemy = place(&mut state, UnitType::Soldier, 2, Coord::new(6, 6));

        assert_eq!(
            state.move_unit(soldier, Coord::new(3, 7)),
            Err(ActionError::Unreachable(Coord::new(3, 7)))
        );
        assert_eq!(
            state.move_unit(enemy, Coord::new(6, 7)),
            Err(ActionError::NotYourTurn(2))
        );
        assert_eq!(
            state.move_unit(soldier, Coord::new(6, 6)),
            Err(ActionError::Occupied(Coord::new(6, 6)))
        );
        assert_eq!(state.unit(soldier).unwrap().actions_left, 2);
    }

    #[test]
    fn test_frozen_unit_cannot_move() {
        let mut state = duel_state();
        let soldier = place(&mut state, UnitType::Soldier, 1, Coord::new(3, 3));
        state.unit_mut(soldier).unwrap().frozen_until = Some(1);
        assert!(!state.can_move_to(soldier, Coord::new(3, 4)));
    }

    #[test]
    fn test_temp_move_extends_reach() {
        let mut state = duel_state();
        let soldier = place(&mut state, UnitType::Soldier, 1, Coord::new(3, 3));
        state.unit_mut(soldier).unwrap().temp_move = 1;
        assert!(state.reachable(soldier).contains(&Coord::new(3, 6)));
    }
}
