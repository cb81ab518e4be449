//! Objectives: nexus capture and passive damage, spawners, hearts and unit
//! placement.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ActionError;
use crate::game::{
    Board, Coord, GameEvent, Marker, MatchState, Outcome, PLAYERS, PlayerId, Terrain, UnitId,
    UnitType, opponent, terrain_allows,
};

/// A capturable objective. Ownership persists after the occupant leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nexus {
    /// Tile.
    pub pos: Coord,
    /// Current owner; `None` while neutral.
    pub owner: Option<PlayerId>,
}

impl Nexus {
    /// A neutral nexus.
    #[must_use]
    pub const fn neutral(pos: Coord) -> Self {
        Self { pos, owner: None }
    }
}

/// Placement anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawner {
    /// Tile.
    pub pos: Coord,
    /// Owner.
    pub owner: PlayerId,
}

/// Attackable objective; damage to it reduces the owner's hp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heart {
    /// Tile.
    pub pos: Coord,
    /// Owner.
    pub owner: PlayerId,
}

/// Board and objective positions a match starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Terrain and markers.
    pub board: Board,
    /// Spawners.
    pub spawners: Vec<Spawner>,
    /// Hearts.
    pub hearts: Vec<Heart>,
    /// Nexus tiles; every nexus starts neutral.
    pub nexuses: Vec<Coord>,
}

impl Layout {
    /// An all-plain board with no objectives.
    ///
    /// Returns `None` if width or height is zero.
    #[must_use]
    pub fn open(width: u16, height: u16) -> Option<Self> {
        Some(Self {
            board: Board::new(width, height)?,
            spawners: Vec::new(),
            hearts: Vec::new(),
            nexuses: Vec::new(),
        })
    }

    fn mark(&mut self, pos: Coord, marker: Marker) {
        if self.board.terrain(pos) == Some(Terrain::Wall) {
            self.board.set_terrain(pos, Terrain::Plain);
        }
        self.board.set_marker(pos, Some(marker));
    }

    /// Add a spawner.
    #[must_use]
    pub fn with_spawner(mut self, owner: PlayerId, pos: Coord) -> Self {
        self.mark(pos, Marker::Spawner(owner));
        self.spawners.push(Spawner { pos, owner });
        self
    }

    /// Add a heart.
    #[must_use]
    pub fn with_heart(mut self, owner: PlayerId, pos: Coord) -> Self {
        self.mark(pos, Marker::Heart(owner));
        self.hearts.push(Heart { pos, owner });
        self
    }

    /// Add a neutral nexus.
    #[must_use]
    pub fn with_nexus(mut self, pos: Coord) -> Self {
        self.mark(pos, Marker::Nexus);
        self.nexuses.push(pos);
        self
    }

    /// Set terrain on an unmarked tile. Marked tiles keep their terrain.
    #[must_use]
    pub fn with_terrain(mut self, pos: Coord, terrain: Terrain) -> Self {
        if self.board.marker(pos).is_none() {
            self.board.set_terrain(pos, terrain);
        }
        self
    }

    /// Whether a tile carries any marker.
    #[must_use]
    pub fn is_reserved(&self, pos: Coord) -> bool {
        self.board.marker(pos).is_some()
    }
}

impl MatchState {
    /// Occupied nexuses pass to the occupant's owner; empty ones keep theirs.
    pub fn update_ownership(&mut self) {
        for idx in 0..self.nexuses().len() {
            let nexus = self.nexuses()[idx];
            let Some(occupant) = self.unit_at(nexus.pos).map(|u| u.owner) else {
                continue;
            };
            if nexus.owner != Some(occupant) {
                self.nexuses_mut()[idx].owner = Some(occupant);
                info!(at = %nexus.pos, owner = occupant, "nexus captured");
                self.push_event(GameEvent::NexusCaptured {
                    at: nexus.pos,
                    owner: occupant,
                });
            }
        }
    }

    /// Nexuses owned by a player.
    #[must_use]
    pub fn nexus_count(&self, owner: PlayerId) -> usize {
        self.nexuses()
            .iter()
            .filter(|n| n.owner == Some(owner))
            .count()
    }

    /// Deal passive nexus damage once for the current turn.
    ///
    /// Each nexus owned by a player damages that player's opponent. A second
    /// call within the same turn does nothing. Returns the outcome if a
    /// player has been defeated.
    pub fn apply_periodic_damage(&mut self) -> Option<Outcome> {
        if self.last_nexus_tick == Some(self.turn()) {
            return self.defeat_outcome();
        }
        self.last_nexus_tick = Some(self.turn());

        let per_nexus = self.rules().nexus_damage;
        for owner in PLAYERS {
            let held = u32::try_from(self.nexus_count(owner)).unwrap_or(u32::MAX);
            let amount = held.saturating_mul(per_nexus);
            if amount == 0 {
                continue;
            }
            let target = opponent(owner);
            let player = self.player_mut(target);
            player.take_damage(amount);
            let hp = player.hp;
            debug!(player = target, amount, hp, "nexus damage");
            self.push_event(GameEvent::NexusDamage {
                player: target,
                amount,
                hp,
            });
        }

        self.defeat_outcome()
    }

    /// Win condition on player hp: both down is a draw, one down loses.
    #[must_use]
    pub fn defeat_outcome(&self) -> Option<Outcome> {
        match (self.player(1).is_defeated(), self.player(2).is_defeated()) {
            (true, true) => Some(Outcome::Draw),
            (true, false) => Some(Outcome::Winner(2)),
            (false, true) => Some(Outcome::Winner(1)),
            (false, false) => None,
        }
    }

    /// Empty, unreserved, non-wall tiles orthogonally adjacent to a spawner
    /// owned by `owner`.
    #[must_use]
    pub fn spawn_tiles(&self, owner: PlayerId) -> Vec<Coord> {
        let mut tiles = Vec::new();
        for spawner in self.spawners().iter().filter(|s| s.owner == owner) {
            for at in self.board().neighbors(spawner.pos) {
                let open = !self.is_reserved(at)
                    && self.board().terrain(at) != Some(Terrain::Wall)
                    && self.unit_at(at).is_none();
                if open && !tiles.contains(&at) {
                    tiles.push(at);
                }
            }
        }
        tiles
    }

    /// Spawn tiles a unit of `kind` may stand on.
    #[must_use]
    pub fn placement_tiles(&self, kind: UnitType, owner: PlayerId) -> Vec<Coord> {
        let traits = self.traits_of(kind);
        self.spawn_tiles(owner)
            .into_iter()
            .filter(|&at| {
                self.board()
                    .terrain(at)
                    .is_some_and(|terrain| terrain_allows(traits, terrain))
            })
            .collect()
    }

    /// Why `owner` could not buy `kind` right now, ignoring the tile.
    ///
    /// # Errors
    ///
    /// Returns the first failed purchase precondition.
    pub fn check_purchase(&self, kind: UnitType, owner: PlayerId) -> Result<u32, ActionError> {
        let current = self.ensure_active()?;
        if owner != current {
            return Err(ActionError::NotYourTurn(owner));
        }
        let cost = self
            .archetype(kind)
            .ok_or(ActionError::UnknownUnitType(kind))?
            .stats
            .cost;
        let player = self.player(owner);
        if self.rules().unique_purchases && player.has_purchased(kind) {
            return Err(ActionError::AlreadyPurchased(kind));
        }
        if player.energy < cost {
            return Err(ActionError::InsufficientEnergy {
                need: cost,
                have: player.energy,
            });
        }
        Ok(cost)
    }

    /// Buy a unit and place it next to one of the owner's spawners.
    ///
    /// # Errors
    ///
    /// Returns an [`ActionError`] and changes nothing if the purchase or the
    /// tile is illegal.
    pub fn place_unit(
        &mut self,
        kind: UnitType,
        at: Coord,
        owner: PlayerId,
    ) -> Result<UnitId, ActionError> {
        let cost = self.check_purchase(kind, owner)?;
        self.check_standable(kind, at)?;
        if !self.spawn_tiles(owner).contains(&at) {
            return Err(ActionError::NotAdjacentToSpawner(at));
        }

        let player = self.player_mut(owner);
        player.energy -= cost;
        player.purchased.insert(kind);
        Ok(self.spawn(kind, owner, at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_support::{duel_state, place};

    #[test]
    fn test_place_unit_next_to_spawner() {
        let mut state = duel_state();
        let spawner = state.spawners().iter().find(|s| s.owner == 1).unwrap().pos;
        let at = Coord::new(spawner.x + 1, spawner.y);

        let id = state.place_unit(UnitType::Scout, at, 1).unwrap();
        let unit = state.unit(id).unwrap();
        assert_eq!(unit.pos, at);
        assert_eq!(unit.actions_left, 2);
        assert_eq!(state.player(1).energy, 3);
        assert!(state.player(1).has_purchased(UnitType::Scout));
    }

    #[test]
    fn test_place_unit_rejections_leave_state_untouched() {
        let mut state = duel_state();
        let spawner = state.spawners().iter().find(|s| s.owner == 1).unwrap().pos;
        let next_to = Coord::new(spawner.x - 1, spawner.y);

        assert_eq!(
            state.place_unit(UnitType::Tank, next_to, 1),
            Err(ActionError::InsufficientEnergy { need: 8, have: 5 })
        );
        assert_eq!(
            state.place_unit(UnitType::Scout, Coord::new(0, 0), 1),
            Err(ActionError::NotAdjacentToSpawner(Coord::new(0, 0)))
        );
        assert_eq!(
            state.place_unit(UnitType::Scout, next_to, 2),
            Err(ActionError::NotYourTurn(2))
        );
        assert_eq!(
            state.place_unit(UnitType::Scout, spawner, 1),
            Err(ActionError::Reserved(spawner))
        );
        assert!(state.units().is_empty());
        assert_eq!(state.player(1).energy, 5);
    }

    #[test]
    fn test_one_of_each_rule() {
        let mut state = duel_state();
        state.player_mut(1).energy = 20;
        let spawner = state.spawners().iter().find(|s| s.owner == 1).unwrap().pos;
        state
            .place_unit(UnitType::Scout, Coord::new(spawner.x - 1, spawner.y), 1)
            .unwrap();
        assert_eq!(
            state.place_unit(UnitType::Scout, Coord::new(spawner.x + 1, spawner.y), 1),
            Err(ActionError::AlreadyPurchased(UnitType::Scout))
        );
    }

    #[test]
    fn test_water_only_needs_water_tile() {
        let mut state = duel_state();
        state.player_mut(1).energy = 20;
        let spawner = state.spawners().iter().find(|s| s.owner == 1).unwrap().pos;
        let left = Coord::new(spawner.x - 1, spawner.y);
        let right = Coord::new(spawner.x + 1, spawner.y);
        state.set_terrain(right, Terrain::Water).unwrap();

        assert_eq!(
            state.place_unit(UnitType::Gunship, left, 1),
            Err(ActionError::TerrainForbidden(left))
        );
        assert_eq!(state.placement_tiles(UnitType::Gunship, 1), vec![right]);
        assert!(state.place_unit(UnitType::Gunship, right, 1).is_ok());
    }

    #[test]
    fn test_spawn_tiles_exclude_occupied_and_walls() {
        let mut state = duel_state();
        let spawner = state.spawners().iter().find(|s| s.owner == 1).unwrap().pos;
        let before = state.spawn_tiles(1).len();
        state
            .set_terrain(Coord::new(spawner.x - 1, spawner.y), Terrain::Wall)
            .unwrap();
        place(&mut state, UnitType::Soldier, 2, Coord::new(spawner.x + 1, spawner.y));
        assert_eq!(state.spawn_tiles(1).len(), before - 2);
    }

    #[test]
    fn test_nexus_ownership_is_sticky() {
        let mut state = duel_state();
        let nexus = state.nexuses()[0].pos;
        let next_to = Coord::new(nexus.x - 1, nexus.y);
        let scout = place(&mut state, UnitType::Scout, 1, next_to);

        state.move_unit(scout, nexus).unwrap();
        assert_eq!(state.nexuses()[0].owner, Some(1));

        state.move_unit(scout, next_to).unwrap();
        state.update_ownership();
        assert_eq!(state.nexuses()[0].owner, Some(1));
    }

    #[test]
    fn test_periodic_damage_once_per_turn() {
        let mut state = duel_state();
        state.nexuses_mut()[0].owner = Some(1);

        assert_eq!(state.apply_periodic_damage(), None);
        assert_eq!(state.player(2).hp, 19);
        assert_eq!(state.apply_periodic_damage(), None);
        assert_eq!(state.player(2).hp, 19);
        assert_eq!(state.player(1).hp, 20);
    }

    #[test]
    fn test_periodic_damage_double_defeat_is_draw() {
        let mut state = duel_state();
        state.nexuses_mut()[0].owner = Some(1);
        state.nexuses_mut()[1].owner = Some(2);
        state.player_mut(1).hp = 1;
        state.player_mut(2).hp = 1;

        assert_eq!(state.apply_periodic_damage(), Some(Outcome::Draw));
    }
}
