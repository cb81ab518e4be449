//! Builder actions: raising and demolishing walls, bridging water.

use crate::error::ActionError;
use crate::game::{Coord, MatchState, Terrain, UnitId};

/// A terrain change a builder can make on an adjacent tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construction {
    /// Plain or forest becomes a wall.
    Wall,
    /// A wall becomes plain.
    Demolish,
    /// Water becomes a bridge.
    Bridge,
}

impl MatchState {
    /// Check a builder action without applying it.
    ///
    /// # Errors
    ///
    /// Returns why the action is illegal.
    pub fn check_construction(
        &self,
        unit: UnitId,
        at: Coord,
        work: Construction,
    ) -> Result<Terrain, ActionError> {
        let builder = self.acting_unit(unit)?;
        if !self.traits_of(builder.kind).builder {
            return Err(ActionError::NotABuilder(unit));
        }
        let terrain = self.board().terrain(at).ok_or(ActionError::OutOfBounds(at))?;
        if builder.pos.distance(at) != 1 {
            return Err(ActionError::NotAdjacent(at));
        }

        match work {
            Construction::Wall => {
                if self.is_reserved(at) {
                    return Err(ActionError::Reserved(at));
                }
                if self.unit_at(at).is_some() {
                    return Err(ActionError::Occupied(at));
                }
                match terrain {
                    Terrain::Plain | Terrain::Forest => Ok(Terrain::Wall),
                    _ => Err(ActionError::TerrainForbidden(at)),
                }
            }
            Construction::Demolish => match terrain {
                Terrain::Wall => Ok(Terrain::Plain),
                _ => Err(ActionError::NoTarget(at)),
            },
            Construction::Bridge => match terrain {
                Terrain::Water => Ok(Terrain::Bridge),
                _ => Err(ActionError::NoTarget(at)),
            },
        }
    }

    fn construct(&mut self, unit: UnitId, at: Coord, work: Construction) -> Result<(), ActionError> {
        let result = self.check_construction(unit, at, work)?;
        self.spend_action(unit);
        self.change_terrain(at, result);
        Ok(())
    }

    /// Raise a wall on an adjacent empty, unmarked plain or forest tile.
    ///
    /// # Errors
    ///
    /// Returns an [`ActionError`] and changes nothing if the action is illegal.
    pub fn build_wall(&mut self, unit: UnitId, at: Coord) -> Result<(), ActionError> {
        self.construct(unit, at, Construction::Wall)
    }

    /// Turn an adjacent wall back into plain ground.
    ///
    /// # Errors
    ///
    /// Returns an [`ActionError`] and changes nothing if the action is illegal.
    pub fn break_wall(&mut self, unit: UnitId, at: Coord) -> Result<(), ActionError> {
        self.construct(unit, at, Construction::Demolish)
    }

    /// Bridge an adjacent water tile.
    ///
    /// # Errors
    ///
    /// Returns an [`ActionError`] and changes nothing if the action is illegal.
    pub fn build_bridge(&mut self, unit: UnitId, at: Coord) -> Result<(), ActionError> {
        self.construct(unit, at, Construction::Bridge)
    }
}
