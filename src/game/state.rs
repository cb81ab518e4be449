//! Match state management.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ActionError;
use crate::game::{
    Archetype, Board, Catalog, Coord, GameEvent, Heart, Layout, Nexus, PLAYERS, Player, PlayerId,
    Spawner, Terrain, Traits, Unit, UnitId, UnitType, terrain_allows,
};

/// When owned nexuses deal their passive damage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NexusCadence {
    /// Once at every turn advance.
    #[default]
    PerTurn,
    /// Once after both players have acted.
    PerRound,
}

/// When frozen and invisible statuses wear off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusExpiry {
    /// Cleared on every unit at every turn advance.
    #[default]
    EveryTurn,
    /// Held through the opponent's next turn, then cleared.
    NextTurn,
}

/// Rules of a match. Every field has a default; partial JSON is merged over
/// the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Width and height of the square board.
    pub board_size: u16,
    /// Starting player hp.
    pub starting_hp: i32,
    /// Starting player energy.
    pub starting_energy: u32,
    /// Flat energy granted at the start of each turn.
    pub energy_income: u32,
    /// Every this many turns the income bonus applies.
    pub bonus_every: u32,
    /// Extra energy on bonus turns.
    pub bonus_amount: u32,
    /// Energy never exceeds this.
    pub energy_cap: u32,
    /// Actions each unit gets per turn.
    pub actions_per_turn: u32,
    /// Defense bonus of a unit standing in a forest.
    pub forest_defense: u32,
    /// Damage each owned nexus deals per tick.
    pub nexus_damage: u32,
    /// When nexus damage ticks.
    pub nexus_cadence: NexusCadence,
    /// When frozen and invisible wear off.
    pub status_expiry: StatusExpiry,
    /// Each player may field each unit type at most once.
    pub unique_purchases: bool,
    /// Hp restored by a heal.
    pub heal_amount: u32,
    /// Execute readiness kills targets at or below this hp.
    pub execute_threshold: u32,
    /// The match ends after this many turns; higher hp wins.
    pub max_turns: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            board_size: 11,
            starting_hp: 20,
            starting_energy: 5,
            energy_income: 2,
            bonus_every: 3,
            bonus_amount: 1,
            energy_cap: 20,
            actions_per_turn: 2,
            forest_defense: 2,
            nexus_damage: 1,
            nexus_cadence: NexusCadence::PerTurn,
            status_expiry: StatusExpiry::EveryTurn,
            unique_purchases: true,
            heal_amount: 3,
            execute_threshold: 5,
            max_turns: 200,
        }
    }
}

/// How a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "player", rename_all = "snake_case")]
pub enum Outcome {
    /// This player won.
    Winner(PlayerId),
    /// Both players fell together, or the turn limit hit with equal hp.
    Draw,
}

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// The given player may issue intents.
    PlayerTurn {
        /// Active player.
        player: PlayerId,
    },
    /// No further mutation is accepted.
    GameOver {
        /// Result.
        outcome: Outcome,
    },
}

/// Read-only, serializable view of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Turn number.
    pub turn: u32,
    /// Scheduler state.
    pub phase: Phase,
    /// Board cells.
    pub board: Board,
    /// Units in id order.
    pub units: Vec<Unit>,
    /// Both players.
    pub players: Vec<Player>,
    /// Nexuses with ownership.
    pub nexuses: Vec<Nexus>,
    /// Spawners.
    pub spawners: Vec<Spawner>,
    /// Hearts.
    pub hearts: Vec<Heart>,
}

/// Complete match state. The single owned aggregate every intent mutates.
#[derive(Debug, Clone)]
pub struct MatchState {
    board: Board,
    units: Vec<Unit>,
    players: [Player; 2],
    nexuses: Vec<Nexus>,
    spawners: Vec<Spawner>,
    hearts: Vec<Heart>,
    turn: u32,
    phase: Phase,
    pub(crate) last_nexus_tick: Option<u32>,
    next_unit_id: u32,
    rules: RulesConfig,
    catalog: Arc<Catalog>,
    rng: StdRng,
    events: Vec<GameEvent>,
}

impl MatchState {
    /// Create a match on a layout with the standard catalog.
    ///
    /// Player 1 moves first on turn 1. The seed drives every random choice the
    /// AI makes, so the same seed and intents replay identically.
    #[must_use]
    pub fn new(layout: Layout, rules: RulesConfig, seed: u64) -> Self {
        let Layout {
            board,
            spawners,
            hearts,
            nexuses,
        } = layout;
        Self {
            board,
            units: Vec::new(),
            players: PLAYERS.map(|id| Player::new(id, rules.starting_hp, rules.starting_energy)),
            nexuses: nexuses.into_iter().map(Nexus::neutral).collect(),
            spawners,
            hearts,
            turn: 1,
            phase: Phase::PlayerTurn { player: 1 },
            last_nexus_tick: None,
            next_unit_id: 1,
            rules,
            catalog: Arc::new(Catalog::standard()),
            rng: StdRng::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Replace the unit catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }

    /// The board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Active rules.
    #[must_use]
    pub const fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// The unit catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub(crate) fn catalog_handle(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    /// Archetype of a unit kind.
    #[must_use]
    pub fn archetype(&self, kind: UnitType) -> Option<&Archetype> {
        self.catalog.get(kind)
    }

    /// Terrain affordances of a unit kind.
    #[must_use]
    pub fn traits_of(&self, kind: UnitType) -> Traits {
        self.archetype(kind).map(|a| a.traits).unwrap_or_default()
    }

    /// Current turn number, starting at 1.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Scheduler state.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// The player allowed to act, or `None` once the game is over.
    #[must_use]
    pub const fn current_player(&self) -> Option<PlayerId> {
        match self.phase {
            Phase::PlayerTurn { player } => Some(player),
            Phase::GameOver { .. } => None,
        }
    }

    /// Result of the match, once it is over.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::GameOver { outcome } => Some(outcome),
            Phase::PlayerTurn { .. } => None,
        }
    }

    /// Check if the game is over.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver { .. })
    }

    /// All units on the board, in id order.
    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Units owned by a player.
    pub fn units_of(&self, owner: PlayerId) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(move |u| u.owner == owner)
    }

    /// Get a unit by id.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Get a mutable reference to a unit by id.
    #[must_use]
    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    /// The unit standing on a tile.
    #[must_use]
    pub fn unit_at(&self, at: Coord) -> Option<&Unit> {
        self.units.iter().find(|u| u.pos == at)
    }

    /// Get a player by id. Unknown ids map to player 2.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[usize::from(id == 2)]
    }

    /// Get a mutable reference to a player by id.
    #[must_use]
    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[usize::from(id == 2)]
    }

    /// Both players in seat order.
    #[must_use]
    pub const fn players(&self) -> &[Player; 2] {
        &self.players
    }

    /// Nexuses with their ownership.
    #[must_use]
    pub fn nexuses(&self) -> &[Nexus] {
        &self.nexuses
    }

    pub(crate) fn nexuses_mut(&mut self) -> &mut [Nexus] {
        &mut self.nexuses
    }

    /// Spawners.
    #[must_use]
    pub fn spawners(&self) -> &[Spawner] {
        &self.spawners
    }

    /// Hearts.
    #[must_use]
    pub fn hearts(&self) -> &[Heart] {
        &self.hearts
    }

    /// The heart owned by a player.
    #[must_use]
    pub fn heart_of(&self, owner: PlayerId) -> Option<&Heart> {
        self.hearts.iter().find(|h| h.owner == owner)
    }

    /// Whether the tile carries a heart, spawner or nexus marker.
    #[must_use]
    pub fn is_reserved(&self, at: Coord) -> bool {
        self.board.marker(at).is_some()
    }

    /// Ids of enemy units of `owner` within `radius` of `center` that are not
    /// invisible, nearest first.
    #[must_use]
    pub fn visible_enemies_near(&self, owner: PlayerId, center: Coord, radius: u32) -> Vec<UnitId> {
        let mut found: Vec<&Unit> = self
            .units
            .iter()
            .filter(|u| u.owner != owner && !u.is_invisible())
            .filter(|u| u.pos.distance(center) <= radius)
            .collect();
        found.sort_by_key(|u| (u.pos.distance(center), u.id));
        found.into_iter().map(|u| u.id).collect()
    }

    /// Reject mutation once the game is over; otherwise the active player.
    pub(crate) const fn ensure_active(&self) -> Result<PlayerId, ActionError> {
        match self.phase {
            Phase::PlayerTurn { player } => Ok(player),
            Phase::GameOver { .. } => Err(ActionError::GameOver),
        }
    }

    /// Validate that a unit may spend an action now.
    pub(crate) fn acting_unit(&self, id: UnitId) -> Result<&Unit, ActionError> {
        let current = self.ensure_active()?;
        let unit = self.unit(id).ok_or(ActionError::UnknownUnit(id))?;
        if unit.owner != current {
            return Err(ActionError::NotYourTurn(unit.owner));
        }
        if unit.is_frozen() {
            return Err(ActionError::Frozen(id));
        }
        if unit.actions_left == 0 {
            return Err(ActionError::NoActionsLeft(id));
        }
        Ok(unit)
    }

    /// Spend one action of a unit.
    pub(crate) fn spend_action(&mut self, id: UnitId) {
        if let Some(unit) = self.unit_mut(id) {
            unit.actions_left = unit.actions_left.saturating_sub(1);
        }
    }

    /// Remove every unit at 0 hp.
    pub(crate) fn remove_dead(&mut self) {
        self.units.retain(|u| {
            if u.hp == 0 {
                debug!(unit = %u.id, kind = %u.kind, "unit destroyed");
            }
            u.hp > 0
        });
    }

    /// Change a tile's terrain and emit an event.
    pub(crate) fn change_terrain(&mut self, at: Coord, terrain: Terrain) {
        if self.board.set_terrain(at, terrain) {
            debug!(%at, ?terrain, "terrain changed");
            self.push_event(GameEvent::TerrainChanged { at, terrain });
        }
    }

    /// Set a tile's terrain while preparing a scenario.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::OutOfBounds`] for a tile off the board, and
    /// [`ActionError::Reserved`] when asked to wall a marked tile.
    pub fn set_terrain(&mut self, at: Coord, terrain: Terrain) -> Result<(), ActionError> {
        if !self.board.in_bounds(at) {
            return Err(ActionError::OutOfBounds(at));
        }
        if terrain == Terrain::Wall && self.is_reserved(at) {
            return Err(ActionError::Reserved(at));
        }
        self.change_terrain(at, terrain);
        Ok(())
    }

    /// Put a unit on the board without paying for it.
    ///
    /// Used to set up scenarios; ignores turn order, energy, spawner adjacency
    /// and the one-of-each rule, but still refuses occupied, reserved and
    /// impassable tiles.
    ///
    /// # Errors
    ///
    /// Returns an [`ActionError`] if the tile cannot hold the unit.
    pub fn insert_unit(
        &mut self,
        kind: UnitType,
        owner: PlayerId,
        at: Coord,
    ) -> Result<UnitId, ActionError> {
        if self.is_over() {
            return Err(ActionError::GameOver);
        }
        self.check_standable(kind, at)?;
        Ok(self.spawn(kind, owner, at))
    }

    /// Validate that a new unit of `kind` could stand on `at`.
    pub(crate) fn check_standable(&self, kind: UnitType, at: Coord) -> Result<(), ActionError> {
        let archetype = self.archetype(kind).ok_or(ActionError::UnknownUnitType(kind))?;
        let terrain = self.board.terrain(at).ok_or(ActionError::OutOfBounds(at))?;
        if self.is_reserved(at) {
            return Err(ActionError::Reserved(at));
        }
        if self.unit_at(at).is_some() {
            return Err(ActionError::Occupied(at));
        }
        if !terrain_allows(archetype.traits, terrain) {
            return Err(ActionError::TerrainForbidden(at));
        }
        Ok(())
    }

    /// Create a unit with a full action budget. Callers validate first.
    pub(crate) fn spawn(&mut self, kind: UnitType, owner: PlayerId, at: Coord) -> UnitId {
        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;
        let Some(archetype) = self.catalog.get(kind) else {
            return id;
        };
        let mut unit = Unit::new(id, archetype, owner, at, self.rules.actions_per_turn);
        if self.board.terrain(at) == Some(Terrain::Forest) {
            unit.defense_bonus = self.rules.forest_defense;
        }
        self.units.push(unit);
        debug!(unit = %id, %kind, owner, %at, "unit placed");
        self.push_event(GameEvent::Placed {
            unit: id,
            unit_type: kind,
            owner,
            at,
        });
        self.update_ownership();
        id
    }

    /// End the match.
    pub(crate) fn finish(&mut self, outcome: Outcome) {
        if self.is_over() {
            return;
        }
        info!(?outcome, turn = self.turn, "game over");
        self.phase = Phase::GameOver { outcome };
        self.push_event(GameEvent::GameOver { outcome });
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn set_turn(&mut self, turn: u32) {
        self.turn = turn;
    }

    pub(crate) fn units_mut(&mut self) -> &mut [Unit] {
        &mut self.units
    }

    pub(crate) fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events not yet drained.
    #[must_use]
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take every pending event, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only serializable copy of the observable state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            turn: self.turn,
            phase: self.phase,
            board: self.board.clone(),
            units: self.units.clone(),
            players: self.players.to_vec(),
            nexuses: self.nexuses.clone(),
            spawners: self.spawners.clone(),
            hearts: self.hearts.clone(),
        }
    }
}
