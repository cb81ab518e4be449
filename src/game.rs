//! Game layer for Nexus Tactics.
//!
//! Implements the rules of a two-player grid tactics match:
//! - Board with terrain and reserved objective markers
//! - Unit catalog with abilities shared by engine and AI
//! - Reachability, combat, builder actions
//! - Nexus capture and passive damage, spawner placement
//! - Turn scheduler, energy economy and controller sessions

mod ability;
mod builder;
mod catalog;
mod combat;
mod economy;
mod effects;
mod events;
mod invariants;
mod map;
mod objectives;
mod player;
mod reach;
mod session;
mod state;
mod turn;
mod unit;

pub use ability::{AbilityContext, AbilityKind, AbilityReport, Ability, AiHint, EffectFn};
pub use builder::Construction;
pub use catalog::{Archetype, Catalog, Stats, Traits, UnitType};
pub use combat::{AttackReport, Hit, hit_unit};
pub use economy::{grant_income, income_for_turn};
pub use events::{AttackTarget, GameEvent};
pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use map::{Board, Cell, Coord, Marker, Terrain};
pub use objectives::{Heart, Layout, Nexus, Spawner};
pub use player::{PLAYERS, Player, PlayerId, opponent};
pub use reach::terrain_allows;
pub use session::{Seat, Session, StateObserver, TurnController, TurnSummary};
pub use state::{
    MatchState, NexusCadence, Outcome, Phase, RulesConfig, Snapshot, StatusExpiry,
};
pub use unit::{Unit, UnitId};
