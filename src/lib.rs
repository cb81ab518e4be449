// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Nexus Tactics: a deterministic two-player grid tactics engine.
//!
//! This crate provides the rules layer of a turn-based tactics match and a
//! heuristic opponent that plays through the same rules:
//! - Seeded, reproducible matches
//! - Every illegal intent rejected without mutation
//! - Faulting abilities and controllers contained, never stalling a turn
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Tournament Runner / CLI driver    │
//! ├─────────────────────────────────────┤
//! │   AI policy (TurnController)        │
//! ├─────────────────────────────────────┤
//! │   Session: seats, hand-off, events  │
//! ├─────────────────────────────────────┤
//! │   MatchState: reach, combat,        │
//! │   objectives, economy, turns        │
//! └─────────────────────────────────────┘
//! ```

pub mod ai;
pub mod error;
pub mod game;
pub mod tournament;

pub use ai::{AiConfig, AiPolicy};
pub use error::{AbilityError, ActionError, AiError};

// Re-export key game types at crate root for convenience
pub use game::{
    Coord, GameEvent, Layout, MatchState, Outcome, Phase, PlayerId, RulesConfig, Session,
    Terrain, UnitId, UnitType,
};
