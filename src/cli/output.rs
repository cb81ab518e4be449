//! Output formatting utilities for CLI.

use std::fmt::Write as _;

use nexus_tactics::game::{
    AbilityKind, AttackTarget, Catalog, Marker, Snapshot, Stats, Traits, UnitType,
};
use nexus_tactics::tournament::{MatchResult, TournamentStats};
use nexus_tactics::{GameEvent, MatchState, Outcome};
use serde::Serialize;

/// JSON-serializable run result.
#[derive(Debug, Serialize)]
pub(super) struct JsonRunResult<'a> {
    /// Match result.
    #[serde(flatten)]
    pub(super) result: &'a MatchResult,
    /// Final state, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) board: Option<Snapshot>,
}

/// One line describing an event.
pub(super) fn format_event(event: &GameEvent) -> String {
    match event {
        GameEvent::Placed {
            unit,
            unit_type,
            owner,
            at,
        } => format!("P{owner} places {unit_type} {unit} at {at}"),
        GameEvent::Moved { unit, from, to } => format!("{unit} moves {from} -> {to}"),
        GameEvent::Attacked {
            attacker,
            target,
            damage,
            killed,
        } => {
            let target = match target {
                AttackTarget::Unit { id, unit_type } => format!("{unit_type} {id}"),
                AttackTarget::Heart { owner } => format!("P{owner} heart"),
            };
            let suffix = if *killed { " (destroyed)" } else { "" };
            format!("{attacker} hits {target} for {damage}{suffix}")
        }
        GameEvent::AbilityUsed {
            unit,
            ability,
            message,
            ..
        } => format!("{unit} uses {ability}: {message}"),
        GameEvent::TerrainChanged { at, terrain } => format!("{at} becomes {terrain:?}"),
        GameEvent::NexusCaptured { at, owner } => format!("P{owner} captures nexus {at}"),
        GameEvent::NexusDamage { player, amount, hp } => {
            format!("P{player} takes {amount} nexus damage ({hp} hp left)")
        }
        GameEvent::TurnEnded {
            turn,
            next_player,
            energy,
        } => format!("-- turn {turn}: P{next_player} ({energy} energy)"),
        GameEvent::SelectionCleared => String::new(),
        GameEvent::GameOver { outcome } => format!("== game over: {}", describe(*outcome)),
    }
}

fn describe(outcome: Outcome) -> String {
    match outcome {
        Outcome::Winner(player) => format!("player {player} wins"),
        Outcome::Draw => "draw".to_string(),
    }
}

/// Format a match result as human-readable text.
pub(super) fn format_text(result: &MatchResult) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Match Result (seed: {})", result.seed);
    let _ = writeln!(output, "  Outcome: {}", describe(result.outcome));
    let _ = writeln!(output, "  Turns: {}", result.turns);
    if result.controller_faults > 0 {
        let _ = writeln!(output, "  Controller faults: {}", result.controller_faults);
    }
    output.push('\n');
    for p in &result.players {
        let _ = writeln!(
            output,
            "  Player {}: {} hp, {} energy, {} units, {} nexuses",
            p.player, p.hp, p.energy, p.units, p.nexuses
        );
    }
    output
}

/// Render the board as a text grid, two characters per cell.
///
/// Units show their symbol and owner, markers show `H` (heart), `P`
/// (spawner) or `N` (nexus) with the owner or `-`, and empty cells show
/// their terrain glyph.
pub(super) fn render_board(state: &MatchState) -> String {
    let board = state.board();
    let mut output = String::new();
    for y in 0..board.height() {
        for x in 0..board.width() {
            let at = nexus_tactics::Coord::new(x, y);
            let cell = if let Some(unit) = state.unit_at(at) {
                let symbol = state.archetype(unit.kind).map_or('?', |a| a.symbol);
                format!("{symbol}{}", unit.owner)
            } else {
                match board.marker(at) {
                    Some(Marker::Heart(owner)) => format!("H{owner}"),
                    Some(Marker::Spawner(owner)) => format!("P{owner}"),
                    Some(Marker::Nexus) => {
                        let owner = state
                            .nexuses()
                            .iter()
                            .find(|n| n.pos == at)
                            .and_then(|n| n.owner);
                        owner.map_or_else(|| "N-".to_string(), |o| format!("N{o}"))
                    }
                    None => {
                        let glyph = board.terrain(at).map_or(' ', |t| t.glyph());
                        format!("{glyph}{glyph}")
                    }
                }
            };
            output.push_str(&cell);
            output.push(' ');
        }
        output.push('\n');
    }
    output
}

/// Format tournament stats as human-readable text.
pub(super) fn format_tournament_text(stats: &TournamentStats) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Tournament Results ({} games)", stats.games_played);
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for player in [1, 2] {
        let _ = writeln!(
            output,
            "  Player {player}: {:.1}% ({} wins)",
            stats.win_rate(player) * 100.0,
            stats.wins[usize::from(player == 2)]
        );
    }
    let _ = writeln!(
        output,
        "  Draws: {} ({:.1}%)\n",
        stats.draws,
        stats.draw_rate() * 100.0
    );

    output.push_str("Average Remaining HP:\n");
    for player in [1, 2] {
        let _ = writeln!(output, "  Player {player}: {:.1}", stats.avg_hp(player));
    }

    let _ = writeln!(output, "\nAverage Game Length: {:.0} turns", stats.avg_turns());
    if stats.errors > 0 {
        let _ = writeln!(output, "Failed matches: {}", stats.errors);
    }
    if stats.controller_faults > 0 {
        let _ = writeln!(output, "Controller faults: {}", stats.controller_faults);
    }
    output
}

/// JSON-serializable tournament result.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentResult {
    games_played: u64,
    players: Vec<JsonTournamentPlayer>,
    draws: u64,
    draw_rate: f64,
    avg_turns: f64,
    errors: u64,
    controller_faults: u64,
}

#[derive(Debug, Serialize)]
struct JsonTournamentPlayer {
    player: u8,
    wins: u64,
    win_rate: f64,
    avg_hp: f64,
}

impl JsonTournamentResult {
    /// Create from stats.
    pub(super) fn from_stats(stats: &TournamentStats) -> Self {
        let players = [1u8, 2]
            .into_iter()
            .map(|player| JsonTournamentPlayer {
                player,
                wins: stats.wins[usize::from(player == 2)],
                win_rate: stats.win_rate(player),
                avg_hp: stats.avg_hp(player),
            })
            .collect();
        Self {
            games_played: stats.games_played,
            players,
            draws: stats.draws,
            draw_rate: stats.draw_rate(),
            avg_turns: stats.avg_turns(),
            errors: stats.errors,
            controller_faults: stats.controller_faults,
        }
    }
}

/// Format tournament stats as CSV.
pub(super) fn format_tournament_csv(stats: &TournamentStats) -> String {
    let mut output = String::from("player,wins,win_rate,draws,avg_hp,avg_turns\n");
    for player in [1, 2] {
        let _ = writeln!(
            output,
            "{player},{},{:.4},{},{:.2},{:.2}",
            stats.wins[usize::from(player == 2)],
            stats.win_rate(player),
            stats.draws,
            stats.avg_hp(player),
            stats.avg_turns()
        );
    }
    output
}

/// JSON-serializable catalog entry.
#[derive(Debug, Serialize)]
pub(super) struct JsonArchetype {
    kind: UnitType,
    name: &'static str,
    symbol: char,
    description: &'static str,
    stats: Stats,
    traits: Traits,
    abilities: Vec<JsonAbility>,
}

#[derive(Debug, Serialize)]
struct JsonAbility {
    name: &'static str,
    text: &'static str,
    active: bool,
}

/// Catalog entries in catalog order.
pub(super) fn catalog_entries(catalog: &Catalog) -> Vec<JsonArchetype> {
    catalog
        .iter()
        .map(|a| JsonArchetype {
            kind: a.kind,
            name: a.name,
            symbol: a.symbol,
            description: a.description,
            stats: a.stats,
            traits: a.traits,
            abilities: a
                .abilities
                .iter()
                .map(|ability| JsonAbility {
                    name: ability.name,
                    text: ability.text,
                    active: matches!(ability.kind, AbilityKind::Active { .. }),
                })
                .collect(),
        })
        .collect()
}

/// Format the catalog as a text table.
pub(super) fn format_catalog_text(catalog: &Catalog) -> String {
    let mut output = String::from("kind        sym cost  hp atk rng mov  abilities\n");
    for a in catalog.iter() {
        let s = a.stats;
        let abilities: Vec<String> = a
            .abilities
            .iter()
            .map(|ability| match ability.kind {
                AbilityKind::Active { .. } => ability.name.to_string(),
                AbilityKind::Passive => format!("{} (passive)", ability.name),
            })
            .collect();
        let _ = writeln!(
            output,
            "{:<11} {:>3} {:>4} {:>3} {:>3} {:>3} {:>3}  {}",
            a.kind.key(),
            a.symbol,
            s.cost,
            s.hp,
            s.attack,
            s.range,
            s.movement,
            abilities.join(", ")
        );
    }
    output
}
