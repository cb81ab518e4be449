//! The unit catalog: immutable archetype table shared by the engine and the AI.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::effects;
use crate::game::{Ability, AiHint};

/// Catalog key for a unit archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    /// Cheap frontline infantry.
    Soldier,
    /// Ranged attacker.
    Archer,
    /// Fast, fragile skirmisher.
    Scout,
    /// Slow, heavily armoured brawler.
    Tank,
    /// Support unit that heals allies.
    Medic,
    /// Builds bridges and walls.
    Builder,
    /// Naval artillery confined to water.
    Gunship,
    /// Stealth assassin.
    Shade,
    /// Long-range executioner.
    Sniper,
    /// Freezes its targets.
    FrostMage,
    /// Siege engine that fires over walls.
    Catapult,
    /// Flying unit that crosses mountains and water.
    Griffin,
    /// Amphibious infantry.
    Marine,
}

impl UnitType {
    /// Every kind in catalog order.
    pub const ALL: [UnitType; 13] = [
        UnitType::Soldier,
        UnitType::Archer,
        UnitType::Scout,
        UnitType::Tank,
        UnitType::Medic,
        UnitType::Builder,
        UnitType::Gunship,
        UnitType::Shade,
        UnitType::Sniper,
        UnitType::FrostMage,
        UnitType::Catapult,
        UnitType::Griffin,
        UnitType::Marine,
    ];

    /// Stable snake-case key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            UnitType::Soldier => "soldier",
            UnitType::Archer => "archer",
            UnitType::Scout => "scout",
            UnitType::Tank => "tank",
            UnitType::Medic => "medic",
            UnitType::Builder => "builder",
            UnitType::Gunship => "gunship",
            UnitType::Shade => "shade",
            UnitType::Sniper => "sniper",
            UnitType::FrostMage => "frost_mage",
            UnitType::Catapult => "catapult",
            UnitType::Griffin => "griffin",
            UnitType::Marine => "marine",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Base numbers of an archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Energy cost to place.
    pub cost: u32,
    /// Maximum hit points.
    pub hp: u32,
    /// Base attack.
    pub attack: u32,
    /// Base attack range.
    pub range: u32,
    /// Base movement budget.
    pub movement: u32,
}

/// Terrain affordances and special rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Traits {
    /// May enter water.
    pub can_cross_water: bool,
    /// May enter mountains.
    pub can_fly: bool,
    /// May only stand on water or bridges.
    pub water_only: bool,
    /// Line of fire ignores walls.
    pub over_walls: bool,
    /// May build and break walls and bridges.
    pub builder: bool,
    /// Naval unit.
    pub naval: bool,
}

/// One entry of the catalog.
#[derive(Debug, Clone)]
pub struct Archetype {
    /// Catalog key.
    pub kind: UnitType,
    /// Display name.
    pub name: &'static str,
    /// Single-glyph symbol for text rendering.
    pub symbol: char,
    /// Short description.
    pub description: &'static str,
    /// Base numbers.
    pub stats: Stats,
    /// Terrain affordances.
    pub traits: Traits,
    /// Ordered abilities; indices are stable.
    pub abilities: Vec<Ability>,
}

/// Immutable table of archetypes.
#[derive(Debug, Clone)]
pub struct Catalog {
    archetypes: Vec<Archetype>,
}

impl Catalog {
    /// Build a catalog from explicit archetypes.
    #[must_use]
    pub fn new(archetypes: Vec<Archetype>) -> Self {
        Self { archetypes }
    }

    /// Look up an archetype.
    #[must_use]
    pub fn get(&self, kind: UnitType) -> Option<&Archetype> {
        self.archetypes.iter().find(|a| a.kind == kind)
    }

    /// Iterate over archetypes in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Archetype> {
        self.archetypes.iter()
    }

    /// Replace (or add) the archetype for its kind.
    #[must_use]
    pub fn with_archetype(mut self, archetype: Archetype) -> Self {
        match self.archetypes.iter_mut().find(|a| a.kind == archetype.kind) {
            Some(slot) => *slot = archetype,
            None => self.archetypes.push(archetype),
        }
        self
    }

    /// The standard thirteen-unit catalog.
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn standard() -> Self {
        let plain = Traits::default();
        Self::new(vec![
            Archetype {
                kind: UnitType::Soldier,
                name: "Soldier",
                symbol: 'S',
                description: "Reliable frontline infantry. Cheap and versatile.",
                stats: stats(3, 6, 2, 1, 2),
                traits: plain,
                abilities: vec![
                    Ability::active(
                        "Charge",
                        "+1 move and +1 attack this turn.",
                        effects::charge,
                        AiHint::TargetOutOfReach,
                    ),
                    Ability::passive("Resolute", "Holds the line."),
                ],
            },
            Archetype {
                kind: UnitType::Archer,
                name: "Archer",
                symbol: 'A',
                description: "Ranged unit. Best at keeping enemies at distance.",
                stats: stats(4, 4, 2, 3, 2),
                traits: plain,
                abilities: vec![
                    Ability::active(
                        "Volley",
                        "Deal 1 damage to every visible enemy in range.",
                        effects::volley,
                        AiHint::EnemiesInRange { min: 2 },
                    ),
                    Ability::active(
                        "Focus",
                        "+2 range this turn.",
                        effects::focus,
                        AiHint::BeyondRange { extra: 2 },
                    ),
                ],
            },
            Archetype {
                kind: UnitType::Scout,
                name: "Scout",
                symbol: 'c',
                description: "Fast skirmisher for grabbing objectives.",
                stats: stats(2, 3, 1, 1, 4),
                traits: plain,
                abilities: vec![Ability::active(
                    "Dash",
                    "+2 move this turn.",
                    effects::dash,
                    AiHint::TargetOutOfReach,
                )],
            },
            Archetype {
                kind: UnitType::Tank,
                name: "Tank",
                symbol: 'T',
                description: "Heavy armour. Slow but hard to kill.",
                stats: stats(8, 12, 4, 1, 1),
                traits: plain,
                abilities: vec![Ability::active(
                    "Bulwark",
                    "Raise a shield that absorbs the next hit.",
                    effects::bulwark,
                    AiHint::Guard,
                )],
            },
            Archetype {
                kind: UnitType::Medic,
                name: "Medic",
                symbol: 'M',
                description: "Keeps the front line standing.",
                stats: stats(5, 5, 1, 1, 2),
                traits: plain,
                abilities: vec![Ability::active(
                    "Heal",
                    "Restore hp to the most wounded adjacent ally.",
                    effects::heal,
                    AiHint::WoundedAllyAdjacent,
                )],
            },
            Archetype {
                kind: UnitType::Builder,
                name: "Builder",
                symbol: 'B',
                description: "Can construct bridges and walls.",
                stats: stats(5, 5, 1, 1, 2),
                traits: Traits {
                    builder: true,
                    ..plain
                },
                abilities: vec![Ability::active(
                    "Build Bridge",
                    "Turn an adjacent water tile into a bridge.",
                    effects::build_bridge,
                    AiHint::AdjacentWater,
                )],
            },
            Archetype {
                kind: UnitType::Gunship,
                name: "Gunship",
                symbol: 'G',
                description: "Naval artillery. Confined to water.",
                stats: stats(6, 7, 3, 2, 3),
                traits: Traits {
                    water_only: true,
                    naval: true,
                    ..plain
                },
                abilities: vec![Ability::active(
                    "Bombard",
                    "Shell the nearest enemy in range and everything next to it.",
                    effects::bombard,
                    AiHint::EnemiesInRange { min: 1 },
                )],
            },
            Archetype {
                kind: UnitType::Shade,
                name: "Shade",
                symbol: 'H',
                description: "Strikes from the shadows.",
                stats: stats(7, 5, 3, 1, 3),
                traits: plain,
                abilities: vec![
                    Ability::active(
                        "Backstab",
                        "Next attack deals double damage.",
                        effects::backstab,
                        AiHint::UnitStrikeReady,
                    ),
                    Ability::active(
                        "Vanish",
                        "Become untargetable until the end of the enemy's turn.",
                        effects::vanish,
                        AiHint::Evade,
                    ),
                ],
            },
            Archetype {
                kind: UnitType::Sniper,
                name: "Sniper",
                symbol: 'N',
                description: "Extreme range, finishes off the wounded.",
                stats: stats(7, 4, 3, 4, 1),
                traits: plain,
                abilities: vec![Ability::active(
                    "Headshot",
                    "Next attack kills a target at low hp outright.",
                    effects::headshot,
                    AiHint::ExecuteInRange,
                )],
            },
            Archetype {
                kind: UnitType::FrostMage,
                name: "Frost Mage",
                symbol: 'F',
                description: "Locks down dangerous enemies.",
                stats: stats(6, 5, 2, 2, 2),
                traits: plain,
                abilities: vec![Ability::active(
                    "Freeze",
                    "Next attack freezes its target for a turn.",
                    effects::freeze,
                    AiHint::StrongTargetInRange { min_hp: 6 },
                )],
            },
            Archetype {
                kind: UnitType::Catapult,
                name: "Catapult",
                symbol: 'K',
                description: "Siege engine. Fires over walls.",
                stats: stats(6, 6, 3, 3, 1),
                traits: Traits {
                    over_walls: true,
                    ..plain
                },
                abilities: vec![Ability::active(
                    "Siege",
                    "+2 attack and +1 range this turn.",
                    effects::siege,
                    AiHint::EnemyInRange { extra_range: 1 },
                )],
            },
            Archetype {
                kind: UnitType::Griffin,
                name: "Griffin",
                symbol: 'R',
                description: "Flies over mountains and rivers.",
                stats: stats(6, 5, 2, 1, 3),
                traits: Traits {
                    can_fly: true,
                    can_cross_water: true,
                    ..plain
                },
                abilities: vec![Ability::active(
                    "Dive",
                    "+2 attack this turn.",
                    effects::dive,
                    AiHint::EnemyInRange { extra_range: 0 },
                )],
            },
            Archetype {
                kind: UnitType::Marine,
                name: "Marine",
                symbol: 'm',
                description: "Amphibious infantry.",
                stats: stats(4, 5, 2, 1, 2),
                traits: Traits {
                    can_cross_water: true,
                    ..plain
                },
                abilities: vec![Ability::passive("Amphibious", "Wades through rivers.")],
            },
        ])
    }
}

const fn stats(cost: u32, hp: u32, attack: u32, range: u32, movement: u32) -> Stats {
    Stats {
        cost,
        hp,
        attack,
        range,
        movement,
    }
}
