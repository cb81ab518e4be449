//! Ability descriptors and the capability interface effects run against.
//!
//! An ability is a tagged variant: active abilities carry both the effect
//! function the engine runs and the [`AiHint`] the AI consults to decide when
//! to use it, so the two can never drift apart.

use tracing::{debug, warn};

use crate::error::{AbilityError, ActionError};
use crate::game::{
    Coord, GameEvent, MatchState, PlayerId, RulesConfig, Terrain, Unit, UnitId, hit_unit,
};

/// Signature of an active ability's effect.
///
/// Returns a human-readable outcome, or an [`AbilityError`] which the engine
/// catches and reports as "no effect".
pub type EffectFn = fn(&mut AbilityContext<'_>) -> Result<String, AbilityError>;

/// Structured condition under which the AI invokes an active ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiHint {
    /// A visible enemy or enemy heart is out of range now but close enough
    /// that extra movement would bring it in.
    TargetOutOfReach,
    /// A visible enemy or enemy heart is within range plus `extra_range`.
    EnemyInRange {
        /// Added to the unit's effective range.
        extra_range: u32,
    },
    /// The unit's next attack will land on an enemy unit: one is visible and
    /// in range, the enemy heart is not, and no double damage is pending.
    UnitStrikeReady,
    /// At least `min` visible enemies are within range.
    EnemiesInRange {
        /// Minimum number of enemies.
        min: usize,
    },
    /// Nothing is in range now, but a target sits within range plus `extra`.
    BeyondRange {
        /// Added to the unit's effective range.
        extra: u32,
    },
    /// A visible enemy at or below the execute threshold is in range.
    ExecuteInRange,
    /// A visible enemy with at least `min_hp` is in range.
    StrongTargetInRange {
        /// Minimum target hp.
        min_hp: u32,
    },
    /// An adjacent ally is missing hp.
    WoundedAllyAdjacent,
    /// An adjacent tile is unbridged water.
    AdjacentWater,
    /// An enemy is within the threat radius and the unit is not shielded.
    Guard,
    /// The unit is wounded and an enemy is within the threat radius.
    Evade,
}

/// Whether an ability is invoked or always-on.
#[derive(Debug, Clone, Copy)]
pub enum AbilityKind {
    /// Invoked explicitly; consumes one action.
    Active {
        /// What the ability does.
        effect: EffectFn,
        /// When the AI should use it.
        hint: AiHint,
    },
    /// Descriptive only; never invoked.
    Passive,
}

/// An entry in an archetype's ability list.
#[derive(Debug, Clone, Copy)]
pub struct Ability {
    /// Display name.
    pub name: &'static str,
    /// Rules text.
    pub text: &'static str,
    /// Active or passive.
    pub kind: AbilityKind,
}

impl Ability {
    /// Describe an active ability.
    #[must_use]
    pub const fn active(
        name: &'static str,
        text: &'static str,
        effect: EffectFn,
        hint: AiHint,
    ) -> Self {
        Self {
            name,
            text,
            kind: AbilityKind::Active { effect, hint },
        }
    }

    /// Describe a passive ability.
    #[must_use]
    pub const fn passive(name: &'static str, text: &'static str) -> Self {
        Self {
            name,
            text,
            kind: AbilityKind::Passive,
        }
    }

    /// The AI hint, for active abilities.
    #[must_use]
    pub const fn hint(&self) -> Option<AiHint> {
        match self.kind {
            AbilityKind::Active { hint, .. } => Some(hint),
            AbilityKind::Passive => None,
        }
    }
}

/// Result of invoking an ability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbilityReport {
    /// Acting unit.
    pub unit: UnitId,
    /// Ability name.
    pub ability: &'static str,
    /// Whether the effect completed.
    pub applied: bool,
    /// Human-readable outcome.
    pub message: String,
}

/// The fixed set of operations an ability effect may perform.
#[derive(Debug)]
pub struct AbilityContext<'a> {
    state: &'a mut MatchState,
    actor: UnitId,
}

impl<'a> AbilityContext<'a> {
    pub(crate) fn new(state: &'a mut MatchState, actor: UnitId) -> Self {
        Self { state, actor }
    }

    /// The acting unit.
    ///
    /// # Errors
    ///
    /// Returns [`AbilityError::ActorMissing`] if the actor is no longer on the
    /// board.
    pub fn actor(&self) -> Result<&Unit, AbilityError> {
        self.state.unit(self.actor).ok_or(AbilityError::ActorMissing)
    }

    /// Mutable access to the acting unit's modifiers and statuses.
    ///
    /// # Errors
    ///
    /// Returns [`AbilityError::ActorMissing`] if the actor is no longer on the
    /// board.
    pub fn actor_mut(&mut self) -> Result<&mut Unit, AbilityError> {
        self.state
            .unit_mut(self.actor)
            .ok_or(AbilityError::ActorMissing)
    }

    /// Current turn number.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.state.turn()
    }

    /// Active rules.
    #[must_use]
    pub fn rules(&self) -> &RulesConfig {
        self.state.rules()
    }

    /// Terrain at a coordinate.
    #[must_use]
    pub fn terrain(&self, at: Coord) -> Option<Terrain> {
        self.state.board().terrain(at)
    }

    /// In-bounds orthogonal neighbours of the actor.
    ///
    /// # Errors
    ///
    /// Returns [`AbilityError::ActorMissing`] if the actor is gone.
    pub fn adjacent_tiles(&self) -> Result<Vec<Coord>, AbilityError> {
        let pos = self.actor()?.pos;
        Ok(self.state.board().neighbors(pos).collect())
    }

    /// Visible enemies of the actor within `radius` of `center`, nearest first.
    ///
    /// # Errors
    ///
    /// Returns [`AbilityError::ActorMissing`] if the actor is gone.
    pub fn visible_enemies_within(
        &self,
        center: Coord,
        radius: u32,
    ) -> Result<Vec<UnitId>, AbilityError> {
        let owner = self.actor()?.owner;
        Ok(self.state.visible_enemies_near(owner, center, radius))
    }

    /// Position of a unit.
    #[must_use]
    pub fn position_of(&self, unit: UnitId) -> Option<Coord> {
        self.state.unit(unit).map(|u| u.pos)
    }

    /// Apply `damage` to every visible enemy within `radius` of `center` in a
    /// single pass, honouring defense and shields. Returns the number hit.
    ///
    /// # Errors
    ///
    /// Returns [`AbilityError::ActorMissing`] if the actor is gone.
    pub fn strike_area(
        &mut self,
        center: Coord,
        radius: u32,
        damage: u32,
    ) -> Result<usize, AbilityError> {
        let owner: PlayerId = self.actor()?.owner;
        let targets = self.state.visible_enemies_near(owner, center, radius);
        for &target in &targets {
            if let Some(unit) = self.state.unit_mut(target) {
                hit_unit(unit, damage);
            }
        }
        self.state.remove_dead();
        Ok(targets.len())
    }

    /// Allies of the actor on orthogonally adjacent tiles that are missing hp,
    /// most wounded first.
    ///
    /// # Errors
    ///
    /// Returns [`AbilityError::ActorMissing`] if the actor is gone.
    pub fn wounded_allies_adjacent(&self) -> Result<Vec<UnitId>, AbilityError> {
        let actor = self.actor()?;
        let mut allies: Vec<&Unit> = self
            .state
            .units()
            .iter()
            .filter(|u| u.owner == actor.owner && u.id != actor.id)
            .filter(|u| u.pos.distance(actor.pos) == 1 && u.is_wounded())
            .collect();
        allies.sort_by_key(|u| (std::cmp::Reverse(u.max_hp - u.hp), u.id));
        Ok(allies.into_iter().map(|u| u.id).collect())
    }

    /// Restore up to `amount` hp to a unit, capped at its maximum. Returns the
    /// amount restored.
    ///
    /// # Errors
    ///
    /// Returns [`AbilityError::NoTarget`] if the unit does not exist.
    pub fn heal(&mut self, target: UnitId, amount: u32) -> Result<u32, AbilityError> {
        let unit = self.state.unit_mut(target).ok_or(AbilityError::NoTarget)?;
        let before = unit.hp;
        unit.hp = (unit.hp + amount).min(unit.max_hp);
        Ok(unit.hp - before)
    }

    /// Turn an unbridged water tile into a bridge.
    ///
    /// # Errors
    ///
    /// Returns [`AbilityError::Unavailable`] if the tile is not water.
    pub fn raise_bridge(&mut self, at: Coord) -> Result<(), AbilityError> {
        if self.state.board().terrain(at) != Some(Terrain::Water) {
            return Err(AbilityError::Unavailable("no water to bridge"));
        }
        self.state.change_terrain(at, Terrain::Bridge);
        Ok(())
    }
}

impl MatchState {
    /// Invoke the active ability at `index` of a unit's archetype.
    ///
    /// The intent is validated first; an illegal intent changes nothing. Once
    /// validated, the action is consumed even if the effect faults, in which
    /// case the report carries `applied: false` and a "no effect" message.
    ///
    /// # Errors
    ///
    /// Returns an [`ActionError`] if the intent is illegal.
    pub fn use_ability(&mut self, unit: UnitId, index: usize) -> Result<AbilityReport, ActionError> {
        let actor = self.acting_unit(unit)?;
        let kind = actor.kind;
        let catalog = self.catalog_handle();
        let archetype = catalog
            .get(kind)
            .ok_or(ActionError::UnknownUnitType(kind))?;
        let ability = archetype
            .abilities
            .get(index)
            .ok_or(ActionError::UnknownAbility { unit, index })?;
        let AbilityKind::Active { effect, .. } = ability.kind else {
            return Err(ActionError::PassiveAbility { unit, index });
        };

        if let Some(actor) = self.unit_mut(unit) {
            actor.actions_left -= 1;
        }

        let result = effect(&mut AbilityContext::new(self, unit));
        let (applied, message) = match result {
            Ok(message) => {
                debug!(unit = %unit, ability = ability.name, %message, "ability used");
                (true, message)
            }
            Err(err) => {
                warn!(unit = %unit, ability = ability.name, error = %err, "ability faulted");
                (false, format!("{} had no effect ({err})", ability.name))
            }
        };

        self.push_event(GameEvent::AbilityUsed {
            unit,
            ability: ability.name.to_string(),
            applied,
            message: message.clone(),
        });

        Ok(AbilityReport {
            unit,
            ability: ability.name,
            applied,
            message,
        })
    }

    /// Abilities of a unit's archetype, with their indices.
    #[must_use]
    pub fn abilities_of(&self, unit: UnitId) -> Vec<(usize, Ability)> {
        self.unit(unit)
            .and_then(|u| self.catalog().get(u.kind))
            .map(|arch| arch.abilities.iter().copied().enumerate().collect())
            .unwrap_or_default()
    }
}
