//! Combat resolution.
//!
//! An attack strikes either an enemy unit or an enemy heart. Unit attacks run a
//! fixed damage pipeline:
//!
//! 1. Base damage is `attack + temp_attack`.
//! 2. A ready execute kills a target at or below its threshold outright.
//! 3. A ready double-damage doubles the damage.
//! 4. Terrain defense reduces damage, never below 1.
//! 5. A shield absorbs the whole hit and breaks.
//! 6. Otherwise hp is reduced, flooring at 0.
//! 7. A ready freeze freezes the target through its owner's next turn.
//!
//! Heart attacks skip the pipeline and subtract base damage from the owner's
//! hp directly.

use tracing::debug;

use crate::error::ActionError;
use crate::game::{AttackTarget, Coord, GameEvent, Marker, MatchState, PlayerId, Unit, UnitId};

/// Outcome of steps 4 to 6 on a single unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    /// Hp actually removed.
    pub dealt: u32,
    /// Whether a shield absorbed the hit.
    pub absorbed: bool,
}

/// Apply defense, shield and hp loss to a unit.
///
/// Used by attacks and area abilities alike. The caller removes dead units.
pub fn hit_unit(unit: &mut Unit, damage: u32) -> Hit {
    let damage = if unit.defense_bonus > 0 {
        damage.saturating_sub(unit.defense_bonus).max(1)
    } else {
        damage
    };
    if unit.shielded {
        unit.shielded = false;
        return Hit {
            dealt: 0,
            absorbed: true,
        };
    }
    let dealt = damage.min(unit.hp);
    unit.hp -= dealt;
    Hit {
        dealt,
        absorbed: false,
    }
}

/// Result of a resolved attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackReport {
    /// Attacking unit.
    pub attacker: UnitId,
    /// What was struck.
    pub target: AttackTarget,
    /// Hp removed from the target unit or player.
    pub damage: u32,
    /// The target unit died.
    pub killed: bool,
    /// An execute finished the target.
    pub executed: bool,
    /// A shield absorbed the hit.
    pub absorbed: bool,
    /// The target was frozen.
    pub froze: bool,
}

impl MatchState {
    /// Check an attack without applying it.
    ///
    /// # Errors
    ///
    /// Returns why the attack is illegal.
    pub fn check_attack(&self, unit: UnitId, at: Coord) -> Result<AttackTarget, ActionError> {
        let attacker = self.acting_unit(unit)?;
        let cell = self.board().get(at).ok_or(ActionError::OutOfBounds(at))?;

        let target = match cell.marker {
            Some(Marker::Heart(owner)) if owner != attacker.owner => AttackTarget::Heart { owner },
            Some(Marker::Heart(_)) => return Err(ActionError::NoTarget(at)),
            _ => {
                let defender = self
                    .unit_at(at)
                    .filter(|d| d.owner != attacker.owner && !d.is_invisible())
                    .ok_or(ActionError::NoTarget(at))?;
                AttackTarget::Unit {
                    id: defender.id,
                    unit_type: defender.kind,
                }
            }
        };

        if attacker.pos.distance(at) > attacker.effective_range() {
            return Err(ActionError::OutOfRange(at));
        }
        let over_walls = self.traits_of(attacker.kind).over_walls;
        if !over_walls && self.board().wall_between(attacker.pos, at) {
            return Err(ActionError::LineBlocked(at));
        }
        Ok(target)
    }

    /// Whether an attack is legal right now.
    #[must_use]
    pub fn can_attack(&self, unit: UnitId, at: Coord) -> bool {
        self.check_attack(unit, at).is_ok()
    }

    /// Attack a tile, spending one action.
    ///
    /// # Errors
    ///
    /// Returns an [`ActionError`] and changes nothing if the attack is illegal.
    pub fn attack(&mut self, unit: UnitId, at: Coord) -> Result<AttackReport, ActionError> {
        let target = self.check_attack(unit, at)?;
        let report = match target {
            AttackTarget::Heart { owner } => self.strike_heart(unit, owner),
            AttackTarget::Unit { id, .. } => self.strike_unit(unit, id),
        }
        .ok_or(ActionError::UnknownUnit(unit))?;

        debug!(
            attacker = %unit,
            %at,
            damage = report.damage,
            killed = report.killed,
            "attack resolved"
        );
        self.push_event(GameEvent::Attacked {
            attacker: unit,
            target: report.target,
            damage: report.damage,
            killed: report.killed,
        });
        if let AttackTarget::Heart { .. } = target {
            if let Some(outcome) = self.defeat_outcome() {
                self.finish(outcome);
            }
        }
        Ok(report)
    }

    fn strike_heart(&mut self, unit: UnitId, owner: PlayerId) -> Option<AttackReport> {
        let attacker = self.unit_mut(unit)?;
        attacker.actions_left -= 1;
        let damage = attacker.effective_attack();
        self.player_mut(owner).take_damage(damage);
        Some(AttackReport {
            attacker: unit,
            target: AttackTarget::Heart { owner },
            damage,
            killed: false,
            executed: false,
            absorbed: false,
            froze: false,
        })
    }

    fn strike_unit(&mut self, unit: UnitId, target: UnitId) -> Option<AttackReport> {
        let freeze_until = self.turn() + 1;
        let defender_hp = self.unit(target)?.hp;
        let defender_kind = self.unit(target)?.kind;

        let attacker = self.unit_mut(unit)?;
        attacker.actions_left -= 1;
        let mut damage = attacker.effective_attack();
        let executes = attacker.execute_below.is_some_and(|limit| defender_hp <= limit);
        if executes {
            attacker.execute_below = None;
        } else if attacker.double_damage {
            attacker.double_damage = false;
            damage *= 2;
        }
        let freezes = !executes && std::mem::take(&mut attacker.freeze_next);

        let defender = self.unit_mut(target)?;
        let hit = if executes {
            let dealt = defender.hp;
            defender.hp = 0;
            Hit {
                dealt,
                absorbed: false,
            }
        } else {
            hit_unit(defender, damage)
        };
        let killed = defender.hp == 0;
        if freezes && !killed {
            defender.frozen_until = Some(freeze_until);
        }
        self.remove_dead();

        Some(AttackReport {
            attacker: unit,
            target: AttackTarget::Unit {
                id: target,
                unit_type: defender_kind,
            },
            damage: hit.dealt,
            killed,
            executed: executes,
            absorbed: hit.absorbed,
            froze: freezes && !killed,
        })
    }
}
