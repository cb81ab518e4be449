//! Economy: per-turn energy income.
//!
//! Income is a flat amount each turn plus a bonus on every Nth turn:
//!
//! income(turn) = energy_income + (bonus_amount if turn % bonus_every == 0)
//!
//! Energy is capped; anything above the cap is lost.

use crate::game::{Player, RulesConfig};

/// Energy granted at the start of the given turn.
#[must_use]
pub const fn income_for_turn(turn: u32, rules: &RulesConfig) -> u32 {
    let bonus = if rules.bonus_every > 0 && turn % rules.bonus_every == 0 {
        rules.bonus_amount
    } else {
        0
    };
    rules.energy_income + bonus
}

/// Grant a player the income for `turn`, respecting the cap.
///
/// Returns the energy actually added.
pub fn grant_income(player: &mut Player, turn: u32, rules: &RulesConfig) -> u32 {
    let before = player.energy;
    player.energy = player
        .energy
        .saturating_add(income_for_turn(turn, rules))
        .min(rules.energy_cap);
    player.energy.saturating_sub(before)
}
