//! Effect functions of the standard catalog's active abilities.

use crate::error::AbilityError;
use crate::game::{AbilityContext, Terrain};

/// Damage dealt by each archer volley arrow.
const VOLLEY_DAMAGE: u32 = 1;

/// Bombard splash radius around the struck enemy.
const BOMBARD_RADIUS: u32 = 1;

/// Bombard damage to every unit in the splash.
const BOMBARD_DAMAGE: u32 = 2;

pub(crate) fn charge(ctx: &mut AbilityContext<'_>) -> Result<String, AbilityError> {
    let unit = ctx.actor_mut()?;
    unit.temp_move += 1;
    unit.temp_attack += 1;
    Ok("Charged: +1 move, +1 attack.".to_string())
}

pub(crate) fn volley(ctx: &mut AbilityContext<'_>) -> Result<String, AbilityError> {
    let actor = ctx.actor()?;
    let (center, range) = (actor.pos, actor.effective_range());
    let hit = ctx.strike_area(center, range, VOLLEY_DAMAGE)?;
    if hit == 0 {
        return Err(AbilityError::NoTarget);
    }
    Ok(format!("Volley hit {hit} enemies."))
}

pub(crate) fn focus(ctx: &mut AbilityContext<'_>) -> Result<String, AbilityError> {
    ctx.actor_mut()?.range_boost += 2;
    Ok("Focused: +2 range.".to_string())
}

pub(crate) fn dash(ctx: &mut AbilityContext<'_>) -> Result<String, AbilityError> {
    ctx.actor_mut()?.temp_move += 2;
    Ok("Dashed: +2 move.".to_string())
}

pub(crate) fn bulwark(ctx: &mut AbilityContext<'_>) -> Result<String, AbilityError> {
    let unit = ctx.actor_mut()?;
    if unit.shielded {
        return Err(AbilityError::Unavailable("already shielded"));
    }
    unit.shielded = true;
    Ok("Shield raised.".to_string())
}

pub(crate) fn heal(ctx: &mut AbilityContext<'_>) -> Result<String, AbilityError> {
    let target = ctx
        .wounded_allies_adjacent()?
        .first()
        .copied()
        .ok_or(AbilityError::NoTarget)?;
    let amount = ctx.rules().heal_amount;
    let restored = ctx.heal(target, amount)?;
    Ok(format!("Healed {target} for {restored} hp."))
}

pub(crate) fn build_bridge(ctx: &mut AbilityContext<'_>) -> Result<String, AbilityError> {
    let water = ctx
        .adjacent_tiles()?
        .into_iter()
        .find(|&at| ctx.terrain(at) == Some(Terrain::Water))
        .ok_or(AbilityError::NoTarget)?;
    ctx.raise_bridge(water)?;
    Ok(format!("Bridge built at {water}."))
}

pub(crate) fn bombard(ctx: &mut AbilityContext<'_>) -> Result<String, AbilityError> {
    let actor = ctx.actor()?;
    let (pos, range) = (actor.pos, actor.effective_range());
    let target = ctx
        .visible_enemies_within(pos, range)?
        .first()
        .copied()
        .ok_or(AbilityError::NoTarget)?;
    let center = ctx.position_of(target).ok_or(AbilityError::NoTarget)?;
    let hit = ctx.strike_area(center, BOMBARD_RADIUS, BOMBARD_DAMAGE)?;
    Ok(format!("Bombarded {center}, hitting {hit} enemies."))
}

pub(crate) fn backstab(ctx: &mut AbilityContext<'_>) -> Result<String, AbilityError> {
    let unit = ctx.actor_mut()?;
    if unit.double_damage {
        return Err(AbilityError::Unavailable("backstab already prepared"));
    }
    unit.double_damage = true;
    Ok("Next attack deals double damage.".to_string())
}

pub(crate) fn vanish(ctx: &mut AbilityContext<'_>) -> Result<String, AbilityError> {
    let until = ctx.turn() + 1;
    ctx.actor_mut()?.invisible_until = Some(until);
    Ok("Vanished from sight.".to_string())
}

pub(crate) fn headshot(ctx: &mut AbilityContext<'_>) -> Result<String, AbilityError> {
    let threshold = ctx.rules().execute_threshold;
    ctx.actor_mut()?.execute_below = Some(threshold);
    Ok(format!("Next attack executes targets at {threshold} hp or less."))
}

pub(crate) fn freeze(ctx: &mut AbilityContext<'_>) -> Result<String, AbilityError> {
    ctx.actor_mut()?.freeze_next = true;
    Ok("Next attack freezes its target.".to_string())
}

pub(crate) fn siege(ctx: &mut AbilityContext<'_>) -> Result<String, AbilityError> {
    let unit = ctx.actor_mut()?;
    unit.temp_attack += 2;
    unit.range_boost += 1;
    Ok("Siege mode: +2 attack, +1 range.".to_string())
}

pub(crate) fn dive(ctx: &mut AbilityContext<'_>) -> Result<String, AbilityError> {
    ctx.actor_mut()?.temp_attack += 2;
    Ok("Diving: +2 attack.".to_string())
}

#[cfg(test)]
mod tests {
    use crate::game::test_support::{duel_state, place};
    use crate::game::{Coord, Terrain, UnitType};

    #[test]
    fn test_volley_hits_every_visible_enemy_in_range() {
        let mut state = duel_state();
        let archer = place(&mut state, UnitType::Archer, 1, Coord::new(2, 2));
        let near = place(&mut state, UnitType::Soldier, 2, Coord::new(2, 4));
        let far = place(&mut state, UnitType::Scout, 2, Coord::new(8, 8));
        let hidden = place(&mut state, UnitType::Marine, 2, Coord::new(3, 2));
        state.unit_mut(hidden).unwrap().invisible_until = Some(5);

        let report = state.use_ability(archer, 0).unwrap();
        assert!(report.applied);
        assert_eq!(state.unit(near).unwrap().hp, 5);
        assert_eq!(state.unit(far).unwrap().hp, 3);
        assert_eq!(state.unit(hidden).unwrap().hp, 5);
    }

    #[test]
    fn test_volley_without_targets_has_no_effect() {
        let mut state = duel_state();
        let archer = place(&mut state, UnitType::Archer, 1, Coord::new(2, 2));
        let report = state.use_ability(archer, 0).unwrap();
        assert!(!report.applied);
        assert_eq!(state.unit(archer).unwrap().actions_left, 1);
    }

    #[test]
    fn test_heal_picks_most_wounded_and_caps() {
        let mut state = duel_state();
        let medic = place(&mut state, UnitType::Medic, 1, Coord::new(3, 3));
        let light = place(&mut state, UnitType::Soldier, 1, Coord::new(3, 4));
        let heavy = place(&mut state, UnitType::Tank, 1, Coord::new(4, 3));
        state.unit_mut(light).unwrap().hp = 5;
        state.unit_mut(heavy).unwrap().hp = 4;

        state.use_ability(medic, 0).unwrap();
        assert_eq!(state.unit(heavy).unwrap().hp, 7);
        assert_eq!(state.unit(light).unwrap().hp, 5);

        state.use_ability(medic, 0).unwrap();
        assert_eq!(state.unit(heavy).unwrap().hp, 10);
    }

    #[test]
    fn test_heal_does_not_exceed_max() {
        let mut state = duel_state();
        let medic = place(&mut state, UnitType::Medic, 1, Coord::new(3, 3));
        let soldier = place(&mut state, UnitType::Soldier, 1, Coord::new(3, 4));
        state.unit_mut(soldier).unwrap().hp = 5;

        let report = state.use_ability(medic, 0).unwrap();
        assert!(report.message.contains("1 hp"));
        assert_eq!(state.unit(soldier).unwrap().hp, 6);
    }

    #[test]
    fn test_build_bridge_converts_adjacent_water() {
        let mut state = duel_state();
        state.set_terrain(Coord::new(4, 3), Terrain::Water).unwrap();
        let builder = place(&mut state, UnitType::Builder, 1, Coord::new(3, 3));

        let report = state.use_ability(builder, 0).unwrap();
        assert!(report.applied);
        assert_eq!(state.board().terrain(Coord::new(4, 3)), Some(Terrain::Bridge));
    }

    #[test]
    fn test_bombard_splashes_around_target() {
        let mut state = duel_state();
        state.set_terrain(Coord::new(2, 2), Terrain::Water).unwrap();
        let gunship = place(&mut state, UnitType::Gunship, 1, Coord::new(2, 2));
        let first = place(&mut state, UnitType::Soldier, 2, Coord::new(2, 4));
        let second = place(&mut state, UnitType::Soldier, 2, Coord::new(2, 5));

        state.use_ability(gunship, 0).unwrap();
        assert_eq!(state.unit(first).unwrap().hp, 4);
        assert_eq!(state.unit(second).unwrap().hp, 4);
    }

    #[test]
    fn test_bulwark_twice_faults() {
        let mut state = duel_state();
        let tank = place(&mut state, UnitType::Tank, 1, Coord::new(3, 3));
        assert!(state.use_ability(tank, 0).unwrap().applied);
        assert!(!state.use_ability(tank, 0).unwrap().applied);
        assert!(state.unit(tank).unwrap().shielded);
        assert_eq!(state.unit(tank).unwrap().actions_left, 0);
    }

    #[test]
    fn test_vanish_marks_actor_invisible() {
        let mut state = duel_state();
        let shade = place(&mut state, UnitType::Shade, 1, Coord::new(3, 3));
        state.use_ability(shade, 1).unwrap();
        assert_eq!(state.unit(shade).unwrap().invisible_until, Some(state.turn() + 1));
    }
}
