//! Status effect engine: timed buffs, stun, poison and colour countdowns.
//!
//! # Stacking
//!
//! A combatant holds at most one buff per [`BuffKind`]. Re-applying a kind
//! refreshes it: the stronger magnitude and the longer duration win. Values
//! never add up, so repeated potions cannot snowball a stat.
//!
//! # Poison
//!
//! Poison has a per-tick damage but no duration. It lasts until cured or the
//! battle ends, and ticks at most once per round per combatant.

use crate::combat::damage::apply_damage;
use crate::state::{Buff, BuffKind, Combatant};

/// How [`apply_buff`] changed the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuffApplication {
    Added,
    Refreshed,
    /// No free buff slot; nothing changed.
    Ignored,
}

/// Adds or refreshes a timed modifier.
pub fn apply_buff(
    target: &mut Combatant,
    kind: BuffKind,
    magnitude: i32,
    duration_turns: u32,
) -> BuffApplication {
    if duration_turns == 0 {
        return BuffApplication::Ignored;
    }

    let buffs = target.buffs_mut();
    if let Some(existing) = buffs.iter_mut().find(|b| b.kind == kind) {
        existing.magnitude = existing.magnitude.max(magnitude);
        existing.turns_remaining = existing.turns_remaining.max(duration_turns);
        tracing::debug!(combatant = %target.name, %kind, "buff refreshed");
        return BuffApplication::Refreshed;
    }

    let buff = Buff {
        kind,
        magnitude,
        turns_remaining: duration_turns,
    };
    if buffs.try_push(buff).is_err() {
        return BuffApplication::Ignored;
    }
    tracing::debug!(combatant = %target.name, %kind, magnitude, duration_turns, "buff applied");
    BuffApplication::Added
}

/// Ticks every buff down by one own-turn and drops the expired ones.
///
/// Called once per combatant at the start of its own turn. Returns the kinds
/// that expired. A combatant without buffs is left untouched.
pub fn update_temporary_bonuses(target: &mut Combatant) -> Vec<BuffKind> {
    if !target.has_buffs() {
        return Vec::new();
    }

    let buffs = target.buffs_mut();
    for buff in buffs.iter_mut() {
        buff.turns_remaining = buff.turns_remaining.saturating_sub(1);
    }

    let expired: Vec<BuffKind> = buffs
        .iter()
        .filter(|b| b.turns_remaining == 0)
        .map(|b| b.kind)
        .collect();
    buffs.retain(|b| b.turns_remaining > 0);

    for kind in &expired {
        tracing::debug!(combatant = %target.name, %kind, "buff expired");
    }
    expired
}

/// Poisons the target. A stronger poison replaces a weaker one.
pub fn apply_poison(target: &mut Combatant, damage: i32) {
    let damage = if target.is_poisoned() {
        target.poison_damage().max(damage)
    } else {
        damage
    };
    target.set_poison(damage);
    tracing::debug!(combatant = %target.name, damage, "poisoned");
}

/// Explicit cure; the only way poison ends inside a battle.
pub fn cure_poison(target: &mut Combatant) -> bool {
    let was_poisoned = target.is_poisoned();
    target.clear_poison();
    was_poisoned
}

/// Applies one poison tick for `round`, unless it already ticked this round.
///
/// Returns the damage dealt, or `None` when nothing happened.
pub fn tick_poison(target: &mut Combatant, round: u32) -> Option<i32> {
    if !target.is_poisoned() || !target.is_alive() || !target.claim_poison_tick(round) {
        return None;
    }
    let damage = target.poison_damage();
    let dealt = apply_damage(target, damage);
    tracing::debug!(combatant = %target.name, dealt, round, "poison tick");
    Some(dealt)
}

/// What end-of-turn processing did to a combatant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EndOfTurn {
    pub poison_damage: Option<i32>,
    pub color_effect_cleared: bool,
}

/// End-of-turn processing for one combatant: poison tick and colour countdown.
pub fn process_end_of_turn(target: &mut Combatant, round: u32) -> EndOfTurn {
    let poison_damage = tick_poison(target, round);

    let mut color_effect_cleared = false;
    if let Some(effect) = target.active_color_effect.as_mut() {
        effect.turns_remaining = effect.turns_remaining.saturating_sub(1);
        if effect.turns_remaining == 0 {
            target.active_color_effect = None;
            color_effect_cleared = true;
        }
    }

    EndOfTurn {
        poison_damage,
        color_effect_cleared,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ColorEffectKind;

    fn knight() -> Combatant {
        Combatant::player("Knight", 100, 20, 5)
    }

    #[test]
    fn buff_round_trip_restores_base_stats() {
        let mut hero = knight();
        apply_buff(&mut hero, BuffKind::Attack, 10, 2);
        apply_buff(&mut hero, BuffKind::Defense, 4, 1);
        assert_eq!(hero.total_attack(), 30);
        assert_eq!(hero.total_defense(), 9);

        assert_eq!(update_temporary_bonuses(&mut hero), vec![BuffKind::Defense]);
        assert_eq!(hero.total_defense(), 5);
        assert_eq!(update_temporary_bonuses(&mut hero), vec![BuffKind::Attack]);
        assert_eq!(hero.total_attack(), 20);
        assert!(!hero.has_buffs());
    }

    #[test]
    fn update_without_buffs_is_noop() {
        let mut hero = knight();
        let before = hero.clone();
        assert!(update_temporary_bonuses(&mut hero).is_empty());
        assert_eq!(hero, before);
    }

    #[test]
    fn reapplying_refreshes_instead_of_stacking() {
        let mut hero = knight();
        assert_eq!(apply_buff(&mut hero, BuffKind::Attack, 5, 3), BuffApplication::Added);
        assert_eq!(
            apply_buff(&mut hero, BuffKind::Attack, 8, 1),
            BuffApplication::Refreshed
        );
        let buff = hero.buff(BuffKind::Attack).unwrap();
        assert_eq!((buff.magnitude, buff.turns_remaining), (8, 3));
        assert_eq!(hero.total_attack(), 28);
    }

    #[test]
    fn zero_duration_buff_is_ignored() {
        let mut hero = knight();
        assert_eq!(
            apply_buff(&mut hero, BuffKind::Stun, 0, 0),
            BuffApplication::Ignored
        );
        assert!(!hero.is_stunned());
    }

    #[test]
    fn poison_persists_until_cured() {
        let mut rat = Combatant::new("Rat", 30, 2, 0);
        apply_poison(&mut rat, 4);
        for round in 0..3 {
            assert_eq!(tick_poison(&mut rat, round), Some(4));
        }
        assert_eq!(rat.current_health(), 18);
        assert!(rat.is_poisoned());

        assert!(cure_poison(&mut rat));
        assert_eq!(tick_poison(&mut rat, 3), None);
        assert_eq!(rat.current_health(), 18);
    }

    #[test]
    fn end_of_turn_does_not_double_tick() {
        let mut rat = Combatant::new("Rat", 30, 2, 0);
        apply_poison(&mut rat, 5);
        assert_eq!(tick_poison(&mut rat, 1), Some(5));
        assert_eq!(process_end_of_turn(&mut rat, 1).poison_damage, None);
        assert_eq!(rat.current_health(), 25);
    }

    #[test]
    fn color_effect_counts_down() {
        let mut hero = knight();
        hero.set_color_effect(ColorEffectKind::Healed, 1);
        let outcome = process_end_of_turn(&mut hero, 0);
        assert!(outcome.color_effect_cleared);
        assert!(hero.active_color_effect.is_none());
    }
}
