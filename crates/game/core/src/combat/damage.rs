//! Damage calculation and application.

use crate::config::DamageParams;
use crate::env::{RngOracle, RollContext, compute_seed};
use crate::state::Combatant;

// ============================================================================
// Damage Calculation
// ============================================================================

/// Calculate damage of a normal strike.
///
/// # Formula
///
/// ```text
/// final_damage = max(minimum, total_attack - total_defense)
/// ```
///
/// `minimum` comes from [`DamageParams`] and is never below 1.
pub fn calculate_damage(attacker: &Combatant, defender: &Combatant, params: &DamageParams) -> i32 {
    let raw = attacker
        .total_attack()
        .saturating_sub(defender.total_defense());
    raw.max(floor(params))
}

/// Calculate damage of a special ability.
///
/// # Formula
///
/// ```text
/// boosted = total_attack * special_multiplier_pct / 100 + special_bonus
/// final_damage = max(minimum, boosted - total_defense)
/// ```
pub fn calculate_special_ability_damage(
    attacker: &Combatant,
    defender: &Combatant,
    params: &DamageParams,
) -> i32 {
    let boosted = scale_pct(attacker.total_attack(), params.special_multiplier_pct)
        .saturating_add(params.special_bonus);
    boosted
        .saturating_sub(defender.total_defense())
        .max(floor(params))
}

/// Independent critical-hit roll.
pub fn is_critical_hit(rng: &dyn RngOracle, seed: u64, params: &DamageParams) -> bool {
    rng.chance_pct(seed, params.crit_chance_pct)
}

/// Scales damage by the critical multiplier, truncating toward zero.
pub fn apply_critical(damage: i32, params: &DamageParams) -> i32 {
    scale_pct(damage, params.crit_multiplier_pct).max(floor(params))
}

/// `value * pct / 100` in wide arithmetic, saturated back into `i32`.
fn scale_pct(value: i32, pct: i32) -> i32 {
    let scaled = i64::from(value) * i64::from(pct) / 100;
    scaled.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Resolved strike before it lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strike {
    pub damage: i32,
    pub is_critical: bool,
    pub is_special: bool,
}

/// Rolls a complete strike: optional special ability, then the critical check.
///
/// `allow_special` is false for player attacks; the special-ability policy
/// belongs to enemies.
pub fn roll_strike(
    attacker: &Combatant,
    defender: &Combatant,
    params: &DamageParams,
    rng: &dyn RngOracle,
    seed_of: impl Fn(RollContext) -> u64,
    allow_special: bool,
) -> Strike {
    let special_seed = seed_of(RollContext::SpecialAbility);
    let is_special = allow_special && rng.chance_pct(special_seed, params.special_chance_pct);
    let base = if is_special {
        calculate_special_ability_damage(attacker, defender, params)
    } else {
        calculate_damage(attacker, defender, params)
    };

    let is_critical = is_critical_hit(rng, seed_of(RollContext::Critical), params);
    let damage = if is_critical {
        apply_critical(base, params)
    } else {
        base
    };

    Strike {
        damage,
        is_critical,
        is_special,
    }
}

fn floor(params: &DamageParams) -> i32 {
    params.minimum.max(1)
}

// ============================================================================
// Damage Application
// ============================================================================

/// Subtracts `amount` from the target's health, clamped at zero.
///
/// Does not latch `is_defeated`; callers check [`is_character_defeated`] so
/// the defeat transition can trigger its one-time side effects.
///
/// Returns the health actually removed.
pub fn apply_damage(target: &mut Combatant, amount: i32) -> i32 {
    let before = target.current_health();
    target.set_health(before - amount.max(0));
    before - target.current_health()
}

/// True iff the combatant's health has reached zero.
pub fn is_character_defeated(combatant: &Combatant) -> bool {
    combatant.current_health() <= 0
}

/// Convenience for building the per-roll seed closure used by [`roll_strike`].
pub fn seeds_for(battle_seed: u64, nonce: u64, actor: u32) -> impl Fn(RollContext) -> u64 {
    move |context| compute_seed(battle_seed, nonce, actor, context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::testing::FixedRng;

    fn player() -> Combatant {
        Combatant::player("Hero", 100, 20, 5)
    }

    fn goblin() -> Combatant {
        Combatant::new("Goblin", 50, 10, 5)
    }

    #[test]
    fn damage_is_attack_minus_defense() {
        let params = DamageParams::default();
        assert_eq!(calculate_damage(&player(), &goblin(), &params), 15);
    }

    #[test]
    fn damage_never_drops_below_one() {
        let params = DamageParams {
            minimum: 0,
            ..DamageParams::default()
        };
        let weakling = Combatant::new("Rat", 5, 1, 0);
        let tank = Combatant::new("Golem", 500, 0, 400);
        assert_eq!(calculate_damage(&weakling, &tank, &params), 1);
        assert_eq!(calculate_special_ability_damage(&weakling, &tank, &params), 1);
    }

    #[test]
    fn special_ability_uses_multiplier_and_bonus() {
        let params = DamageParams::default();
        // 20 * 150 / 100 + 5 - 5
        assert_eq!(
            calculate_special_ability_damage(&player(), &goblin(), &params),
            30
        );
    }

    #[test]
    fn critical_truncates_toward_zero() {
        let params = DamageParams::default();
        assert_eq!(apply_critical(15, &params), 22);
        assert_eq!(apply_critical(1, &params), 1);
    }

    #[test]
    fn large_stats_scale_without_overflow() {
        let params = DamageParams::default();
        let titan = Combatant::new("Titan", 30_000_000, 20_000_000, 0);
        // 20_000_000 * 150 / 100 + 5
        assert_eq!(
            calculate_special_ability_damage(&titan, &goblin(), &params),
            30_000_000
        );
        assert_eq!(apply_critical(20_000_000, &params), 30_000_000);
        assert_eq!(apply_critical(i32::MAX, &params), i32::MAX);
    }

    #[test]
    fn apply_damage_clamps_at_zero_without_latching_defeat() {
        let mut target = goblin();
        assert_eq!(apply_damage(&mut target, 80), 50);
        assert_eq!(target.current_health(), 0);
        assert!(is_character_defeated(&target));
        assert!(!target.is_defeated);
    }

    #[test]
    fn strike_without_rolls_is_plain_damage() {
        let params = DamageParams::default();
        let strike = roll_strike(
            &player(),
            &goblin(),
            &params,
            &FixedRng::NEVER,
            seeds_for(1, 0, 0),
            true,
        );
        assert_eq!(
            strike,
            Strike {
                damage: 15,
                is_critical: false,
                is_special: false
            }
        );
    }

    #[test]
    fn strike_with_all_rolls_is_critical_special() {
        let params = DamageParams::default();
        let strike = roll_strike(
            &goblin(),
            &player(),
            &params,
            &FixedRng::ALWAYS,
            seeds_for(1, 0, 1),
            true,
        );
        // special: 10 * 1.5 + 5 - 5 = 15, critical: 15 * 1.5 = 22
        assert!(strike.is_special && strike.is_critical);
        assert_eq!(strike.damage, 22);
    }
}
