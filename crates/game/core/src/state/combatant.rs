//! Battle participants.
//!
//! A [`Combatant`] stores base stats, vitals and timed modifiers. Derived
//! stats (`total_attack`, `total_defense`) are computed on demand from the
//! active buffs, so expiring a buff restores the base value exactly.

use arrayvec::ArrayVec;

use crate::config::BattleConfig;

/// Kind of timed modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BuffKind {
    /// Adds `magnitude` to total attack.
    Attack,
    /// Adds `magnitude` to total defense.
    Defense,
    /// Combatant skips its action while active. Magnitude is unused.
    Stun,
}

/// A timed modifier with its remaining duration in own-turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Buff {
    pub kind: BuffKind,
    pub magnitude: i32,
    pub turns_remaining: u32,
}

/// Cosmetic tint shown by the host. Never read by gameplay math.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ColorEffectKind {
    Damaged,
    Healed,
    Poisoned,
    Stunned,
    Empowered,
    Fortified,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorEffect {
    pub kind: ColorEffectKind,
    pub turns_remaining: u32,
}

/// A battle participant (player or enemy).
///
/// # Invariants
///
/// - `0 <= current_health <= max_health`
/// - `attack >= 0`, `defense >= 0`
/// - at most one buff per [`BuffKind`]
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub name: String,
    pub is_player: bool,
    /// Boss flag; any hero among the enemies makes the battle a boss battle.
    pub is_hero: bool,

    current_health: i32,
    max_health: i32,
    attack: i32,
    defense: i32,

    /// Latched once by the battle when the defeat is first observed.
    pub is_defeated: bool,

    is_poisoned: bool,
    poison_damage: i32,
    /// Round in which poison last ticked; keeps poison to one tick per round.
    last_poison_round: Option<u32>,

    buffs: ArrayVec<Buff, { BattleConfig::MAX_BUFFS }>,

    pub active_color_effect: Option<ColorEffect>,
}

impl Combatant {
    /// Creates a combatant at full health. Negative inputs are clamped to zero.
    pub fn new(name: impl Into<String>, max_health: i32, attack: i32, defense: i32) -> Self {
        let max_health = max_health.max(0);
        Self {
            name: name.into(),
            is_player: false,
            is_hero: false,
            current_health: max_health,
            max_health,
            attack: attack.max(0),
            defense: defense.max(0),
            is_defeated: false,
            is_poisoned: false,
            poison_damage: 0,
            last_poison_round: None,
            buffs: ArrayVec::new(),
            active_color_effect: None,
        }
    }

    pub fn player(name: impl Into<String>, max_health: i32, attack: i32, defense: i32) -> Self {
        Self {
            is_player: true,
            ..Self::new(name, max_health, attack, defense)
        }
    }

    #[must_use]
    pub fn as_hero(mut self) -> Self {
        self.is_hero = true;
        self
    }

    /// Sets current health, clamped into `0..=max_health`.
    #[must_use]
    pub fn with_health(mut self, current_health: i32) -> Self {
        self.set_health(current_health);
        self
    }

    // ===== vitals =====

    pub fn current_health(&self) -> i32 {
        self.current_health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn set_health(&mut self, value: i32) {
        self.current_health = value.clamp(0, self.max_health);
    }

    /// Restores health up to max. Returns the amount actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.current_health;
        self.set_health(before.saturating_add(amount.max(0)));
        self.current_health - before
    }

    /// Health in percent of max (0 for a zero-max combatant).
    pub fn health_pct(&self) -> i32 {
        if self.max_health == 0 {
            return 0;
        }
        let pct = i64::from(self.current_health) * 100 / i64::from(self.max_health);
        pct as i32
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0 && !self.is_defeated
    }

    // ===== stats =====

    pub fn attack(&self) -> i32 {
        self.attack
    }

    pub fn defense(&self) -> i32 {
        self.defense
    }

    pub fn total_attack(&self) -> i32 {
        self.attack.saturating_add(self.buff_total(BuffKind::Attack))
    }

    pub fn total_defense(&self) -> i32 {
        self.defense.saturating_add(self.buff_total(BuffKind::Defense))
    }

    fn buff_total(&self, kind: BuffKind) -> i32 {
        self.buffs
            .iter()
            .filter(|b| b.kind == kind && b.turns_remaining > 0)
            .fold(0i32, |total, b| total.saturating_add(b.magnitude))
    }

    // ===== status =====

    pub fn is_stunned(&self) -> bool {
        self.buff(BuffKind::Stun).is_some()
    }

    pub fn is_poisoned(&self) -> bool {
        self.is_poisoned
    }

    pub fn poison_damage(&self) -> i32 {
        self.poison_damage
    }

    pub(crate) fn set_poison(&mut self, damage: i32) {
        self.is_poisoned = true;
        self.poison_damage = damage.max(0);
    }

    pub(crate) fn clear_poison(&mut self) {
        self.is_poisoned = false;
        self.poison_damage = 0;
        self.last_poison_round = None;
    }

    /// Records a poison tick for `round`. Returns false if it already ticked.
    pub(crate) fn claim_poison_tick(&mut self, round: u32) -> bool {
        if self.last_poison_round == Some(round) {
            return false;
        }
        self.last_poison_round = Some(round);
        true
    }

    /// Returns the active buff of the given kind.
    pub fn buff(&self, kind: BuffKind) -> Option<&Buff> {
        self.buffs
            .iter()
            .find(|b| b.kind == kind && b.turns_remaining > 0)
    }

    pub fn buffs(&self) -> impl Iterator<Item = &Buff> {
        self.buffs.iter()
    }

    pub fn has_buffs(&self) -> bool {
        !self.buffs.is_empty()
    }

    pub(crate) fn buffs_mut(&mut self) -> &mut ArrayVec<Buff, { BattleConfig::MAX_BUFFS }> {
        &mut self.buffs
    }

    /// Drops every timed modifier and status. Used when a battle ends so the
    /// persistent roster entry carries only its health forward.
    pub fn clear_battle_effects(&mut self) {
        self.buffs.clear();
        self.clear_poison();
        self.active_color_effect = None;
    }

    pub fn set_color_effect(&mut self, kind: ColorEffectKind, turns: u32) {
        self.active_color_effect = Some(ColorEffect {
            kind,
            turns_remaining: turns.max(1),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_combatant_starts_at_full_health() {
        let goblin = Combatant::new("Goblin", 50, 10, 5);
        assert_eq!(goblin.current_health(), 50);
        assert!(goblin.is_alive());
        assert!(!goblin.is_player);
        assert!(!goblin.is_hero);
    }

    #[test]
    fn health_is_clamped() {
        let mut hero = Combatant::player("Hero", 100, 20, 5).with_health(150);
        assert_eq!(hero.current_health(), 100);
        hero.set_health(-10);
        assert_eq!(hero.current_health(), 0);
        assert!(!hero.is_alive());
    }

    #[test]
    fn heal_reports_restored_amount() {
        let mut hero = Combatant::player("Hero", 100, 20, 5).with_health(90);
        assert_eq!(hero.heal(30), 10);
        assert_eq!(hero.current_health(), 100);
    }

    #[test]
    fn negative_stats_clamp_to_zero() {
        let slime = Combatant::new("Slime", 10, -3, -1);
        assert_eq!(slime.attack(), 0);
        assert_eq!(slime.defense(), 0);
    }

    #[test]
    fn poison_ticks_once_per_round() {
        let mut rat = Combatant::new("Rat", 10, 1, 0);
        rat.set_poison(2);
        assert!(rat.claim_poison_tick(1));
        assert!(!rat.claim_poison_tick(1));
        assert!(rat.claim_poison_tick(2));
    }

    #[test]
    fn huge_health_pools_report_percentages() {
        let titan = Combatant::new("Titan", 30_000_000, 10, 0);
        assert_eq!(titan.health_pct(), 100);
        assert_eq!(titan.with_health(15_000_000).health_pct(), 50);
    }

    #[test]
    fn buffed_totals_saturate_at_the_stat_ceiling() {
        let mut titan = Combatant::new("Titan", 100, i32::MAX, i32::MAX - 1);
        titan.buffs_mut().push(Buff {
            kind: BuffKind::Attack,
            magnitude: 500,
            turns_remaining: 2,
        });
        titan.buffs_mut().push(Buff {
            kind: BuffKind::Defense,
            magnitude: 500,
            turns_remaining: 2,
        });
        assert_eq!(titan.total_attack(), i32::MAX);
        assert_eq!(titan.total_defense(), i32::MAX);
    }
}
