use core::time::Duration;

/// Balance parameters for damage resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DamageParams {
    /// Floor applied to every damage formula.
    pub minimum: i32,
    /// Chance (0-100) that a strike is critical.
    pub crit_chance_pct: u32,
    /// Critical multiplier in percent (150 = x1.5, truncated toward zero).
    pub crit_multiplier_pct: i32,
    /// Chance (0-100) that an enemy uses its special ability instead of a normal strike.
    pub special_chance_pct: u32,
    /// Special ability multiplier in percent applied to total attack.
    pub special_multiplier_pct: i32,
    /// Flat bonus added by the special ability before defense.
    pub special_bonus: i32,
}

impl Default for DamageParams {
    fn default() -> Self {
        Self {
            minimum: 1,
            crit_chance_pct: 15,
            crit_multiplier_pct: 150,
            special_chance_pct: 20,
            special_multiplier_pct: 150,
            special_bonus: 5,
        }
    }
}

/// Tunables for enemy potion use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnemyPotionParams {
    /// Chance (0-100) that an enemy drinks a potion instead of attacking.
    pub chance_pct: u32,
    /// Enemies below this share of max health (percent) prefer healing.
    pub heal_threshold_pct: i32,
    pub heal_amount: i32,
    pub buff_amount: i32,
    pub buff_turns: u32,
}

impl Default for EnemyPotionParams {
    fn default() -> Self {
        Self {
            chance_pct: 15,
            heal_threshold_pct: 50,
            heal_amount: 20,
            buff_amount: 5,
            buff_turns: 3,
        }
    }
}

/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    pub damage: DamageParams,
    pub enemy_potion: EnemyPotionParams,
    /// Minimum wall-clock gap between two item uses, in milliseconds.
    pub item_cooldown_ms: u64,
    /// Upper bound on waiting for an animation-completed signal, in milliseconds.
    pub watchdog_ms: u64,
    /// Turns a cosmetic colour effect stays visible.
    pub color_effect_turns: u32,
    /// Number of entries retained by the battle log.
    pub log_capacity: usize,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_ENEMIES: usize = 8;
    pub const MAX_BUFFS: usize = 8;
    pub const MAX_INVENTORY_SLOTS: usize = 24;
    pub const QUICK_SLOTS: usize = 6;
    pub const GRID_SIZE: usize = 9;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ITEM_COOLDOWN_MS: u64 = 500;
    pub const DEFAULT_WATCHDOG_MS: u64 = 3_000;
    pub const DEFAULT_COLOR_EFFECT_TURNS: u32 = 1;
    pub const DEFAULT_LOG_CAPACITY: usize = 64;

    pub fn new() -> Self {
        Self {
            damage: DamageParams::default(),
            enemy_potion: EnemyPotionParams::default(),
            item_cooldown_ms: Self::DEFAULT_ITEM_COOLDOWN_MS,
            watchdog_ms: Self::DEFAULT_WATCHDOG_MS,
            color_effect_turns: Self::DEFAULT_COLOR_EFFECT_TURNS,
            log_capacity: Self::DEFAULT_LOG_CAPACITY,
        }
    }

    pub fn item_cooldown(&self) -> Duration {
        Duration::from_millis(self.item_cooldown_ms)
    }

    pub fn watchdog(&self) -> Duration {
        Duration::from_millis(self.watchdog_ms)
    }

    pub fn with_watchdog_ms(mut self, watchdog_ms: u64) -> Self {
        self.watchdog_ms = watchdog_ms;
        self
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
