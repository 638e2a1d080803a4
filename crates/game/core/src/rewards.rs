//! Loot generation for won battles.
//!
//! Tables are game content; this module only guarantees the structure of
//! the result: a (possibly empty) list of stacks, each within its item's
//! stack limit, with unique items appearing at most once.

use crate::config::BattleConfig;
use crate::env::{ItemOracle, RngOracle, RollContext, compute_seed};
use crate::state::ItemStack;

/// One possible drop.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootEntry {
    pub item: String,
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub min: u32,
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub max: u32,
    /// Chance (0-100) that this entry drops on a roll.
    pub chance_pct: u32,
}

#[cfg(feature = "serde")]
fn one() -> u32 {
    1
}

impl LootEntry {
    pub fn new(item: impl Into<String>, min: u32, max: u32, chance_pct: u32) -> Self {
        Self {
            item: item.into(),
            min,
            max,
            chance_pct,
        }
    }
}

/// Entries evaluated `rolls` times; every entry is checked on every roll.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootTable {
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub rolls: u32,
    pub entries: Vec<LootEntry>,
}

impl LootTable {
    pub fn new(rolls: u32, entries: Vec<LootEntry>) -> Self {
        Self { rolls, entries }
    }
}

/// Mob and boss loot tables.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardGenerator {
    pub mob: LootTable,
    pub boss: LootTable,
}

impl RewardGenerator {
    pub fn new(mob: LootTable, boss: LootTable) -> Self {
        Self { mob, boss }
    }

    /// Rolls the boss table for boss battles, the mob table otherwise.
    pub fn generate_battle_rewards(
        &self,
        boss_battle: bool,
        items: &dyn ItemOracle,
        rng: &dyn RngOracle,
        seed: u64,
    ) -> Vec<ItemStack> {
        let table = if boss_battle { &self.boss } else { &self.mob };
        let mut drops = Drops::default();
        roll_table(table, table.rolls, items, rng, seed, 0, &mut drops);
        drops.into_stacks(items)
    }

    /// Count-scaled rewards: one mob roll per defeated enemy, plus the boss
    /// table when a hero fell.
    ///
    /// `enemy_count` is capped at [`BattleConfig::MAX_ENEMIES`].
    pub fn rewards_for_enemies(
        &self,
        enemy_count: usize,
        hero_defeated: bool,
        items: &dyn ItemOracle,
        rng: &dyn RngOracle,
        seed: u64,
    ) -> Vec<ItemStack> {
        let mut drops = Drops::default();
        let enemy_count = enemy_count.min(BattleConfig::MAX_ENEMIES) as u32;
        let mob_rolls = self.mob.rolls.saturating_mul(enemy_count);
        let offset = roll_table(&self.mob, mob_rolls, items, rng, seed, 0, &mut drops);
        if hero_defeated {
            roll_table(&self.boss, self.boss.rolls, items, rng, seed, offset, &mut drops);
        }
        drops.into_stacks(items)
    }
}

/// Returns the next free roll index.
fn roll_table(
    table: &LootTable,
    rolls: u32,
    items: &dyn ItemOracle,
    rng: &dyn RngOracle,
    seed: u64,
    first_roll: u32,
    drops: &mut Drops,
) -> u32 {
    let mut roll = first_roll;
    for _ in 0..rolls {
        for entry in &table.entries {
            let Some(def) = items.definition(&entry.item) else {
                tracing::warn!(item = %entry.item, "loot entry references unknown item");
                continue;
            };
            let hit = rng.chance_pct(
                compute_seed(seed, roll as u64, 0, RollContext::LootRoll),
                entry.chance_pct,
            );
            if hit {
                let quantity = rng.range(
                    compute_seed(seed, roll as u64, 0, RollContext::LootQuantity),
                    entry.min.max(1),
                    entry.max.max(entry.min.max(1)),
                );
                let quantity = if def.is_unique() { 1 } else { quantity };
                drops.push(&entry.item, quantity, def.is_unique());
            }
            roll = roll.wrapping_add(1);
        }
    }
    roll
}

/// Aggregated drops in first-drop order.
#[derive(Default)]
struct Drops {
    totals: Vec<(String, u32)>,
}

impl Drops {
    fn push(&mut self, item: &str, quantity: u32, unique: bool) {
        match self.totals.iter_mut().find(|(name, _)| name == item) {
            Some(_) if unique => {}
            Some((_, total)) => *total = total.saturating_add(quantity),
            None => self.totals.push((item.to_owned(), quantity)),
        }
    }

    /// Splits totals into stacks no larger than each item's limit.
    fn into_stacks(self, items: &dyn ItemOracle) -> Vec<ItemStack> {
        let mut stacks = Vec::new();
        for (name, mut total) in self.totals {
            let max_stack = items.max_stack(&name).unwrap_or(1);
            while total > 0 {
                let take = total.min(max_stack);
                stacks.push(ItemStack::new(name.clone(), take));
                total -= take;
            }
        }
        stacks
    }
}
