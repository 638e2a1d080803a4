//! Deterministic battle rules and data types shared across hosts.
//!
//! `battle-core` defines the canonical rules (combat math, status effects,
//! the battle state machine, crafting) and exposes pure APIs that the
//! runtime, the content loaders and offline tools all reuse. All battle
//! state mutation flows through [`battle::Battle`]; randomness, time, item
//! definitions and animation playback come in through [`env::BattleEnv`].
pub mod battle;
pub mod combat;
pub mod config;
pub mod crafting;
pub mod env;
pub mod error;
pub mod rewards;
pub mod state;

pub use battle::{
    ActionOutcome, ActionResult, Battle, BattleEvent, BattleLog, BattleOutcome, BattlePhase,
    BattleResult, BattleSnapshot, UsableItem,
};
pub use config::{BattleConfig, DamageParams, EnemyPotionParams};
pub use crafting::{CraftOutcome, CraftingGrid, CraftingRecipe, RecipeBook};
pub use env::{
    AnimationDriver, BattleEnv, Clock, CombatantRef, ConsumableEffect, EffectTarget,
    ItemCatalog, ItemDefinition, ItemKind, ItemOracle, NullAnimator, PcgRng, RngOracle,
    SystemClock,
};
pub use error::{
    BattleError, CraftError, ErrorSeverity, GameError, InventoryError, RejectReason,
};
pub use rewards::{LootEntry, LootTable, RewardGenerator};
pub use state::{Buff, BuffKind, ColorEffect, ColorEffectKind, Combatant, Inventory, ItemStack};
