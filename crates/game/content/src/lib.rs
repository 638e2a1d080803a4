//! Data-driven content definitions and loaders.
//!
//! This crate houses static battle content and provides loaders for RON/TOML data files:
//! - Item catalogs (data-driven via RON)
//! - Crafting recipes, shaped and shapeless (data-driven via RON)
//! - Enemy templates and encounter groups (data-driven via RON)
//! - Mob and boss loot tables (data-driven via RON)
//! - Battle balance configuration (data-driven via TOML)
//!
//! Content is consumed by the engine through its oracles and constructors and
//! never mutates during a battle.
//!
//! All loaders use battle-core types directly with serde for RON/TOML deserialization.

pub mod enemies;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use enemies::{Bestiary, EnemyTemplate, Encounter};

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentBundle, ContentFactory, EnemyLoader, ItemLoader, LoadResult, LootLoader,
    RecipeLoader,
};
