//! Content loaders for reading battle data from files.
//!
//! Each loader turns one RON/TOML file into the battle-core type that consumes it.
//! [`ContentFactory`] knows the file layout of a data directory and loads everything
//! at once.

pub mod config;
pub mod enemy;
pub mod factory;
pub mod item;
pub mod loot;
pub mod recipe;

pub use config::ConfigLoader;
pub use enemy::EnemyLoader;
pub use factory::{ContentBundle, ContentFactory};
pub use item::ItemLoader;
pub use loot::LootLoader;
pub use recipe::RecipeLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
