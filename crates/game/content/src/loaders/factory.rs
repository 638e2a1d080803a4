//! Content factory for building battle content from data files.

use std::path::{Path, PathBuf};

use battle_core::{BattleConfig, ItemCatalog, ItemOracle, RecipeBook, RewardGenerator};

use crate::enemies::Bestiary;
use crate::loaders::{
    ConfigLoader, EnemyLoader, ItemLoader, LoadResult, LootLoader, RecipeLoader,
};

/// Everything a host needs to run battles and crafting.
#[derive(Clone, Debug)]
pub struct ContentBundle {
    pub config: BattleConfig,
    pub items: ItemCatalog,
    pub recipes: RecipeBook,
    pub bestiary: Bestiary,
    pub loot: RewardGenerator,
}

impl ContentBundle {
    /// Names referenced by recipes or loot tables that the item catalog does
    /// not define.
    pub fn dangling_items(&self) -> Vec<String> {
        let recipe_refs = self.recipes.iter().flat_map(|recipe| {
            recipe
                .materials()
                .into_keys()
                .chain(std::iter::once(recipe.result.clone()))
        });
        let loot_refs = self
            .loot
            .mob
            .entries
            .iter()
            .chain(&self.loot.boss.entries)
            .map(|entry| entry.item.clone());

        let mut dangling: Vec<String> = recipe_refs
            .chain(loot_refs)
            .filter(|name| self.items.definition(name).is_none())
            .collect();
        dangling.sort();
        dangling.dedup();
        dangling
    }
}

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── items.ron
/// ├── recipes.ron
/// ├── enemies.ron
/// └── loot.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<ItemCatalog> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    /// Load recipe book from `recipes.ron`.
    pub fn load_recipes(&self) -> LoadResult<RecipeBook> {
        RecipeLoader::load(&self.data_dir.join("recipes.ron"))
    }

    /// Load enemy templates and encounters from `enemies.ron`.
    pub fn load_enemies(&self) -> LoadResult<Bestiary> {
        EnemyLoader::load(&self.data_dir.join("enemies.ron"))
    }

    /// Load mob and boss loot tables from `loot.ron`.
    pub fn load_loot(&self) -> LoadResult<RewardGenerator> {
        LootLoader::load(&self.data_dir.join("loot.ron"))
    }

    /// Load every content file and check cross references.
    ///
    /// Unknown item names in recipes or loot tables fail the load; the engine
    /// would otherwise silently skip them.
    pub fn load_all(&self) -> LoadResult<ContentBundle> {
        let bundle = ContentBundle {
            config: self.load_config()?,
            items: self.load_items()?,
            recipes: self.load_recipes()?,
            bestiary: self.load_enemies()?,
            loot: self.load_loot()?,
        };

        let dangling = bundle.dangling_items();
        if !dangling.is_empty() {
            anyhow::bail!(
                "Content references unknown items: {}",
                dangling.join(", ")
            );
        }

        tracing::info!(
            data_dir = %self.data_dir.display(),
            items = bundle.items.len(),
            recipes = bundle.recipes.len(),
            enemies = bundle.bestiary.templates.len(),
            "content loaded"
        );
        Ok(bundle)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn missing_directory_reports_the_file() {
        let err = ContentFactory::new("/nonexistent/skirmish")
            .load_config()
            .unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }
}
