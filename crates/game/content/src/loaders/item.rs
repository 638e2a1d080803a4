//! Item catalog loader.

use std::collections::HashSet;
use std::path::Path;

use battle_core::{ItemCatalog, ItemDefinition, ItemKind};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// On-disk layout of `items.ron`.
#[derive(Debug, Deserialize)]
struct ItemFile {
    items: Vec<ItemDefinition>,
}

/// Loader for item catalogs from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load an item catalog from a RON file.
    ///
    /// Duplicate names are rejected. Unique items are clamped to a stack of one.
    pub fn load(path: &Path) -> LoadResult<ItemCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ItemCatalog> {
        let file: ItemFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        let mut seen = HashSet::new();
        let mut items = Vec::with_capacity(file.items.len());
        for mut item in file.items {
            if item.name.trim().is_empty() {
                anyhow::bail!("Item with an empty name");
            }
            if !seen.insert(item.name.clone()) {
                anyhow::bail!("Duplicate item definition: {}", item.name);
            }
            if item.max_stack == 0 {
                anyhow::bail!("Item {} has max_stack 0", item.name);
            }
            if matches!(item.kind, ItemKind::Unique | ItemKind::Equipment) && item.max_stack > 1 {
                tracing::warn!(item = %item.name, "non-stackable item declared a stack limit; clamping to 1");
                item.max_stack = 1;
            }
            items.push(item);
        }

        tracing::debug!(count = items.len(), "loaded item catalog");
        Ok(ItemCatalog::new(items))
    }
}
