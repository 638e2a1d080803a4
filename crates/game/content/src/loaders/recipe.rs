//! Crafting recipe loader.

use std::path::Path;

use battle_core::{CraftingRecipe, RecipeBook};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Deserialize)]
struct RecipeFile {
    recipes: Vec<CraftingRecipe>,
}

/// Loader for recipe books from RON files.
///
/// Shaped recipes give a nine-cell `pattern` (row-major); their material
/// counts are derived from it. Shapeless recipes give `required_materials`.
pub struct RecipeLoader;

impl RecipeLoader {
    pub fn load(path: &Path) -> LoadResult<RecipeBook> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parses a recipe file. File order is registration order.
    pub fn parse(content: &str) -> LoadResult<RecipeBook> {
        let file: RecipeFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse recipe RON: {}", e))?;

        let mut book = RecipeBook::new();
        for recipe in file.recipes {
            if book.get(&recipe.name).is_some() {
                anyhow::bail!("Duplicate recipe: {}", recipe.name);
            }
            book.register(recipe)
                .map_err(|e| anyhow::anyhow!("Invalid recipe: {}", e))?;
        }

        tracing::debug!(count = book.len(), "loaded recipe book");
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shaped_recipes_derive_their_materials() {
        let book = RecipeLoader::parse(
            r#"(
                recipes: [
                    (
                        name: "Torch",
                        result: "Torch",
                        result_quantity: 2,
                        pattern: Some((Some("Coal"), None, None, Some("Stick"), None, None, None, None, None)),
                    ),
                    (name: "Plank", required_materials: {"Wood": 1}, result: "Plank", result_quantity: 4),
                ],
            )"#,
        )
        .unwrap();

        let torch = book.get("Torch").unwrap();
        assert_eq!(torch.materials().get("Coal"), Some(&1));
        assert_eq!(torch.materials().get("Stick"), Some(&1));
        assert_eq!(book.get("Plank").unwrap().result_quantity, 4);
        assert_eq!(book.iter().next().map(|r| r.name.as_str()), Some("Torch"));
    }

    #[test]
    fn malformed_recipes_fail_the_load() {
        let result = RecipeLoader::parse(r#"(recipes: [(name: "Nothing", result: "Air")])"#);
        assert!(result.is_err());
    }
}
