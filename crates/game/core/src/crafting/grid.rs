//! Position-sensitive 3x3 crafting grid.

use crate::config::BattleConfig;
use crate::crafting::book::{CraftOutcome, RecipeBook, try_craft};
use crate::crafting::recipe::{CraftingRecipe, Pattern};
use crate::env::ItemOracle;
use crate::error::CraftError;
use crate::state::Inventory;

/// The grid the player arranges materials on.
///
/// Cells hold material names placed by the host; the materials themselves
/// stay in the inventory until a craft is confirmed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CraftingGrid {
    cells: Pattern,
}

impl CraftingGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: Pattern) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &Pattern {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|c| c.as_deref())
    }

    /// Places (or clears, with `None`) a material. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, material: Option<&str>) -> bool {
        match self.cells.get_mut(index) {
            Some(cell) => {
                *cell = material.filter(|m| !m.is_empty()).map(str::to_owned);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.cells = Pattern::default();
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Exact shape match: every cell must agree, including empty ones.
    pub fn matches(&self, recipe: &CraftingRecipe) -> bool {
        let Some(pattern) = &recipe.pattern else {
            return false;
        };
        if recipe.validate().is_err() {
            return false;
        }
        pattern
            .iter()
            .zip(self.cells.iter())
            .all(|(want, have)| want.as_deref() == have.as_deref())
    }

    /// Matches the grid, consumes the recipe's materials from the inventory,
    /// adds the result and clears the grid. Nothing changes on failure.
    pub fn craft_from_grid(
        &mut self,
        book: &RecipeBook,
        inventory: &mut Inventory,
        items: &dyn ItemOracle,
    ) -> Result<CraftOutcome, CraftError> {
        let recipe =
            find_recipe_by_pattern(self, book.iter()).ok_or(CraftError::NoMatchingRecipe)?;
        let outcome = try_craft(recipe, inventory, items)?;
        self.clear();
        Ok(outcome)
    }
}

/// Returns the first registered recipe whose pattern matches the grid exactly.
///
/// Registration order is the tie-break when two recipes share a pattern.
pub fn find_recipe_by_pattern<'a>(
    grid: &CraftingGrid,
    recipes: impl IntoIterator<Item = &'a CraftingRecipe>,
) -> Option<&'a CraftingRecipe> {
    if grid.is_empty() {
        return None;
    }
    recipes.into_iter().find(|recipe| grid.matches(recipe))
}

/// Grid cell index for a row/column pair.
pub const fn cell_index(row: usize, col: usize) -> usize {
    row * 3 + col
}

const _: () = assert!(BattleConfig::GRID_SIZE == 9);
