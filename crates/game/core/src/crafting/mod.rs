//! Crafting pattern matcher.
//!
//! Two front-ends share one recipe model:
//!
//! - `grid`: position-sensitive matching of a 3x3 [`CraftingGrid`]
//! - `book`: shape-independent crafting from aggregate inventory counts

pub mod book;
pub mod grid;
pub mod recipe;

pub use book::{CraftOutcome, RecipeBook, can_craft, craft, try_craft};
pub use grid::{CraftingGrid, cell_index, find_recipe_by_pattern};
pub use recipe::{CraftingRecipe, Pattern, materials_of, pattern_from};
