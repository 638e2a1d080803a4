//! Crafting demo: grid crafting first, then the recipe book.

use anyhow::Result;
use battle_content::ContentBundle;
use battle_core::crafting::try_craft;
use battle_core::{CraftError, CraftOutcome, CraftingGrid, Inventory};

/// Row-major cell layouts the demo places on the grid.
const GRID_PLANS: &[&[(usize, &str)]] = &[
    &[(0, "Wood"), (3, "Wood")],
    &[(0, "Coal"), (3, "Stick")],
    // Deliberately off-shape: no recipe puts stone beside coal.
    &[(0, "Coal"), (1, "Stone")],
];

const BOOK_CRAFTS: usize = 3;

/// Crafts what it can and returns every successful result in order.
pub fn run(content: &ContentBundle, inventory: &mut Inventory) -> Result<Vec<CraftOutcome>> {
    let mut crafted = Vec::new();
    let mut grid = CraftingGrid::new();

    for plan in GRID_PLANS {
        grid.clear();
        for &(cell, material) in plan.iter() {
            grid.set(cell, Some(material));
        }
        match grid.craft_from_grid(&content.recipes, inventory, &content.items) {
            Ok(outcome) => {
                println!("grid: crafted {}x {}", outcome.quantity, outcome.item);
                crafted.push(outcome);
            }
            Err(CraftError::NoMatchingRecipe) => println!("grid: nothing matches that shape"),
            Err(err) => println!("grid: {err}"),
        }
    }

    for _ in 0..BOOK_CRAFTS {
        let Some(recipe) = content.recipes.best_available(inventory) else {
            println!("book: nothing else can be crafted");
            break;
        };
        let outcome = try_craft(recipe, inventory, &content.items)?;
        println!("book: crafted {}x {}", outcome.quantity, outcome.item);
        crafted.push(outcome);
    }

    Ok(crafted)
}
