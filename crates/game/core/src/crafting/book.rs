//! Shape-independent crafting ("recipe book").
//!
//! A recipe is craftable whenever the inventory holds enough of every
//! required material, wherever those materials sit.

use crate::crafting::grid::{CraftingGrid, find_recipe_by_pattern};
use crate::crafting::recipe::CraftingRecipe;
use crate::env::ItemOracle;
use crate::error::{CraftError, InventoryError};
use crate::state::Inventory;

/// Result of a successful craft.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CraftOutcome {
    pub recipe: String,
    pub item: String,
    pub quantity: u32,
}

/// True iff the inventory holds every required material in sufficient count.
pub fn can_craft(recipe: &CraftingRecipe, inventory: &Inventory) -> bool {
    recipe.validate().is_ok() && first_shortage(recipe, inventory).is_none()
}

/// Crafts `recipe` into `inventory`. Returns false, without mutation, when
/// materials are missing, the recipe is malformed, or the result does not fit.
pub fn craft(recipe: &CraftingRecipe, inventory: &mut Inventory, items: &dyn ItemOracle) -> bool {
    match try_craft(recipe, inventory, items) {
        Ok(_) => true,
        Err(err) => {
            tracing::debug!(recipe = %recipe.name, %err, "craft declined");
            false
        }
    }
}

/// Like [`craft`], but reports why a craft failed.
///
/// Materials are removed and the result added on a scratch copy; the
/// inventory is only replaced once both steps succeed.
pub fn try_craft(
    recipe: &CraftingRecipe,
    inventory: &mut Inventory,
    items: &dyn ItemOracle,
) -> Result<CraftOutcome, CraftError> {
    recipe.validate()?;
    if let Some(err) = first_shortage(recipe, inventory) {
        return Err(err);
    }

    let mut scratch = inventory.clone();
    for (material, count) in recipe.materials() {
        scratch
            .remove_item(&material, count)
            .map_err(|err| shortage_from(err, &material))?;
    }
    scratch
        .add_item(&recipe.result, recipe.result_quantity, items)
        .map_err(|err| match err {
            InventoryError::UnknownItem { .. } => CraftError::InvalidRecipe {
                recipe: recipe.name.clone(),
                reason: "result item is not in the catalog",
            },
            _ => CraftError::InventoryFull {
                item: recipe.result.clone(),
                quantity: recipe.result_quantity,
            },
        })?;

    *inventory = scratch;
    tracing::info!(
        recipe = %recipe.name,
        item = %recipe.result,
        quantity = recipe.result_quantity,
        "crafted"
    );
    Ok(CraftOutcome {
        recipe: recipe.name.clone(),
        item: recipe.result.clone(),
        quantity: recipe.result_quantity,
    })
}

fn first_shortage(recipe: &CraftingRecipe, inventory: &Inventory) -> Option<CraftError> {
    recipe.materials().into_iter().find_map(|(material, required)| {
        let available = inventory.count_of(&material);
        (available < required).then(|| CraftError::InsufficientMaterials {
            material,
            required,
            available,
        })
    })
}

fn shortage_from(err: InventoryError, material: &str) -> CraftError {
    match err {
        InventoryError::Insufficient {
            required,
            available,
            ..
        } => CraftError::InsufficientMaterials {
            material: material.to_owned(),
            required,
            available,
        },
        _ => CraftError::InsufficientMaterials {
            material: material.to_owned(),
            required: 0,
            available: 0,
        },
    }
}

/// Ordered collection of known recipes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecipeBook {
    recipes: Vec<CraftingRecipe>,
}

impl RecipeBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a book, skipping malformed recipes.
    pub fn from_recipes(recipes: impl IntoIterator<Item = CraftingRecipe>) -> Self {
        let mut book = Self::new();
        for recipe in recipes {
            if let Err(err) = book.register(recipe) {
                tracing::warn!(%err, "skipping recipe");
            }
        }
        book
    }

    /// Appends a recipe. Registration order breaks pattern ties.
    pub fn register(&mut self, recipe: CraftingRecipe) -> Result<(), CraftError> {
        recipe.validate()?;
        self.recipes.push(recipe);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CraftingRecipe> {
        self.recipes.iter().find(|r| r.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CraftingRecipe> {
        self.recipes.iter()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Grid lookup over this book's shaped recipes.
    pub fn find_by_pattern(&self, grid: &CraftingGrid) -> Option<&CraftingRecipe> {
        find_recipe_by_pattern(grid, self.recipes.iter())
    }

    /// Every recipe the inventory can currently afford, in registration order.
    pub fn craftable<'a: 'i, 'i>(
        &'a self,
        inventory: &'i Inventory,
    ) -> impl Iterator<Item = &'a CraftingRecipe> + 'i {
        self.recipes.iter().filter(|r| can_craft(r, inventory))
    }

    /// The single best craftable recipe: the one consuming the most material
    /// units, first registered on ties.
    pub fn best_available<'a>(
        &'a self,
        inventory: &Inventory,
    ) -> Option<&'a CraftingRecipe> {
        self.craftable(inventory)
            .fold(None, |best: Option<&'a CraftingRecipe>, recipe| match best {
                Some(current) if current.material_units() >= recipe.material_units() => {
                    Some(current)
                }
                _ => Some(recipe),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ItemCatalog, ItemDefinition, ItemKind};

    fn catalog() -> ItemCatalog {
        ItemCatalog::new(vec![
            ItemDefinition::new("Wood", ItemKind::Material, 20),
            ItemDefinition::new("Stone", ItemKind::Material, 20),
            ItemDefinition::new("Plank", ItemKind::Material, 20),
            ItemDefinition::new("Axe", ItemKind::Equipment, 1),
        ])
    }

    fn stocked(wood: u32, stone: u32) -> Inventory {
        let items = catalog();
        let mut inv = Inventory::new(4);
        inv.add_item("Wood", wood, &items).unwrap();
        if stone > 0 {
            inv.add_item("Stone", stone, &items).unwrap();
        }
        inv
    }

    fn axe() -> CraftingRecipe {
        CraftingRecipe::shapeless("Axe", [("Wood", 2), ("Stone", 3)], "Axe", 1)
    }

    #[test]
    fn can_craft_counts_across_stacks() {
        let items = catalog();
        let mut inv = Inventory::new(4);
        inv.set_slot(0, Some(crate::state::ItemStack::new("Stone", 1)))
            .unwrap();
        inv.set_slot(3, Some(crate::state::ItemStack::new("Stone", 2)))
            .unwrap();
        inv.add_item("Wood", 2, &items).unwrap();
        assert!(can_craft(&axe(), &inv));
    }

    #[test]
    fn craft_consumes_materials_and_adds_result() {
        let items = catalog();
        let mut inv = stocked(3, 3);
        assert!(craft(&axe(), &mut inv, &items));
        assert_eq!(inv.count_of("Wood"), 1);
        assert_eq!(inv.count_of("Stone"), 0);
        assert_eq!(inv.count_of("Axe"), 1);
    }

    #[test]
    fn failed_craft_leaves_inventory_unchanged() {
        let items = catalog();
        let mut inv = stocked(1, 3);
        let before = inv.clone();
        assert!(!can_craft(&axe(), &inv));
        assert!(!craft(&axe(), &mut inv, &items));
        assert_eq!(inv, before);
    }

    #[test]
    fn craft_fails_when_result_has_no_room() {
        let items = catalog();
        let mut inv = Inventory::new(2);
        inv.add_item("Wood", 20, &items).unwrap();
        inv.add_item("Stone", 20, &items).unwrap();
        let before = inv.clone();

        let plank = CraftingRecipe::shapeless("Plank", [("Wood", 1)], "Plank", 1);
        assert_eq!(
            try_craft(&plank, &mut inv, &items),
            Err(CraftError::InventoryFull {
                item: "Plank".into(),
                quantity: 1
            })
        );
        assert_eq!(inv, before);
    }

    #[test]
    fn consumed_stack_frees_a_slot_for_the_result() {
        let items = catalog();
        let mut inv = Inventory::new(2);
        inv.add_item("Wood", 2, &items).unwrap();
        inv.add_item("Stone", 3, &items).unwrap();
        assert!(craft(&axe(), &mut inv, &items));
        assert_eq!(inv.count_of("Axe"), 1);
    }

    #[test]
    fn unknown_result_is_invalid_recipe() {
        let items = catalog();
        let mut inv = stocked(2, 0);
        let bogus = CraftingRecipe::shapeless("Bogus", [("Wood", 1)], "Phoenix Feather", 1);
        assert!(matches!(
            try_craft(&bogus, &mut inv, &items),
            Err(CraftError::InvalidRecipe { .. })
        ));
        assert_eq!(inv.count_of("Wood"), 2);
    }

    #[test]
    fn best_available_prefers_larger_recipes() {
        let plank = CraftingRecipe::shapeless("Plank", [("Wood", 1)], "Plank", 2);
        let book = RecipeBook::from_recipes([plank, axe()]);

        assert_eq!(
            book.best_available(&stocked(2, 3)).map(|r| r.name.as_str()),
            Some("Axe")
        );
        assert_eq!(
            book.best_available(&stocked(2, 0)).map(|r| r.name.as_str()),
            Some("Plank")
        );
        assert!(book.best_available(&Inventory::new(2)).is_none());
    }

    #[test]
    fn malformed_recipes_are_not_registered() {
        let book = RecipeBook::from_recipes([CraftingRecipe::shapeless(
            "Broken",
            [("Wood", 1)],
            "Plank",
            0,
        )]);
        assert!(book.is_empty());
    }
}
