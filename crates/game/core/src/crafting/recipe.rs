//! Recipe definitions.

use std::collections::BTreeMap;

use crate::config::BattleConfig;
use crate::error::CraftError;

/// Nine optional material names, row-major (index 0 is top-left).
pub type Pattern = [Option<String>; BattleConfig::GRID_SIZE];

/// A crafting recipe.
///
/// Shapeless recipes only list `required_materials`. Shaped recipes also
/// carry a position-sensitive `pattern`; their requirements are derived from
/// it so the two never disagree.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CraftingRecipe {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub required_materials: BTreeMap<String, u32>,
    pub result: String,
    #[cfg_attr(feature = "serde", serde(default = "default_quantity"))]
    pub result_quantity: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub pattern: Option<Pattern>,
}

#[cfg(feature = "serde")]
fn default_quantity() -> u32 {
    1
}

impl CraftingRecipe {
    /// Shape-independent recipe.
    pub fn shapeless<I, S>(
        name: impl Into<String>,
        materials: I,
        result: impl Into<String>,
        result_quantity: u32,
    ) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut required_materials = BTreeMap::new();
        for (material, count) in materials {
            *required_materials.entry(material.into()).or_insert(0) += count;
        }
        Self {
            name: name.into(),
            description: String::new(),
            required_materials,
            result: result.into(),
            result_quantity,
            pattern: None,
        }
    }

    /// Position-sensitive recipe for the 3x3 grid.
    pub fn shaped(
        name: impl Into<String>,
        pattern: Pattern,
        result: impl Into<String>,
        result_quantity: u32,
    ) -> Self {
        let required_materials = materials_of(&pattern);
        Self {
            name: name.into(),
            description: String::new(),
            required_materials,
            result: result.into(),
            result_quantity,
            pattern: Some(pattern),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Material counts this recipe consumes.
    ///
    /// For shaped recipes this is always the pattern's cell counts.
    pub fn materials(&self) -> BTreeMap<String, u32> {
        match &self.pattern {
            Some(pattern) => materials_of(pattern),
            None => self.required_materials.clone(),
        }
    }

    /// Total material units consumed; used to rank "best available" recipes.
    pub fn material_units(&self) -> u32 {
        self.materials().values().sum()
    }

    /// Checks the recipe is usable. Malformed recipes never match and never craft.
    pub fn validate(&self) -> Result<(), CraftError> {
        let invalid = |reason| CraftError::InvalidRecipe {
            recipe: self.name.clone(),
            reason,
        };

        if self.result.trim().is_empty() {
            return Err(invalid("missing result item"));
        }
        if self.result_quantity == 0 {
            return Err(invalid("result quantity must be at least 1"));
        }
        if let Some(pattern) = &self.pattern {
            if pattern.iter().all(Option::is_none) {
                return Err(invalid("pattern is empty"));
            }
            if pattern.iter().flatten().any(|cell| cell.trim().is_empty()) {
                return Err(invalid("pattern contains a blank material name"));
            }
        } else {
            if self.required_materials.is_empty() {
                return Err(invalid("no required materials"));
            }
            if self
                .required_materials
                .iter()
                .any(|(name, count)| name.trim().is_empty() || *count == 0)
            {
                return Err(invalid("blank material or zero count"));
            }
        }
        Ok(())
    }
}

/// Counts each material occupying a pattern.
pub fn materials_of(pattern: &Pattern) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for material in pattern.iter().flatten() {
        *counts.entry(material.clone()).or_insert(0) += 1;
    }
    counts
}

/// Builds a pattern from row-major cell names; `None` or `""` is an empty cell.
pub fn pattern_from<'a>(cells: [Option<&'a str>; BattleConfig::GRID_SIZE]) -> Pattern {
    cells.map(|cell| cell.filter(|name| !name.is_empty()).map(str::to_owned))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shaped_recipe_derives_requirements() {
        let recipe = CraftingRecipe::shaped(
            "Torch",
            pattern_from([
                Some("Coal"),
                None,
                None,
                Some("Stick"),
                None,
                None,
                None,
                None,
                None,
            ]),
            "Torch",
            4,
        );
        assert_eq!(recipe.required_materials.get("Coal"), Some(&1));
        assert_eq!(recipe.required_materials.get("Stick"), Some(&1));
        assert_eq!(recipe.material_units(), 2);
        assert!(recipe.validate().is_ok());
    }

    #[test]
    fn shapeless_merges_duplicate_materials() {
        let recipe = CraftingRecipe::shapeless("Rope", [("Fiber", 2), ("Fiber", 1)], "Rope", 1);
        assert_eq!(recipe.required_materials.get("Fiber"), Some(&3));
    }

    #[test]
    fn malformed_recipes_fail_validation() {
        let no_result = CraftingRecipe::shapeless("Nothing", [("Wood", 1)], "", 1);
        assert!(matches!(
            no_result.validate(),
            Err(CraftError::InvalidRecipe { .. })
        ));

        let zero = CraftingRecipe::shapeless("Zero", [("Wood", 1)], "Plank", 0);
        assert!(zero.validate().is_err());

        let empty = CraftingRecipe::shaped("Empty", Default::default(), "Plank", 1);
        assert!(empty.validate().is_err());
    }
}
