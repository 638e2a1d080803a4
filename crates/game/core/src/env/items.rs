//! Item definitions and the catalog oracle.

/// Resolves item names to their static definitions.
pub trait ItemOracle: Send + Sync {
    fn definition(&self, name: &str) -> Option<&ItemDefinition>;

    /// Stack limit for the named item, or `None` for unknown items.
    fn max_stack(&self, name: &str) -> Option<u32> {
        self.definition(name).map(|def| def.max_stack.max(1))
    }
}

/// Item definition with common fields and type-specific data.
///
/// # Stacking
///
/// All items have a `max_stack` value:
/// - Materials/Consumables: stackable (e.g. 99)
/// - Equipment/Unique: max_stack=1
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub kind: ItemKind,
    #[cfg_attr(feature = "serde", serde(default = "default_max_stack"))]
    pub max_stack: u32,
}

#[cfg(feature = "serde")]
fn default_max_stack() -> u32 {
    99
}

impl ItemDefinition {
    pub fn new(name: impl Into<String>, kind: ItemKind, max_stack: u32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind,
            max_stack,
        }
    }

    pub fn material(name: impl Into<String>) -> Self {
        Self::new(name, ItemKind::Material, 99)
    }

    pub fn consumable(name: impl Into<String>, effect: ConsumableEffect) -> Self {
        Self::new(name, ItemKind::Consumable(effect), 99)
    }

    pub fn unique(name: impl Into<String>) -> Self {
        Self::new(name, ItemKind::Unique, 1)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_unique(&self) -> bool {
        matches!(self.kind, ItemKind::Unique)
    }

    /// Consumable effect if this item can be used during a battle.
    pub fn battle_effect(&self) -> Option<ConsumableEffect> {
        match self.kind {
            ItemKind::Consumable(effect) => Some(effect),
            _ => None,
        }
    }
}

/// Item type with type-specific data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    /// Crafting ingredient.
    Material,

    /// Usable in battle from a quick-access slot.
    Consumable(ConsumableEffect),

    /// Gear produced by crafting or loot.
    Equipment,

    /// One-of-a-kind item; never stacks and never drops twice.
    Unique,
}

/// Consumable effects, one per battle item category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ConsumableEffect {
    /// Restore health to the player, capped at max health.
    Heal(i32),

    /// Timed attack bonus on the player.
    AttackBuff { amount: i32, turns: u32 },

    /// Timed defense bonus on the player.
    DefenseBuff { amount: i32, turns: u32 },

    /// Fixed damage to every living enemy.
    Bomb(i32),

    /// Thrown at one enemy; it skips its next actions.
    Stun { turns: u32 },

    /// Thrown at one enemy; it takes damage every round.
    Poison { damage: i32 },

    /// Clears poison from the player.
    Cure,
}

/// Who a consumable effect lands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectTarget {
    Player,
    AllEnemies,
    SingleEnemy,
}

impl ConsumableEffect {
    pub fn target(&self) -> EffectTarget {
        match self {
            Self::Heal(_) | Self::AttackBuff { .. } | Self::DefenseBuff { .. } | Self::Cure => {
                EffectTarget::Player
            }
            Self::Bomb(_) => EffectTarget::AllEnemies,
            Self::Stun { .. } | Self::Poison { .. } => EffectTarget::SingleEnemy,
        }
    }
}

/// In-memory item catalog keyed by name, preserving registration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemCatalog {
    items: Vec<ItemDefinition>,
}

impl ItemCatalog {
    pub fn new(items: Vec<ItemDefinition>) -> Self {
        let mut catalog = Self::default();
        for item in items {
            catalog.insert(item);
        }
        catalog
    }

    /// Registers a definition, replacing any previous one with the same name.
    pub fn insert(&mut self, item: ItemDefinition) {
        match self.items.iter_mut().find(|d| d.name == item.name) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ItemOracle for ItemCatalog {
    fn definition(&self, name: &str) -> Option<&ItemDefinition> {
        self.items.iter().find(|d| d.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_targets() {
        assert_eq!(ConsumableEffect::Heal(30).target(), EffectTarget::Player);
        assert_eq!(ConsumableEffect::Bomb(10).target(), EffectTarget::AllEnemies);
        assert_eq!(
            ConsumableEffect::Stun { turns: 1 }.target(),
            EffectTarget::SingleEnemy
        );
    }

    #[test]
    fn catalog_replaces_by_name() {
        let mut catalog = ItemCatalog::new(vec![ItemDefinition::material("Wood")]);
        catalog.insert(ItemDefinition::new("Wood", ItemKind::Material, 20));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.max_stack("Wood"), Some(20));
        assert_eq!(catalog.max_stack("Stone"), None);
    }

    #[test]
    fn only_consumables_have_battle_effects() {
        let potion = ItemDefinition::consumable("Potion", ConsumableEffect::Heal(30));
        assert_eq!(potion.battle_effect(), Some(ConsumableEffect::Heal(30)));
        assert_eq!(ItemDefinition::material("Wood").battle_effect(), None);
        assert!(ItemDefinition::unique("Crown").is_unique());
    }
}
