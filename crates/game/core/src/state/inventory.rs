//! Slot-based inventory with per-item stack limits.
//!
//! Every mutating operation is all-or-nothing: it either applies completely
//! or returns an error and leaves the slots untouched.

use crate::config::BattleConfig;
use crate::env::ItemOracle;
use crate::error::InventoryError;

/// A stack of identical items occupying one slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemStack {
    pub name: String,
    pub quantity: u32,
}

impl ItemStack {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

/// Fixed number of slots; the first [`BattleConfig::QUICK_SLOTS`] are the
/// quick-access bar that battles draw usable items from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    slots: Vec<Option<ItemStack>>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(BattleConfig::MAX_INVENTORY_SLOTS)
    }
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&ItemStack> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Places a stack directly into a slot, replacing its content.
    pub fn set_slot(
        &mut self,
        index: usize,
        stack: Option<ItemStack>,
    ) -> Result<(), InventoryError> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(InventoryError::NoSuchSlot { slot: index })?;
        *slot = stack.filter(|s| s.quantity > 0);
        Ok(())
    }

    /// Indices of the quick-access bar.
    pub fn quick_slots(&self) -> core::ops::Range<usize> {
        0..BattleConfig::QUICK_SLOTS.min(self.slots.len())
    }

    /// Total quantity of `name` across all slots.
    pub fn count_of(&self, name: &str) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|s| s.name == name)
            .map(|s| s.quantity)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn free_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_none()).count()
    }

    /// How many more units of `name` fit, merging into partial stacks first.
    pub fn room_for(&self, name: &str, items: &dyn ItemOracle) -> Result<u64, InventoryError> {
        let max_stack = items
            .max_stack(name)
            .ok_or_else(|| InventoryError::UnknownItem {
                name: name.to_owned(),
            })? as u64;

        let partial: u64 = self
            .slots
            .iter()
            .flatten()
            .filter(|s| s.name == name)
            .map(|s| max_stack.saturating_sub(s.quantity as u64))
            .sum();

        Ok(partial + self.free_slots() as u64 * max_stack)
    }

    pub fn can_add(&self, name: &str, quantity: u32, items: &dyn ItemOracle) -> bool {
        self.room_for(name, items)
            .is_ok_and(|room| room >= quantity as u64)
    }

    /// Adds `quantity` units, topping up existing stacks before opening new slots.
    pub fn add_item(
        &mut self,
        name: &str,
        quantity: u32,
        items: &dyn ItemOracle,
    ) -> Result<(), InventoryError> {
        if quantity == 0 {
            return Ok(());
        }
        if self.room_for(name, items)? < quantity as u64 {
            return Err(InventoryError::Full {
                name: name.to_owned(),
                quantity,
            });
        }
        let max_stack = items.max_stack(name).unwrap_or(1);

        let mut remaining = quantity;
        for stack in self.slots.iter_mut().flatten() {
            if remaining == 0 {
                break;
            }
            if stack.name == name && stack.quantity < max_stack {
                let moved = remaining.min(max_stack - stack.quantity);
                stack.quantity += moved;
                remaining -= moved;
            }
        }
        for slot in self.slots.iter_mut() {
            if remaining == 0 {
                break;
            }
            if slot.is_none() {
                let moved = remaining.min(max_stack);
                *slot = Some(ItemStack::new(name, moved));
                remaining -= moved;
            }
        }

        debug_assert_eq!(remaining, 0);
        Ok(())
    }

    /// Removes `quantity` units from wherever they are held, clearing emptied slots.
    pub fn remove_item(&mut self, name: &str, quantity: u32) -> Result<(), InventoryError> {
        let available = self.count_of(name);
        if available < quantity {
            return Err(InventoryError::Insufficient {
                name: name.to_owned(),
                required: quantity,
                available,
            });
        }

        let mut remaining = quantity;
        for slot in self.slots.iter_mut() {
            if remaining == 0 {
                break;
            }
            let Some(stack) = slot else { continue };
            if stack.name != name {
                continue;
            }
            let taken = remaining.min(stack.quantity);
            stack.quantity -= taken;
            remaining -= taken;
            if stack.quantity == 0 {
                *slot = None;
            }
        }
        Ok(())
    }

    /// Removes a single unit from `slot` and returns the item name.
    pub fn take_one(&mut self, slot: usize) -> Result<String, InventoryError> {
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or(InventoryError::NoSuchSlot { slot })?;
        let Some(stack) = entry else {
            return Err(InventoryError::NoSuchSlot { slot });
        };
        let name = stack.name.clone();
        stack.quantity = stack.quantity.saturating_sub(1);
        if stack.quantity == 0 {
            *entry = None;
        }
        Ok(name)
    }
}
