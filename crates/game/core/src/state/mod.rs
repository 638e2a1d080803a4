//! Battle-independent state types.
//!
//! Combatants and inventories outlive a single battle: the host clones them
//! into a battle and receives the updated values back when it finishes.
pub mod combatant;
pub mod inventory;

pub use combatant::{Buff, BuffKind, ColorEffect, ColorEffectKind, Combatant};
pub use inventory::{Inventory, ItemStack};
