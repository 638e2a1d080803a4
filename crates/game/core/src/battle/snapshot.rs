//! Read-only views handed to hosts.

use crate::battle::{Battle, BattleResult};
use crate::env::{ConsumableEffect, ItemOracle};
use crate::state::Combatant;

/// A quick-slot consumable the player can use right now.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UsableItem {
    pub slot: usize,
    pub name: String,
    pub quantity: u32,
    pub effect: ConsumableEffect,
}

/// Everything a UI needs to render one frame of the battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSnapshot {
    pub player: Combatant,
    pub enemies: Vec<Combatant>,
    pub selected_enemy: Option<usize>,
    pub is_player_turn: bool,
    pub is_battle_over: bool,
    pub battle_won: bool,
    pub result: Option<BattleResult>,
    pub is_boss_battle: bool,
    pub turn_counter: u32,
    pub usable_items: Vec<UsableItem>,
    pub is_target_selection_mode: bool,
    pub pending_target_item: Option<String>,
    pub is_animating: bool,
}

impl Battle {
    /// Quick-slot stacks whose item has a battle effect, in slot order.
    pub fn usable_items(&self, items: &dyn ItemOracle) -> Vec<UsableItem> {
        self.inventory
            .quick_slots()
            .filter_map(|slot| {
                let stack = self.inventory.slot(slot)?;
                let effect = items.definition(&stack.name)?.battle_effect()?;
                Some(UsableItem {
                    slot,
                    name: stack.name.clone(),
                    quantity: stack.quantity,
                    effect,
                })
            })
            .collect()
    }

    pub fn snapshot(&self, items: &dyn ItemOracle) -> BattleSnapshot {
        BattleSnapshot {
            player: self.player.clone(),
            enemies: self.enemies.to_vec(),
            selected_enemy: self.selected_enemy,
            is_player_turn: self.is_player_turn(),
            is_battle_over: self.is_battle_over(),
            battle_won: self.battle_won(),
            result: self.result(),
            is_boss_battle: self.is_boss_battle,
            turn_counter: self.turn_counter,
            usable_items: self.usable_items(items),
            is_target_selection_mode: self.is_target_selection_mode(),
            pending_target_item: self.pending_target_item().map(str::to_owned),
            is_animating: self.is_animating(),
        }
    }
}
