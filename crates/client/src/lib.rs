//! Terminal host for skirmish battles.
//!
//! Composition root pieces shared by the `skirmish` binary and its tests:
//! content loading, the starting loadout, a scripted battle and the
//! crafting workshop.

pub mod autoplay;
pub mod config;
pub mod presentation;
pub mod workshop;

use anyhow::{Context, Result};
use battle_content::ContentBundle;
use battle_core::{BattleOutcome, Combatant, Inventory, ItemOracle};
use battle_runtime::{BattleSession, SessionEvent};
use tokio::sync::broadcast::error::RecvError;

pub use autoplay::AutoPlayer;
pub use config::ClientConfig;

/// The hero and pack a fresh run starts with. Quick slots come first.
pub fn starting_loadout(items: &dyn ItemOracle) -> Result<(Combatant, Inventory)> {
    let hero = Combatant::player("Hero", 120, 18, 6);
    let mut inventory = Inventory::default();

    let kit = [
        ("Healing Potion", 3),
        ("Fire Bomb", 2),
        ("Flash Powder", 1),
        ("Venom Vial", 1),
        ("Rage Draught", 1),
        ("Antidote", 1),
        ("Wood", 4),
        ("Coal", 2),
        ("Herb", 3),
        ("Water Flask", 2),
        ("Sulfur", 2),
    ];
    for (name, quantity) in kit {
        inventory
            .add_item(name, quantity, items)
            .with_context(|| format!("starting loadout: {name}"))?;
    }

    Ok((hero, inventory))
}

/// Plays one encounter to the end, printing the combat feed, and returns
/// the outcome with rewards already in the inventory.
pub async fn run_battle(
    config: &ClientConfig,
    content: &ContentBundle,
    player: Combatant,
    inventory: Inventory,
) -> Result<BattleOutcome> {
    let session = BattleSession::builder()
        .config(config.session.clone())
        .content(content)
        .encounter(&content.bestiary, &config.encounter)?
        .player(player)
        .inventory(inventory)
        .build()
        .await?;
    tracing::info!(seed = session.seed(), encounter = %config.encounter, "battle starting");

    let mut events = session.subscribe_events();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SessionEvent::Battle(event)) => println!("{}", presentation::describe(&event)),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "combat feed fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    AutoPlayer::new(config.animation).play(&session).await?;

    if let Some(stacks) = session.claim_rewards().await? {
        for stack in &stacks {
            println!("loot: {}x {}", stack.quantity, stack.name);
        }
    }

    let outcome = session.finish().await?;
    printer.await.context("combat feed task failed")?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use battle_content::ContentFactory;
    use battle_runtime::SessionConfig;

    use super::*;

    fn content() -> ContentBundle {
        let data = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data");
        ContentFactory::new(data).load_all().unwrap()
    }

    #[test]
    fn loadout_fits_quick_slots_first() {
        let content = content();
        let (_, inventory) = starting_loadout(&content.items).unwrap();
        assert_eq!(inventory.slot(0).map(|s| s.name.as_str()), Some("Healing Potion"));
        assert_eq!(inventory.count_of("Wood"), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn demo_battle_and_workshop_run_to_completion() {
        let content = content();
        let config = ClientConfig {
            encounter: "goblin_scouts".to_string(),
            animation: Duration::from_millis(10),
            session: SessionConfig::default().with_seed(99),
            ..ClientConfig::default()
        };
        let (player, inventory) = starting_loadout(&content.items).unwrap();

        let outcome = run_battle(&config, &content, player, inventory).await.unwrap();
        assert!(outcome.result.is_some());
        assert!(outcome.player.buffs().next().is_none());

        let mut inventory = outcome.inventory;
        let crafted = workshop::run(&content, &mut inventory).unwrap();
        assert!(crafted.iter().any(|c| c.item == "Torch"));
        assert!(inventory.count_of("Torch") >= 1);
    }
}
