//! Skirmish client binary.
//!
//! Composition root: loads content, sets up logging, plays one scripted
//! battle against a content-defined encounter, then spends the spoils in
//! the crafting workshop.
//!
//! # Examples
//!
//! ```bash
//! # Replay a specific battle
//! SKIRMISH_SEED=42 cargo run -p battle-client
//!
//! # Different encounter, verbose engine logs
//! SKIRMISH_ENCOUNTER=crypt RUST_LOG=battle_core=debug cargo run -p battle-client
//! ```

use anyhow::{Context, Result};
use battle_client::{ClientConfig, run_battle, starting_loadout, workshop};
use battle_content::ContentFactory;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env();
    tracing::info!(content_dir = %config.content_dir.display(), "Starting skirmish");

    let content = ContentFactory::new(&config.content_dir)
        .load_all()
        .with_context(|| format!("loading content from {}", config.content_dir.display()))?;

    let (player, inventory) = starting_loadout(&content.items)?;
    let outcome = run_battle(&config, &content, player, inventory).await?;

    match outcome.result {
        Some(result) => println!(
            "\n{} after {} turns with {}/{} health",
            result,
            outcome.turns,
            outcome.player.current_health(),
            outcome.player.max_health()
        ),
        None => println!("\nThe battle ended without a result"),
    }
    if let Some(fault) = &outcome.fault {
        tracing::error!(%fault, "battle aborted");
    }

    println!("\n== Workshop ==");
    let mut inventory = outcome.inventory;
    workshop::run(&content, &mut inventory)?;

    tracing::info!("Skirmish finished");
    Ok(())
}
