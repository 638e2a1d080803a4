//! High-level battle session.
//!
//! A session owns the worker task for one battle, wires up the command and
//! event channels, and exposes a builder-based API for hosts to start a
//! battle from content and carry the outcome forward afterwards.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use battle_content::{Bestiary, ContentBundle};
use battle_core::{
    ActionOutcome, Battle, BattleConfig, BattleEvent, BattleOutcome, BattleSnapshot, Combatant,
    Inventory, ItemOracle, ItemStack, PcgRng, RewardGenerator, RngOracle,
};

use crate::api::{Result, RuntimeError, SessionHandle};
use crate::config::SessionConfig;
use crate::events::SessionEvent;
use crate::oracle::OracleBundle;
use crate::workers::{Command, SessionWorker};

/// One running battle.
///
/// [`SessionHandle`] provides a cloneable façade for UI tasks; the session
/// itself is consumed by [`BattleSession::finish`].
pub struct BattleSession {
    handle: SessionHandle,
    seed: u64,
    worker: JoinHandle<BattleOutcome>,
}

impl BattleSession {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Seed the battle was started with; replaying it reproduces every roll.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.handle.subscribe_events()
    }

    pub async fn attack(&self) -> Result<ActionOutcome> {
        self.handle.attack().await
    }

    pub async fn use_item(&self, slot: usize) -> Result<ActionOutcome> {
        self.handle.use_item(slot).await
    }

    pub async fn select_target(&self, index: usize) -> Result<ActionOutcome> {
        self.handle.select_target(index).await
    }

    pub async fn cancel_target_selection(&self) -> Result<ActionOutcome> {
        self.handle.cancel_target_selection().await
    }

    pub async fn force_end_turn(&self) -> Result<ActionOutcome> {
        self.handle.force_end_turn().await
    }

    pub async fn animation_completed(&self) -> Result<Option<ActionOutcome>> {
        self.handle.animation_completed().await
    }

    pub async fn claim_rewards(&self) -> Result<Option<Vec<ItemStack>>> {
        self.handle.claim_rewards().await
    }

    pub async fn snapshot(&self) -> Result<BattleSnapshot> {
        self.handle.snapshot().await
    }

    pub async fn log(&self) -> Result<Vec<BattleEvent>> {
        self.handle.log().await
    }

    /// Stops the worker and returns the player record, inventory and result.
    pub async fn finish(self) -> Result<BattleOutcome> {
        self.handle.shutdown().await?;
        self.worker.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`BattleSession`].
pub struct SessionBuilder {
    config: SessionConfig,
    battle_config: BattleConfig,
    player: Option<Combatant>,
    enemies: Vec<Combatant>,
    inventory: Inventory,
    items: Option<Arc<dyn ItemOracle>>,
    rng: Arc<dyn RngOracle>,
    loot: Option<RewardGenerator>,
}

impl SessionBuilder {
    fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            battle_config: BattleConfig::default(),
            player: None,
            enemies: Vec::new(),
            inventory: Inventory::default(),
            items: None,
            rng: Arc::new(PcgRng),
            loot: None,
        }
    }

    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn battle_config(mut self, battle_config: BattleConfig) -> Self {
        self.battle_config = battle_config;
        self
    }

    /// Takes balance, items and loot tables from loaded content.
    pub fn content(mut self, content: &ContentBundle) -> Self {
        self.battle_config = content.config.clone();
        self.items = Some(Arc::new(content.items.clone()));
        self.loot = Some(content.loot.clone());
        self
    }

    /// The persistent player record; the battle works on a copy.
    pub fn player(mut self, player: Combatant) -> Self {
        self.player = Some(player);
        self
    }

    pub fn enemies(mut self, enemies: Vec<Combatant>) -> Self {
        self.enemies = enemies;
        self
    }

    /// Spawns a named encounter's enemies from their templates.
    pub fn encounter(mut self, bestiary: &Bestiary, name: &str) -> Result<Self> {
        self.enemies = bestiary
            .spawn_encounter(name)
            .ok_or_else(|| RuntimeError::UnknownEncounter(name.to_string()))?;
        Ok(self)
    }

    pub fn inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = inventory;
        self
    }

    pub fn items(mut self, items: Arc<dyn ItemOracle>) -> Self {
        self.items = Some(items);
        self
    }

    /// Replace the default PCG oracle, e.g. with a scripted one in tests.
    pub fn rng(mut self, rng: Arc<dyn RngOracle>) -> Self {
        self.rng = rng;
        self
    }

    pub fn loot(mut self, loot: RewardGenerator) -> Self {
        self.loot = Some(loot);
        self
    }

    /// Validates the roster and spawns the session worker.
    pub async fn build(self) -> Result<BattleSession> {
        let player = self
            .player
            .ok_or(RuntimeError::MissingComponent("a player"))?;
        let items = self
            .items
            .ok_or(RuntimeError::MissingComponent("an item oracle"))?;

        let mut battle_config = self.battle_config;
        if let Some(watchdog_ms) = self.config.watchdog_ms {
            battle_config = battle_config.with_watchdog_ms(watchdog_ms);
        }

        let seed = self.config.resolve_seed();
        let mut battle = Battle::new(player, self.enemies, self.inventory, battle_config, seed)?;
        if let Some(loot) = self.loot {
            battle = battle.with_rewards(loot);
        }

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let (event_tx, _event_rx) =
            broadcast::channel::<SessionEvent>(self.config.event_buffer_size);

        let handle = SessionHandle::new(command_tx, event_tx.clone());
        let oracles = OracleBundle::new(items, self.rng);
        let worker = SessionWorker::new(battle, oracles, command_rx, event_tx);
        let worker = tokio::spawn(worker.run());

        tracing::info!(seed, "battle session started");
        Ok(BattleSession {
            handle,
            seed,
            worker,
        })
    }
}
