//! Cloneable façade for issuing commands to a battle session.
//!
//! [`SessionHandle`] hides channel plumbing and offers async helpers for
//! every player-facing battle operation.
use tokio::sync::{broadcast, mpsc, oneshot};

use battle_core::{ActionOutcome, ActionResult, BattleEvent, BattleSnapshot, ItemStack};

use super::errors::{Result, RuntimeError};
use crate::events::SessionEvent;
use crate::workers::Command;

/// Client-facing handle to a running battle session.
#[derive(Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<Command>,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl SessionHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_tx: broadcast::Sender<SessionEvent>,
    ) -> Self {
        Self {
            command_tx,
            event_tx,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    async fn act(
        &self,
        build: impl FnOnce(oneshot::Sender<ActionResult>) -> Command,
    ) -> Result<ActionOutcome> {
        Ok(self.request(build).await??)
    }

    /// Basic attack on the selected enemy.
    pub async fn attack(&self) -> Result<ActionOutcome> {
        self.act(|reply| Command::Attack { reply }).await
    }

    /// Uses the consumable in an inventory slot.
    ///
    /// Returns [`ActionOutcome::AwaitingTarget`] when the item needs an enemy
    /// chosen with [`Self::select_target`].
    pub async fn use_item(&self, slot: usize) -> Result<ActionOutcome> {
        self.act(|reply| Command::UseItem { slot, reply }).await
    }

    /// Selects an enemy, resolving the pending item if one is waiting.
    pub async fn select_target(&self, index: usize) -> Result<ActionOutcome> {
        self.act(|reply| Command::SelectTarget { index, reply }).await
    }

    pub async fn cancel_target_selection(&self) -> Result<ActionOutcome> {
        self.act(|reply| Command::CancelTargetSelection { reply }).await
    }

    /// Recovery path: stops animations and hands the turn back to the player.
    pub async fn force_end_turn(&self) -> Result<ActionOutcome> {
        self.act(|reply| Command::ForceEndTurn { reply }).await
    }

    /// Reports that the host finished playing the current animation.
    ///
    /// Returns the enemy phase outcome when one was waiting on it.
    pub async fn animation_completed(&self) -> Result<Option<ActionOutcome>> {
        self.request(|reply| Command::AnimationCompleted { reply })
            .await
    }

    /// Applies the victory rewards to the session inventory, at most once.
    pub async fn claim_rewards(&self) -> Result<Option<Vec<ItemStack>>> {
        self.request(|reply| Command::ClaimRewards { reply }).await
    }

    /// Read-only view for rendering.
    pub async fn snapshot(&self) -> Result<BattleSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Retained battle log entries, oldest first.
    pub async fn log(&self) -> Result<Vec<BattleEvent>> {
        self.request(|reply| Command::Log { reply }).await
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    pub(crate) async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }
}
