//! Session worker that owns the authoritative [`Battle`].
//!
//! Receives commands from [`SessionHandle`](crate::SessionHandle), runs them
//! against the engine, forwards new battle log entries to subscribers, and
//! keeps the animation watchdog armed while the engine waits on a
//! completion signal.

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::Instant;
use tracing::debug;

use battle_core::{
    ActionOutcome, ActionResult, Battle, BattleEnv, BattleEvent, BattleOutcome, BattleSnapshot,
    ItemStack,
};

use super::animator::ChannelAnimator;
use crate::events::SessionEvent;
use crate::oracle::{OracleBundle, TokioClock};

/// Commands that can be sent to the session worker.
pub(crate) enum Command {
    Attack {
        reply: oneshot::Sender<ActionResult>,
    },
    UseItem {
        slot: usize,
        reply: oneshot::Sender<ActionResult>,
    },
    SelectTarget {
        index: usize,
        reply: oneshot::Sender<ActionResult>,
    },
    CancelTargetSelection {
        reply: oneshot::Sender<ActionResult>,
    },
    ForceEndTurn {
        reply: oneshot::Sender<ActionResult>,
    },
    AnimationCompleted {
        reply: oneshot::Sender<Option<ActionOutcome>>,
    },
    ClaimRewards {
        reply: oneshot::Sender<Option<Vec<ItemStack>>>,
    },
    Snapshot {
        reply: oneshot::Sender<BattleSnapshot>,
    },
    Log {
        reply: oneshot::Sender<Vec<BattleEvent>>,
    },
    /// Stop the worker and hand back the battle outcome.
    Shutdown,
}

/// Background task that processes battle commands.
pub(crate) struct SessionWorker {
    battle: Battle,
    oracles: OracleBundle,
    clock: TokioClock,
    animator: ChannelAnimator,
    command_rx: mpsc::Receiver<Command>,
    event_tx: broadcast::Sender<SessionEvent>,
    /// Log mark up to which entries were broadcast.
    published: u64,
    /// Animator start count when the watchdog was last armed.
    animations_seen: u64,
    watchdog_deadline: Option<Instant>,
}

impl SessionWorker {
    pub(crate) fn new(
        battle: Battle,
        oracles: OracleBundle,
        command_rx: mpsc::Receiver<Command>,
        event_tx: broadcast::Sender<SessionEvent>,
    ) -> Self {
        tracing::info!(
            target: "runtime::session",
            seed = battle.seed(),
            enemies = battle.enemies().len(),
            boss = battle.is_boss_battle(),
            watchdog_ms = battle.config().watchdog_ms,
            "session worker initialized"
        );

        Self {
            battle,
            oracles,
            clock: TokioClock,
            animator: ChannelAnimator::new(event_tx.clone()),
            command_rx,
            event_tx,
            published: 0,
            animations_seen: 0,
            watchdog_deadline: None,
        }
    }

    /// Main worker loop. Ends on shutdown or when every handle is dropped.
    pub(crate) async fn run(mut self) -> BattleOutcome {
        loop {
            let deadline = self.watchdog_deadline;
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(Command::Shutdown) | None => break,
                    Some(cmd) => self.handle_command(cmd),
                },
                _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.fire_watchdog();
                }
            }
        }

        self.publish_log();
        debug!(target: "runtime::session", turns = self.battle.turn_counter(), "session worker stopped");
        self.battle.into_outcome()
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Attack { reply } => {
                let result = self.with_env(|battle, env| battle.attack(env));
                respond_action(reply, result, "attack");
            }
            Command::UseItem { slot, reply } => {
                let result = self.with_env(|battle, env| battle.use_item(slot, env));
                respond_action(reply, result, "use_item");
            }
            Command::SelectTarget { index, reply } => {
                let result = self.with_env(|battle, env| battle.select_target(index, env));
                respond_action(reply, result, "select_target");
            }
            Command::CancelTargetSelection { reply } => {
                let result = self.battle.cancel_target_selection();
                respond_action(reply, result, "cancel_target_selection");
            }
            Command::ForceEndTurn { reply } => {
                let result = self.with_env(|battle, env| battle.force_end_turn(env));
                respond_action(reply, result, "force_end_turn");
            }
            Command::AnimationCompleted { reply } => {
                let resolved = self.with_env(|battle, env| battle.on_animation_completed(env));
                self.after_step(resolved);
                respond(reply, resolved, "animation_completed");
                return;
            }
            Command::ClaimRewards { reply } => {
                let result = self.claim_rewards();
                respond(reply, result, "claim_rewards");
            }
            Command::Snapshot { reply } => {
                let snapshot = self.battle.snapshot(self.oracles.items.as_ref());
                respond(reply, snapshot, "snapshot");
            }
            Command::Log { reply } => {
                let entries = self.battle.log().iter().cloned().collect();
                respond(reply, entries, "log");
            }
            Command::Shutdown => {}
        }
        self.after_step(None);
    }

    fn with_env<T>(&mut self, f: impl FnOnce(&mut Battle, &mut BattleEnv<'_>) -> T) -> T {
        let mut env = BattleEnv::new(
            self.oracles.items.as_ref(),
            self.oracles.rng.as_ref(),
            &self.clock,
            &mut self.animator,
        );
        f(&mut self.battle, &mut env)
    }

    fn claim_rewards(&mut self) -> Option<Vec<ItemStack>> {
        let enemy_count = self.battle.enemies().len();
        let hero_defeated = self
            .battle
            .enemies()
            .iter()
            .any(|enemy| enemy.is_hero && enemy.is_defeated);
        self.battle.apply_battle_rewards(
            enemy_count,
            hero_defeated,
            self.oracles.items.as_ref(),
            self.oracles.rng.as_ref(),
        )
    }

    fn fire_watchdog(&mut self) {
        self.watchdog_deadline = None;
        let resolved = self.with_env(|battle, env| battle.on_watchdog_fired(env));
        self.after_step(resolved);
    }

    /// Broadcasts what the last step produced and re-arms the watchdog when
    /// a new animation started. A finished battle needs no watchdog.
    fn after_step(&mut self, resolved: Option<ActionOutcome>) {
        self.publish_log();
        if let Some(outcome) = resolved {
            self.publish(SessionEvent::EnemyPhaseResolved(outcome));
        }

        let waiting = !self.battle.is_battle_over()
            && (self.battle.is_animating() || self.battle.enemy_turn_pending());
        let fresh_animation = self.animator.started() != self.animations_seen;
        self.animations_seen = self.animator.started();

        if !waiting {
            self.watchdog_deadline = None;
        } else if fresh_animation || self.watchdog_deadline.is_none() {
            self.watchdog_deadline = Some(Instant::now() + self.battle.config().watchdog());
        }
    }

    fn publish_log(&mut self) {
        let fresh: Vec<BattleEvent> = self.battle.log().since(self.published).cloned().collect();
        self.published = self.battle.log().recorded();
        for event in fresh {
            self.publish(SessionEvent::Battle(event));
        }
    }

    fn publish(&self, event: SessionEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::trace!(target: "runtime::session", "no event subscribers");
        }
    }
}

fn respond_action(reply: oneshot::Sender<ActionResult>, result: ActionResult, command: &'static str) {
    if let Err(reason) = &result {
        debug!(target: "runtime::session", command, %reason, "request declined");
    }
    respond(reply, result, command);
}

fn respond<T>(reply: oneshot::Sender<T>, value: T, command: &'static str) {
    if reply.send(value).is_err() {
        debug!(target: "runtime::session", command, "reply channel closed (caller dropped)");
    }
}
