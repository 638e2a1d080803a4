use tokio::sync::broadcast;

use battle_core::AnimationDriver;
use battle_core::env::{AttackAnimation, ItemAnimation};

use crate::events::SessionEvent;

/// Forwards animation requests to event subscribers.
///
/// Counts started animations so the worker can tell when to re-arm the
/// watchdog.
pub(crate) struct ChannelAnimator {
    event_tx: broadcast::Sender<SessionEvent>,
    started: u64,
}

impl ChannelAnimator {
    pub(crate) fn new(event_tx: broadcast::Sender<SessionEvent>) -> Self {
        Self {
            event_tx,
            started: 0,
        }
    }

    pub(crate) fn started(&self) -> u64 {
        self.started
    }

    fn publish(&self, event: SessionEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::trace!("no animation subscribers");
        }
    }
}

impl AnimationDriver for ChannelAnimator {
    fn start_attack_animation(&mut self, animation: AttackAnimation) {
        self.started += 1;
        self.publish(SessionEvent::AttackAnimation(animation));
    }

    fn start_item_use_animation(&mut self, animation: ItemAnimation) {
        self.started += 1;
        self.publish(SessionEvent::ItemAnimation(animation));
    }

    fn stop_all_animations(&mut self) {
        self.publish(SessionEvent::AnimationsStopped);
    }
}
