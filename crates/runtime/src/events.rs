//! Events broadcast by a battle session.
//!
//! Battle log entries are forwarded as they are recorded; animation requests
//! come straight from the engine's animation driver so a UI can start playing
//! them before the command reply arrives.

use serde::Serialize;

use battle_core::env::{AttackAnimation, ItemAnimation};
use battle_core::{ActionOutcome, BattleEvent};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum SessionEvent {
    /// An entry appended to the battle log.
    Battle(BattleEvent),

    /// Play an attack animation, then report completion.
    AttackAnimation(AttackAnimation),

    /// Play an item-use animation, then report completion.
    ItemAnimation(ItemAnimation),

    /// Every playing animation should stop immediately.
    AnimationsStopped,

    /// The enemy phase resolved after an animation signal or the watchdog.
    EnemyPhaseResolved(ActionOutcome),
}
