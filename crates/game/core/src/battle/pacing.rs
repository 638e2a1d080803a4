//! Animation pacing: completion signals, watchdog, and recovery.
//!
//! The enemy phase never runs while an animation plays. It is released by
//! the host's completion signal or, when that never arrives, by the
//! watchdog. `force_end_turn` is the manual escape hatch.

use crate::battle::{ActionOutcome, ActionResult, Battle, BattleEvent, BattlePhase};
use crate::env::BattleEnv;
use crate::error::RejectReason;

impl Battle {
    pub(crate) fn start_animation(&mut self, env: &BattleEnv<'_>) {
        self.animating_since = Some(env.clock().now());
    }

    /// Host signal that the current animation finished.
    ///
    /// Runs the pending enemy phase, if any. Returns `None` when nothing
    /// was animating or nothing was waiting on the animation.
    pub fn on_animation_completed(&mut self, env: &mut BattleEnv<'_>) -> Option<ActionOutcome> {
        self.animating_since.take()?;
        self.resume(env)
    }

    /// Fires the watchdog once the animation has outlived `watchdog_ms`.
    pub fn poll_watchdog(&mut self, env: &mut BattleEnv<'_>) -> Option<ActionOutcome> {
        let started = self.animating_since?;
        let elapsed = env.clock().now().saturating_duration_since(started);
        if elapsed < self.config.watchdog() {
            return None;
        }
        self.on_watchdog_fired(env)
    }

    /// Treats the current animation as finished without the host's signal.
    pub fn on_watchdog_fired(&mut self, env: &mut BattleEnv<'_>) -> Option<ActionOutcome> {
        if self.animating_since.is_none() && !self.enemy_turn_pending {
            return None;
        }
        tracing::warn!(turn = self.turn_counter, "animation watchdog fired");
        self.log.push(BattleEvent::WatchdogFired);
        env.animator().stop_all_animations();
        self.animating_since = None;
        self.resume(env)
    }

    /// Returns control to the player unconditionally.
    ///
    /// Stops animations and clears every waiting flag. Nothing else changes:
    /// no damage, no status ticks, no turn counter increment.
    pub fn force_end_turn(&mut self, env: &mut BattleEnv<'_>) -> ActionResult {
        if self.is_battle_over() {
            return Err(RejectReason::BattleOver);
        }
        env.animator().stop_all_animations();
        self.animating_since = None;
        self.enemy_turn_pending = false;
        self.pending_target_item = None;
        self.phase = BattlePhase::PlayerTurn;
        self.log.push(BattleEvent::TurnForced);
        tracing::warn!(turn = self.turn_counter, "turn forcibly returned to the player");
        Ok(ActionOutcome::Continue)
    }

    fn resume(&mut self, env: &mut BattleEnv<'_>) -> Option<ActionOutcome> {
        if self.enemy_turn_pending && self.phase == BattlePhase::EnemyTurn {
            Some(self.run_enemy_turn(env))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::BattleConfig;
    use crate::env::ItemCatalog;
    use crate::env::testing::{AnimationCall, FixedRng, ManualClock, RecordingAnimator};
    use crate::state::{Combatant, Inventory};

    fn battle() -> Battle {
        Battle::new(
            Combatant::player("Hero", 100, 20, 5),
            vec![Combatant::new("Goblin", 500, 10, 5)],
            Inventory::default(),
            BattleConfig::new().with_watchdog_ms(1_000),
            5,
        )
        .unwrap()
    }

    #[test]
    fn watchdog_releases_the_enemy_turn() {
        let items = ItemCatalog::default();
        let clock = ManualClock::new();
        let mut animator = RecordingAnimator::default();
        let mut env = BattleEnv::new(&items, &FixedRng::NEVER, &clock, &mut animator);

        let mut battle = battle();
        battle.attack(&mut env).unwrap();
        assert_eq!(battle.poll_watchdog(&mut env), None);

        clock.advance(Duration::from_millis(1_000));
        assert_eq!(
            battle.poll_watchdog(&mut env),
            Some(ActionOutcome::EnemyTurnResolved)
        );
        assert!(battle.is_player_turn());
        assert_eq!(battle.player().current_health(), 95);
        drop(env);
        assert!(animator.calls.contains(&AnimationCall::StopAll));
    }

    #[test]
    fn late_completion_after_watchdog_is_harmless() {
        let items = ItemCatalog::default();
        let clock = ManualClock::new();
        let mut animator = RecordingAnimator::default();
        let mut env = BattleEnv::new(&items, &FixedRng::NEVER, &clock, &mut animator);

        let mut battle = battle();
        battle.attack(&mut env).unwrap();
        battle.on_watchdog_fired(&mut env);
        battle.on_animation_completed(&mut env);
        assert_eq!(battle.on_animation_completed(&mut env), None);
        assert_eq!(battle.turn_counter(), 1);
        assert_eq!(battle.player().current_health(), 95);
    }

    #[test]
    fn force_end_turn_only_flips_ownership() {
        let items = ItemCatalog::default();
        let clock = ManualClock::new();
        let mut animator = RecordingAnimator::default();
        let mut env = BattleEnv::new(&items, &FixedRng::NEVER, &clock, &mut animator);

        let mut battle = battle();
        battle.attack(&mut env).unwrap();
        assert!(battle.enemy_turn_pending());

        assert_eq!(battle.force_end_turn(&mut env), Ok(ActionOutcome::Continue));
        assert!(battle.is_player_turn());
        assert!(!battle.is_animating());
        assert!(!battle.enemy_turn_pending());
        assert_eq!(battle.turn_counter(), 0);
        assert_eq!(battle.player().current_health(), 100);
        assert_eq!(battle.on_animation_completed(&mut env), None);
    }
}
