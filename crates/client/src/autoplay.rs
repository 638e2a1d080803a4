//! Scripted player for the terminal demo.
//!
//! Plays the player's side through the same handle a real UI would use:
//! pick a move, wait for the animation, report completion.

use std::time::Duration;

use anyhow::{Result, bail};
use battle_core::{ActionOutcome, BattleSnapshot, BuffKind, ConsumableEffect};
use battle_runtime::{BattleSession, RuntimeError};

use crate::presentation;

const MAX_STEPS: usize = 10_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Move {
    Attack,
    UseItem(usize),
}

/// Picks the player's next move from what is on screen.
pub fn choose(snapshot: &BattleSnapshot) -> Move {
    let player = &snapshot.player;
    let living = snapshot.enemies.iter().filter(|e| e.is_alive()).count();
    let hero_standing = snapshot
        .enemies
        .iter()
        .any(|e| e.is_hero && e.is_alive() && !e.is_stunned());

    let pick = snapshot.usable_items.iter().find(|item| match item.effect {
        ConsumableEffect::Heal(_) => player.health_pct() < 40,
        ConsumableEffect::Cure => player.is_poisoned(),
        ConsumableEffect::Bomb(_) => living >= 2,
        ConsumableEffect::Stun { .. } => hero_standing,
        ConsumableEffect::AttackBuff { .. } => {
            snapshot.is_boss_battle && player.buff(BuffKind::Attack).is_none()
        }
        ConsumableEffect::DefenseBuff { .. } => {
            player.health_pct() < 60 && player.buff(BuffKind::Defense).is_none()
        }
        ConsumableEffect::Poison { .. } => snapshot
            .enemies
            .iter()
            .any(|e| e.is_alive() && !e.is_poisoned() && e.health_pct() > 50),
    });

    pick.map_or(Move::Attack, |item| Move::UseItem(item.slot))
}

/// Preferred target for a single-enemy item: a standing hero, else the
/// healthiest living enemy.
pub fn choose_target(snapshot: &BattleSnapshot) -> Option<usize> {
    let living = || {
        snapshot
            .enemies
            .iter()
            .enumerate()
            .filter(|(_, enemy)| enemy.is_alive())
    };
    living()
        .find(|(_, enemy)| enemy.is_hero)
        .or_else(|| living().max_by_key(|(_, enemy)| enemy.current_health()))
        .map(|(index, _)| index)
}

pub struct AutoPlayer {
    animation: Duration,
}

impl AutoPlayer {
    pub fn new(animation: Duration) -> Self {
        Self { animation }
    }

    /// Drives the session until the battle is over.
    pub async fn play(&self, session: &BattleSession) -> Result<()> {
        let mut shown_turn = None;

        for _ in 0..MAX_STEPS {
            let snapshot = session.snapshot().await?;
            if snapshot.is_battle_over {
                return Ok(());
            }

            if !snapshot.is_player_turn || snapshot.is_animating {
                tokio::time::sleep(self.animation).await;
                session.animation_completed().await?;
                continue;
            }

            if shown_turn != Some(snapshot.turn_counter) {
                println!("{}", presentation::status(&snapshot));
                shown_turn = Some(snapshot.turn_counter);
            }
            self.take_turn(session, &snapshot).await?;
        }

        bail!("battle did not finish within {MAX_STEPS} steps")
    }

    async fn take_turn(&self, session: &BattleSession, snapshot: &BattleSnapshot) -> Result<()> {
        let Move::UseItem(slot) = choose(snapshot) else {
            session.attack().await?;
            return Ok(());
        };

        match session.use_item(slot).await {
            Ok(ActionOutcome::AwaitingTarget) => {
                let snapshot = session.snapshot().await?;
                match choose_target(&snapshot) {
                    Some(index) => {
                        session.select_target(index).await?;
                    }
                    None => {
                        session.cancel_target_selection().await?;
                    }
                }
            }
            Ok(_) => {}
            Err(RuntimeError::Rejected(reason)) => {
                tracing::debug!(slot, %reason, "item declined, attacking instead");
                session.attack().await?;
            }
            Err(err) => return Err(err.into()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use battle_core::{BattleSnapshot, Combatant, UsableItem};

    use super::*;

    fn snapshot(player: Combatant, enemies: Vec<Combatant>, items: Vec<UsableItem>) -> BattleSnapshot {
        BattleSnapshot {
            player,
            is_boss_battle: enemies.iter().any(|e| e.is_hero),
            enemies,
            selected_enemy: Some(0),
            is_player_turn: true,
            is_battle_over: false,
            battle_won: false,
            result: None,
            turn_counter: 0,
            usable_items: items,
            is_target_selection_mode: false,
            pending_target_item: None,
            is_animating: false,
        }
    }

    fn item(slot: usize, effect: ConsumableEffect) -> UsableItem {
        UsableItem {
            slot,
            name: format!("item{slot}"),
            quantity: 1,
            effect,
        }
    }

    #[test]
    fn healthy_player_with_one_enemy_attacks() {
        let view = snapshot(
            Combatant::player("Hero", 100, 10, 5),
            vec![Combatant::new("Goblin", 50, 10, 5)],
            vec![item(0, ConsumableEffect::Heal(30)), item(1, ConsumableEffect::Bomb(15))],
        );
        assert_eq!(choose(&view), Move::Attack);
    }

    #[test]
    fn wounded_player_heals_and_crowds_get_bombed() {
        let items = vec![item(0, ConsumableEffect::Heal(30)), item(1, ConsumableEffect::Bomb(15))];
        let crowd = vec![
            Combatant::new("Goblin", 50, 10, 5),
            Combatant::new("Goblin", 50, 10, 5),
        ];

        let wounded = snapshot(
            Combatant::player("Hero", 100, 10, 5).with_health(30),
            crowd.clone(),
            items.clone(),
        );
        assert_eq!(choose(&wounded), Move::UseItem(0));

        let healthy = snapshot(Combatant::player("Hero", 100, 10, 5), crowd, items);
        assert_eq!(choose(&healthy), Move::UseItem(1));
    }

    #[test]
    fn single_target_items_aim_at_the_hero() {
        let view = snapshot(
            Combatant::player("Hero", 100, 10, 5),
            vec![
                Combatant::new("Goblin", 80, 10, 5),
                Combatant::new("Warlord", 150, 18, 9).as_hero(),
            ],
            vec![item(2, ConsumableEffect::Stun { turns: 1 })],
        );
        assert_eq!(choose(&view), Move::UseItem(2));
        assert_eq!(choose_target(&view), Some(1));
    }
}
