//! Enemy phase.
//!
//! One enemy acts per enemy turn, chosen round-robin among the living. The
//! phase runs in a fixed order:
//!
//! 1. poison pass over every combatant
//! 2. the acting enemy's buffs tick down (a stunned enemy skips its action)
//! 3. potion roll, otherwise a strike that may use the special ability
//! 4. end-of-turn processing for the enemies, then the player's buffs tick
//!    down as their own turn begins

use crate::battle::{ActionOutcome, Battle, BattleEvent, BattlePhase, BattleResult};
use crate::combat::{
    apply_buff, apply_damage, process_end_of_turn, roll_strike, seeds_for, tick_poison,
    update_temporary_bonuses,
};
use crate::env::{
    AttackAnimation, BattleEnv, CombatantRef, ItemAnimation, RollContext, compute_seed,
};
use crate::error::BattleError;
use crate::state::{BuffKind, ColorEffectKind};

/// Item name reported to the animation driver for enemy potions.
const ENEMY_POTION: &str = "Potion";

impl Battle {
    pub(crate) fn run_enemy_turn(&mut self, env: &mut BattleEnv<'_>) -> ActionOutcome {
        self.enemy_turn_pending = false;

        self.poison_pass();
        self.sweep_defeats();
        if let Some(result) = self.decided_result() {
            return self.end_battle(result, env);
        }

        let Some(index) = self.next_acting_enemy() else {
            return self.end_battle(BattleResult::Won, env);
        };
        if let Err(fault) = self.enemy_action(index, env) {
            self.abort(fault);
            return ActionOutcome::BattleOver(BattleResult::Lost);
        }

        self.sweep_defeats();
        if let Some(result) = self.decided_result() {
            return self.end_battle(result, env);
        }
        self.close_enemy_turn(env)
    }

    fn poison_pass(&mut self) {
        let round = self.turn_counter;
        if let Some(damage) = tick_poison(&mut self.player, round) {
            self.log.push(BattleEvent::PoisonTick {
                target: self.player.name.clone(),
                damage,
            });
        }
        for enemy in self.enemies.iter_mut() {
            if let Some(damage) = tick_poison(enemy, round) {
                self.log.push(BattleEvent::PoisonTick {
                    target: enemy.name.clone(),
                    damage,
                });
            }
        }
    }

    /// Next living enemy at or after the round-robin cursor.
    fn next_acting_enemy(&mut self) -> Option<usize> {
        let count = self.enemies.len();
        let index = (0..count)
            .map(|offset| (self.next_enemy + offset) % count)
            .find(|&index| self.enemies[index].is_alive())?;
        self.next_enemy = (index + 1) % count;
        Some(index)
    }

    fn enemy_action(&mut self, index: usize, env: &mut BattleEnv<'_>) -> Result<(), BattleError> {
        let enemy = self
            .enemies
            .get_mut(index)
            .ok_or(BattleError::EnemyOutOfRange { index })?;

        let stunned = enemy.is_stunned();
        for kind in update_temporary_bonuses(enemy) {
            self.log.push(BattleEvent::BuffExpired {
                target: enemy.name.clone(),
                kind,
            });
        }
        if stunned {
            tracing::info!(combatant = %enemy.name, "stunned, skipping action");
            self.log.push(BattleEvent::Stunned {
                target: enemy.name.clone(),
            });
            return Ok(());
        }

        self.nonce += 1;
        let actor = CombatantRef::Enemy(index).actor_index();
        let potion_seed = compute_seed(self.seed, self.nonce, actor, RollContext::EnemyPotion);
        if env
            .rng()
            .chance_pct(potion_seed, self.config.enemy_potion.chance_pct)
        {
            self.enemy_drink_potion(index, env);
            return Ok(());
        }

        let strike = roll_strike(
            &self.enemies[index],
            &self.player,
            &self.config.damage,
            env.rng(),
            seeds_for(self.seed, self.nonce, actor),
            true,
        );
        apply_damage(&mut self.player, strike.damage);
        self.player
            .set_color_effect(ColorEffectKind::Damaged, self.config.color_effect_turns);
        self.log.push(BattleEvent::Attack {
            attacker: self.enemies[index].name.clone(),
            target: self.player.name.clone(),
            damage: strike.damage,
            critical: strike.is_critical,
            special: strike.is_special,
        });
        tracing::debug!(
            enemy = index,
            damage = strike.damage,
            critical = strike.is_critical,
            special = strike.is_special,
            "enemy attack"
        );

        env.animator().start_attack_animation(AttackAnimation {
            attacker: CombatantRef::Enemy(index),
            target: CombatantRef::Player,
            damage: strike.damage,
            is_critical: strike.is_critical,
        });
        self.start_animation(env);
        Ok(())
    }

    /// Heals when hurt, otherwise drinks a random attack or defense buff.
    fn enemy_drink_potion(&mut self, index: usize, env: &mut BattleEnv<'_>) {
        let params = self.config.enemy_potion;
        let color_turns = self.config.color_effect_turns;
        let choice_seed = compute_seed(
            self.seed,
            self.nonce,
            CombatantRef::Enemy(index).actor_index(),
            RollContext::PotionChoice,
        );
        let enemy = &mut self.enemies[index];

        if enemy.health_pct() < params.heal_threshold_pct {
            let restored = enemy.heal(params.heal_amount);
            enemy.set_color_effect(ColorEffectKind::Healed, color_turns);
            self.log.push(BattleEvent::Healed {
                target: enemy.name.clone(),
                amount: restored,
            });
        } else {
            let (kind, color) = if env.rng().range(choice_seed, 0, 1) == 0 {
                (BuffKind::Attack, ColorEffectKind::Empowered)
            } else {
                (BuffKind::Defense, ColorEffectKind::Fortified)
            };
            apply_buff(enemy, kind, params.buff_amount, params.buff_turns);
            enemy.set_color_effect(color, color_turns);
            self.log.push(BattleEvent::BuffApplied {
                target: enemy.name.clone(),
                kind,
                magnitude: params.buff_amount,
                turns: params.buff_turns,
            });
        }

        self.log.push(BattleEvent::EnemyPotion {
            enemy: enemy.name.clone(),
        });
        tracing::info!(combatant = %enemy.name, "enemy drank a potion");
        env.animator().start_item_use_animation(ItemAnimation {
            item: ENEMY_POTION.to_owned(),
            target: Some(CombatantRef::Enemy(index)),
        });
        self.start_animation(env);
    }

    /// End-of-turn processing for the enemies, then control returns to the player.
    fn close_enemy_turn(&mut self, env: &mut BattleEnv<'_>) -> ActionOutcome {
        let round = self.turn_counter;
        for enemy in self.enemies.iter_mut().filter(|e| e.is_alive()) {
            let report = process_end_of_turn(enemy, round);
            if let Some(damage) = report.poison_damage {
                self.log.push(BattleEvent::PoisonTick {
                    target: enemy.name.clone(),
                    damage,
                });
            }
        }
        self.sweep_defeats();
        if let Some(result) = self.decided_result() {
            return self.end_battle(result, env);
        }

        self.turn_counter += 1;
        self.phase = BattlePhase::PlayerTurn;
        for kind in update_temporary_bonuses(&mut self.player) {
            self.log.push(BattleEvent::BuffExpired {
                target: self.player.name.clone(),
                kind,
            });
        }
        self.log.push(BattleEvent::TurnStarted {
            turn: self.turn_counter,
        });
        tracing::debug!(turn = self.turn_counter, "player turn");
        ActionOutcome::EnemyTurnResolved
    }
}
