//! Player-side operations: attack, item use and target selection.

use arrayvec::ArrayVec;

use crate::battle::{ActionOutcome, ActionResult, Battle, BattleEvent, BattlePhase, BattleResult};
use crate::combat::{
    apply_buff, apply_damage, apply_poison, cure_poison, process_end_of_turn, roll_strike,
    seeds_for,
};
use crate::config::BattleConfig;
use crate::env::{
    AttackAnimation, BattleEnv, CombatantRef, ConsumableEffect, EffectTarget, ItemAnimation,
    ItemOracle,
};
use crate::error::RejectReason;
use crate::state::{BuffKind, ColorEffectKind};

impl Battle {
    /// Strikes the selected enemy, then ends the player's turn.
    ///
    /// Defeating the last living enemy wins the battle immediately; the
    /// enemy phase is skipped.
    pub fn attack(&mut self, env: &mut BattleEnv<'_>) -> ActionResult {
        self.ensure_player_can_act()?;
        let target = self.selected_enemy.ok_or(RejectReason::NoTarget)?;
        if !self.enemies.get(target).is_some_and(|e| e.is_alive()) {
            return Err(RejectReason::InvalidTarget { index: target });
        }

        self.nonce += 1;
        let seeds = seeds_for(self.seed, self.nonce, CombatantRef::Player.actor_index());
        let strike = roll_strike(
            &self.player,
            &self.enemies[target],
            &self.config.damage,
            env.rng(),
            seeds,
            false,
        );

        let enemy = &mut self.enemies[target];
        apply_damage(enemy, strike.damage);
        enemy.set_color_effect(ColorEffectKind::Damaged, self.config.color_effect_turns);
        self.log.push(BattleEvent::Attack {
            attacker: self.player.name.clone(),
            target: enemy.name.clone(),
            damage: strike.damage,
            critical: strike.is_critical,
            special: false,
        });
        tracing::debug!(
            target_index = target,
            damage = strike.damage,
            critical = strike.is_critical,
            "player attack"
        );

        env.animator().start_attack_animation(AttackAnimation {
            attacker: CombatantRef::Player,
            target: CombatantRef::Enemy(target),
            damage: strike.damage,
            is_critical: strike.is_critical,
        });
        self.start_animation(env);

        self.sweep_defeats();
        if self.all_enemies_defeated() {
            return Ok(self.end_battle(BattleResult::Won, env));
        }
        Ok(self.end_player_turn(env))
    }

    /// Uses the consumable in quick slot `slot`. Does not end the turn.
    ///
    /// Single-target items enter target-selection mode when more than one
    /// enemy is alive; nothing is consumed until a target is chosen.
    pub fn use_item(&mut self, slot: usize, env: &mut BattleEnv<'_>) -> ActionResult {
        self.ensure_player_can_act()?;
        self.ensure_item_ready(env)?;
        let effect = self.usable_effect(slot, env.items())?;

        match effect.target() {
            EffectTarget::Player => {
                self.check_player_effect(effect)?;
                self.resolve_item(slot, effect, None, env)
            }
            EffectTarget::AllEnemies => {
                if self.all_enemies_defeated() {
                    return Err(RejectReason::NoLivingEnemies);
                }
                self.resolve_item(slot, effect, None, env)
            }
            EffectTarget::SingleEnemy => {
                let living: ArrayVec<usize, { BattleConfig::MAX_ENEMIES }> =
                    self.living_enemies().map(|(index, _)| index).collect();
                match (living.first().copied(), living.get(1)) {
                    (None, _) => Err(RejectReason::NoLivingEnemies),
                    (Some(only), None) => self.resolve_item(slot, effect, Some(only), env),
                    (Some(_), Some(_)) => {
                        self.pending_target_item = Some(slot);
                        tracing::debug!(slot, "awaiting item target");
                        Ok(ActionOutcome::AwaitingTarget)
                    }
                }
            }
        }
    }

    /// Completes a pending item on enemy `index`, or changes the attack
    /// selection when no item is pending.
    pub fn select_target(&mut self, index: usize, env: &mut BattleEnv<'_>) -> ActionResult {
        if self.is_battle_over() {
            return Err(RejectReason::BattleOver);
        }
        if !self.enemies.get(index).is_some_and(|e| e.is_alive()) {
            return Err(RejectReason::InvalidTarget { index });
        }

        match self.pending_target_item {
            Some(slot) => {
                let effect = self.usable_effect(slot, env.items())?;
                self.pending_target_item = None;
                self.resolve_item(slot, effect, Some(index), env)
            }
            None => {
                self.selected_enemy = Some(index);
                Ok(ActionOutcome::Continue)
            }
        }
    }

    /// Leaves target-selection mode without consuming anything.
    pub fn cancel_target_selection(&mut self) -> ActionResult {
        let slot = self
            .pending_target_item
            .take()
            .ok_or(RejectReason::NotSelectingTarget)?;
        tracing::debug!(slot, "item targeting cancelled");
        Ok(ActionOutcome::Continue)
    }

    fn ensure_player_can_act(&self) -> Result<(), RejectReason> {
        match self.phase {
            BattlePhase::Over(_) => return Err(RejectReason::BattleOver),
            BattlePhase::EnemyTurn => return Err(RejectReason::NotPlayerTurn),
            BattlePhase::PlayerTurn => {}
        }
        if self.pending_target_item.is_some() {
            return Err(RejectReason::TargetSelectionPending);
        }
        if self.animating_since.is_some() {
            return Err(RejectReason::Animating);
        }
        Ok(())
    }

    fn ensure_item_ready(&self, env: &BattleEnv<'_>) -> Result<(), RejectReason> {
        let Some(last) = self.last_item_use else {
            return Ok(());
        };
        let elapsed = env.clock().now().saturating_duration_since(last);
        if elapsed < self.config.item_cooldown() {
            return Err(RejectReason::ItemCooldown);
        }
        Ok(())
    }

    fn usable_effect(
        &self,
        slot: usize,
        items: &dyn ItemOracle,
    ) -> Result<ConsumableEffect, RejectReason> {
        let stack = self
            .inventory
            .slot(slot)
            .ok_or(RejectReason::EmptySlot { slot })?;
        let not_usable = || RejectReason::NotUsable {
            name: stack.name.clone(),
        };
        if !self.inventory.quick_slots().contains(&slot) {
            return Err(not_usable());
        }
        let definition = items
            .definition(&stack.name)
            .ok_or_else(|| RejectReason::UnknownItem {
                name: stack.name.clone(),
            })?;
        definition.battle_effect().ok_or_else(not_usable)
    }

    /// Player-targeted items that would do nothing are declined.
    fn check_player_effect(&self, effect: ConsumableEffect) -> Result<(), RejectReason> {
        match effect {
            ConsumableEffect::Heal(_)
                if self.player.current_health() >= self.player.max_health() =>
            {
                Err(RejectReason::FullHealth)
            }
            ConsumableEffect::Cure if !self.player.is_poisoned() => Err(RejectReason::NotPoisoned),
            _ => Ok(()),
        }
    }

    /// Consumes one unit from `slot` and applies its effect.
    fn resolve_item(
        &mut self,
        slot: usize,
        effect: ConsumableEffect,
        target: Option<usize>,
        env: &mut BattleEnv<'_>,
    ) -> ActionResult {
        let item = self
            .inventory
            .take_one(slot)
            .map_err(|_| RejectReason::EmptySlot { slot })?;
        let color_turns = self.config.color_effect_turns;

        match effect {
            ConsumableEffect::Heal(amount) => {
                let restored = self.player.heal(amount);
                self.player
                    .set_color_effect(ColorEffectKind::Healed, color_turns);
                self.log.push(BattleEvent::Healed {
                    target: self.player.name.clone(),
                    amount: restored,
                });
            }
            ConsumableEffect::AttackBuff { amount, turns } => {
                apply_buff(&mut self.player, BuffKind::Attack, amount, turns);
                self.player
                    .set_color_effect(ColorEffectKind::Empowered, color_turns);
                self.log.push(BattleEvent::BuffApplied {
                    target: self.player.name.clone(),
                    kind: BuffKind::Attack,
                    magnitude: amount,
                    turns,
                });
            }
            ConsumableEffect::DefenseBuff { amount, turns } => {
                apply_buff(&mut self.player, BuffKind::Defense, amount, turns);
                self.player
                    .set_color_effect(ColorEffectKind::Fortified, color_turns);
                self.log.push(BattleEvent::BuffApplied {
                    target: self.player.name.clone(),
                    kind: BuffKind::Defense,
                    magnitude: amount,
                    turns,
                });
            }
            ConsumableEffect::Cure => {
                cure_poison(&mut self.player);
                self.log.push(BattleEvent::PoisonCured {
                    target: self.player.name.clone(),
                });
            }
            ConsumableEffect::Bomb(damage) => {
                for enemy in self.enemies.iter_mut().filter(|e| e.is_alive()) {
                    let dealt = apply_damage(enemy, damage);
                    enemy.set_color_effect(ColorEffectKind::Damaged, color_turns);
                    self.log.push(BattleEvent::ItemDamage {
                        item: item.clone(),
                        target: enemy.name.clone(),
                        damage: dealt,
                    });
                }
            }
            ConsumableEffect::Stun { turns } => {
                if let Some(enemy) = target.and_then(|index| self.enemies.get_mut(index)) {
                    apply_buff(enemy, BuffKind::Stun, 0, turns);
                    enemy.set_color_effect(ColorEffectKind::Stunned, color_turns);
                    self.log.push(BattleEvent::Stunned {
                        target: enemy.name.clone(),
                    });
                }
            }
            ConsumableEffect::Poison { damage } => {
                if let Some(enemy) = target.and_then(|index| self.enemies.get_mut(index)) {
                    apply_poison(enemy, damage);
                    enemy.set_color_effect(ColorEffectKind::Poisoned, color_turns);
                    self.log.push(BattleEvent::Poisoned {
                        target: enemy.name.clone(),
                        damage,
                    });
                }
            }
        }

        let target_ref = match effect.target() {
            EffectTarget::Player => Some(CombatantRef::Player),
            EffectTarget::AllEnemies => None,
            EffectTarget::SingleEnemy => target.map(CombatantRef::Enemy),
        };
        let target_name = target_ref.map(|who| self.name_of(who).to_owned());
        self.log.push(BattleEvent::ItemUsed {
            item: item.clone(),
            target: target_name,
        });
        tracing::info!(%item, %effect, ?target_ref, "item used");

        self.last_item_use = Some(env.clock().now());
        env.animator().start_item_use_animation(ItemAnimation {
            item,
            target: target_ref,
        });
        self.start_animation(env);

        self.sweep_defeats();
        match self.decided_result() {
            Some(result) => Ok(self.end_battle(result, env)),
            None => Ok(ActionOutcome::Continue),
        }
    }

    /// End-of-turn processing for the player, then hands over to the enemy.
    fn end_player_turn(&mut self, env: &mut BattleEnv<'_>) -> ActionOutcome {
        let report = process_end_of_turn(&mut self.player, self.turn_counter);
        if let Some(damage) = report.poison_damage {
            self.log.push(BattleEvent::PoisonTick {
                target: self.player.name.clone(),
                damage,
            });
        }
        self.sweep_defeats();
        if let Some(result) = self.decided_result() {
            return self.end_battle(result, env);
        }

        self.phase = BattlePhase::EnemyTurn;
        self.enemy_turn_pending = true;
        if self.animating_since.is_none() {
            return self.run_enemy_turn(env);
        }
        ActionOutcome::TurnEnded
    }

    fn name_of(&self, who: CombatantRef) -> &str {
        match who {
            CombatantRef::Player => &self.player.name,
            CombatantRef::Enemy(index) => self
                .enemies
                .get(index)
                .map(|enemy| enemy.name.as_str())
                .unwrap_or_default(),
        }
    }
}
