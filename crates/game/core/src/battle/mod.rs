//! Turn-based battle state machine.
//!
//! [`Battle`] is the authoritative owner of one encounter: the player's
//! in-battle copy, the enemy roster, the inventory and all turn bookkeeping.
//! Every mutation goes through one of the entry points below; each either
//! applies completely or is declined with a [`RejectReason`] and leaves the
//! state untouched.
//!
//! - `player`: attack, item use and target selection
//! - `enemy`: the enemy phase (poison pass, one enemy action, end of turn)
//! - `pacing`: animation completion, watchdog and forced turn end
//! - `snapshot`: read-only views for hosts

mod enemy;
mod log;
mod pacing;
mod player;
mod snapshot;

pub use log::{BattleEvent, BattleLog, BattleResult};
pub use snapshot::{BattleSnapshot, UsableItem};

use std::time::Instant;

use arrayvec::ArrayVec;

use crate::combat::is_character_defeated;
use crate::config::BattleConfig;
use crate::env::{BattleEnv, ItemOracle, RngOracle, RollContext, compute_seed};
use crate::error::{BattleError, RejectReason};
use crate::rewards::RewardGenerator;
use crate::state::{Combatant, Inventory, ItemStack};

/// Whose move it is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattlePhase {
    PlayerTurn,
    /// The player has ended their turn; the enemy acts once the current
    /// animation completes.
    EnemyTurn,
    Over(BattleResult),
}

/// What an accepted request led to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionOutcome {
    /// Applied; the player keeps the turn.
    Continue,
    /// The item needs a target. Follow up with `select_target` or
    /// `cancel_target_selection`.
    AwaitingTarget,
    /// The player's turn ended; the enemy phase waits for the animation.
    TurnEnded,
    /// The enemy phase ran and control is back with the player.
    EnemyTurnResolved,
    BattleOver(BattleResult),
}

/// Result of a player-facing battle operation.
pub type ActionResult = Result<ActionOutcome, RejectReason>;

/// Everything the host carries forward once a battle is done.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleOutcome {
    /// The player with all battle-scoped effects cleared.
    pub player: Combatant,
    pub inventory: Inventory,
    /// Generated rewards that were never merged into `inventory`.
    pub unclaimed_rewards: Vec<ItemStack>,
    /// `None` when the battle was abandoned before it ended.
    pub result: Option<BattleResult>,
    pub turns: u32,
    pub fault: Option<BattleError>,
}

/// One battle between the player and up to [`BattleConfig::MAX_ENEMIES`] enemies.
#[derive(Clone, Debug)]
pub struct Battle {
    config: BattleConfig,
    seed: u64,
    /// Bumped once per resolved strike or enemy action; feeds RNG seeds.
    nonce: u64,

    player: Combatant,
    inventory: Inventory,
    enemies: ArrayVec<Combatant, { BattleConfig::MAX_ENEMIES }>,
    selected_enemy: Option<usize>,
    is_boss_battle: bool,

    phase: BattlePhase,
    turn_counter: u32,
    /// Round-robin cursor for the enemy that acts next.
    next_enemy: usize,
    enemy_turn_pending: bool,

    /// Quick slot of the item waiting for a target.
    pending_target_item: Option<usize>,
    animating_since: Option<Instant>,
    last_item_use: Option<Instant>,

    loot: RewardGenerator,
    rewards: Vec<ItemStack>,
    rewards_applied: bool,
    fault: Option<BattleError>,

    log: BattleLog,
}

impl Battle {
    /// Starts a battle with the player to move and the first enemy selected.
    pub fn new(
        player: Combatant,
        enemies: Vec<Combatant>,
        inventory: Inventory,
        config: BattleConfig,
        seed: u64,
    ) -> Result<Self, BattleError> {
        validate_roster(&player, &enemies)?;

        let is_boss_battle = enemies.iter().any(|enemy| enemy.is_hero);
        let enemies: ArrayVec<Combatant, { BattleConfig::MAX_ENEMIES }> =
            enemies.into_iter().collect();
        let mut log = BattleLog::new(config.log_capacity);
        log.push(BattleEvent::BattleStarted {
            enemies: enemies.len(),
            boss: is_boss_battle,
        });
        tracing::info!(
            enemies = enemies.len(),
            boss = is_boss_battle,
            seed,
            "battle started"
        );

        Ok(Self {
            config,
            seed,
            nonce: 0,
            player,
            inventory,
            enemies,
            selected_enemy: Some(0),
            is_boss_battle,
            phase: BattlePhase::PlayerTurn,
            turn_counter: 0,
            next_enemy: 0,
            enemy_turn_pending: false,
            pending_target_item: None,
            animating_since: None,
            last_item_use: None,
            loot: RewardGenerator::default(),
            rewards: Vec::new(),
            rewards_applied: false,
            fault: None,
            log,
        })
    }

    /// Loot tables rolled when the battle is won.
    #[must_use]
    pub fn with_rewards(mut self, loot: RewardGenerator) -> Self {
        self.loot = loot;
        self
    }

    // ===== queries =====

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn player(&self) -> &Combatant {
        &self.player
    }

    pub fn enemies(&self) -> &[Combatant] {
        &self.enemies
    }

    pub fn enemy(&self, index: usize) -> Option<&Combatant> {
        self.enemies.get(index)
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn selected_enemy(&self) -> Option<usize> {
        self.selected_enemy
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn is_player_turn(&self) -> bool {
        self.phase == BattlePhase::PlayerTurn
    }

    pub fn is_battle_over(&self) -> bool {
        matches!(self.phase, BattlePhase::Over(_))
    }

    pub fn battle_won(&self) -> bool {
        self.phase == BattlePhase::Over(BattleResult::Won)
    }

    pub fn result(&self) -> Option<BattleResult> {
        match self.phase {
            BattlePhase::Over(result) => Some(result),
            _ => None,
        }
    }

    pub fn is_boss_battle(&self) -> bool {
        self.is_boss_battle
    }

    pub fn turn_counter(&self) -> u32 {
        self.turn_counter
    }

    pub fn is_target_selection_mode(&self) -> bool {
        self.pending_target_item.is_some()
    }

    /// Name of the item waiting for a target.
    pub fn pending_target_item(&self) -> Option<&str> {
        self.pending_target_item
            .and_then(|slot| self.inventory.slot(slot))
            .map(|stack| stack.name.as_str())
    }

    pub fn is_animating(&self) -> bool {
        self.animating_since.is_some()
    }

    pub fn enemy_turn_pending(&self) -> bool {
        self.enemy_turn_pending
    }

    pub fn log(&self) -> &BattleLog {
        &self.log
    }

    pub fn fault(&self) -> Option<&BattleError> {
        self.fault.as_ref()
    }

    /// Rewards generated on victory and not yet applied.
    pub fn rewards(&self) -> &[ItemStack] {
        if self.rewards_applied {
            &[]
        } else {
            &self.rewards
        }
    }

    pub fn living_enemies(&self) -> impl Iterator<Item = (usize, &Combatant)> {
        self.enemies
            .iter()
            .enumerate()
            .filter(|(_, enemy)| enemy.is_alive())
    }

    pub fn all_enemies_defeated(&self) -> bool {
        self.enemies.iter().all(|enemy| !enemy.is_alive())
    }

    // ===== rewards =====

    /// Hands the generated rewards to the caller. Returns nothing once the
    /// rewards were taken or applied.
    pub fn take_rewards(&mut self) -> Vec<ItemStack> {
        if self.rewards_applied {
            return Vec::new();
        }
        self.rewards_applied = true;
        std::mem::take(&mut self.rewards)
    }

    /// Merges rewards into the battle inventory, at most once per battle.
    ///
    /// Uses the rewards generated at victory when there are any, and
    /// otherwise rolls count-scaled rewards for `enemy_count` enemies.
    /// Stacks that do not fit are dropped with a warning. Returns `None`
    /// when the battle was not won or rewards were already handed out.
    pub fn apply_battle_rewards(
        &mut self,
        enemy_count: usize,
        hero_defeated: bool,
        items: &dyn ItemOracle,
        rng: &dyn RngOracle,
    ) -> Option<Vec<ItemStack>> {
        if self.rewards_applied || !self.battle_won() {
            return None;
        }
        self.rewards_applied = true;

        let stacks = if self.rewards.is_empty() {
            let seed = compute_seed(self.seed, self.nonce, 0, RollContext::LootQuantity);
            self.loot
                .rewards_for_enemies(enemy_count, hero_defeated, items, rng, seed)
        } else {
            std::mem::take(&mut self.rewards)
        };

        let mut granted = Vec::with_capacity(stacks.len());
        for stack in stacks {
            match self.inventory.add_item(&stack.name, stack.quantity, items) {
                Ok(()) => granted.push(stack),
                Err(err) => tracing::warn!(item = %stack.name, %err, "reward dropped"),
            }
        }
        self.log.push(BattleEvent::RewardsApplied {
            stacks: granted.len(),
        });
        tracing::info!(stacks = granted.len(), "battle rewards applied");
        Some(granted)
    }

    // ===== termination =====

    /// Moves the battle into a terminal lost state after an engine fault.
    pub fn abort(&mut self, fault: BattleError) {
        if self.is_battle_over() {
            return;
        }
        tracing::error!(%fault, turn = self.turn_counter, "battle aborted");
        self.phase = BattlePhase::Over(BattleResult::Lost);
        self.enemy_turn_pending = false;
        self.pending_target_item = None;
        self.animating_since = None;
        self.log.push(BattleEvent::BattleEnded {
            result: BattleResult::Lost,
            aborted: true,
        });
        self.fault = Some(fault);
    }

    /// Consumes the battle and returns what persists past it.
    pub fn into_outcome(mut self) -> BattleOutcome {
        self.player.clear_battle_effects();
        let unclaimed_rewards = if self.rewards_applied {
            Vec::new()
        } else {
            self.rewards
        };
        BattleOutcome {
            player: self.player,
            inventory: self.inventory,
            unclaimed_rewards,
            result: match self.phase {
                BattlePhase::Over(result) => Some(result),
                _ => None,
            },
            turns: self.turn_counter,
            fault: self.fault,
        }
    }

    pub(crate) fn end_battle(
        &mut self,
        result: BattleResult,
        env: &mut BattleEnv<'_>,
    ) -> ActionOutcome {
        if let BattlePhase::Over(existing) = self.phase {
            return ActionOutcome::BattleOver(existing);
        }
        self.phase = BattlePhase::Over(result);
        self.enemy_turn_pending = false;
        self.pending_target_item = None;
        self.animating_since = None;

        if result == BattleResult::Won {
            let seed = compute_seed(self.seed, self.nonce, 0, RollContext::LootRoll);
            self.rewards = self.loot.generate_battle_rewards(
                self.is_boss_battle,
                env.items(),
                env.rng(),
                seed,
            );
        }

        self.log.push(BattleEvent::BattleEnded {
            result,
            aborted: false,
        });
        tracing::info!(
            %result,
            turns = self.turn_counter,
            rewards = self.rewards.len(),
            "battle ended"
        );
        ActionOutcome::BattleOver(result)
    }

    // ===== defeat bookkeeping =====

    /// Latches `is_defeated` on every combatant whose health reached zero,
    /// then moves the selection off a defeated enemy.
    pub(crate) fn sweep_defeats(&mut self) {
        if is_character_defeated(&self.player) && !self.player.is_defeated {
            self.player.is_defeated = true;
            self.log.push(BattleEvent::Defeated {
                name: self.player.name.clone(),
            });
            tracing::info!(combatant = %self.player.name, "player defeated");
        }
        for enemy in self.enemies.iter_mut() {
            if is_character_defeated(enemy) && !enemy.is_defeated {
                enemy.is_defeated = true;
                self.log.push(BattleEvent::Defeated {
                    name: enemy.name.clone(),
                });
                tracing::info!(combatant = %enemy.name, "enemy defeated");
            }
        }
        self.reselect_target();
    }

    /// Keeps a living selection, otherwise picks the next living enemy after it.
    fn reselect_target(&mut self) {
        let count = self.enemies.len();
        let start = match self.selected_enemy {
            Some(index) if self.enemies.get(index).is_some_and(Combatant::is_alive) => return,
            Some(index) => index,
            None => 0,
        };
        self.selected_enemy = (0..count)
            .map(|offset| (start + offset) % count)
            .find(|&index| self.enemies[index].is_alive());
    }

    /// Victory takes precedence when both sides fall in the same step.
    pub(crate) fn decided_result(&self) -> Option<BattleResult> {
        if self.all_enemies_defeated() {
            Some(BattleResult::Won)
        } else if !self.player.is_alive() {
            Some(BattleResult::Lost)
        } else {
            None
        }
    }
}

fn validate_roster(player: &Combatant, enemies: &[Combatant]) -> Result<(), BattleError> {
    if !player.is_player {
        return Err(BattleError::InvalidPlayer {
            reason: "combatant is not flagged as the player",
        });
    }
    if player.max_health() <= 0 {
        return Err(BattleError::InvalidPlayer {
            reason: "max health must be positive",
        });
    }
    if !player.is_alive() {
        return Err(BattleError::InvalidPlayer {
            reason: "player cannot start a battle defeated",
        });
    }
    if enemies.is_empty() {
        return Err(BattleError::NoEnemies);
    }
    if enemies.len() > BattleConfig::MAX_ENEMIES {
        return Err(BattleError::TooManyEnemies {
            count: enemies.len(),
            max: BattleConfig::MAX_ENEMIES,
        });
    }
    if let Some(enemy) = enemies
        .iter()
        .find(|enemy| enemy.is_player || enemy.max_health() <= 0 || !enemy.is_alive())
    {
        return Err(BattleError::InvalidEnemy {
            name: enemy.name.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::testing::{FixedRng, ManualClock};
    use crate::env::{ItemCatalog, NullAnimator};

    fn hero() -> Combatant {
        Combatant::player("Hero", 100, 20, 5)
    }

    fn battle(enemies: Vec<Combatant>) -> Battle {
        Battle::new(hero(), enemies, Inventory::default(), BattleConfig::new(), 7).unwrap()
    }

    #[test]
    fn new_battle_starts_on_players_turn() {
        let battle = battle(vec![Combatant::new("Goblin", 50, 10, 5)]);
        assert!(battle.is_player_turn());
        assert!(!battle.is_battle_over());
        assert_eq!(battle.selected_enemy(), Some(0));
        assert_eq!(battle.turn_counter(), 0);
        assert!(!battle.is_boss_battle());
    }

    #[test]
    fn any_hero_makes_a_boss_battle() {
        let battle = battle(vec![
            Combatant::new("Goblin", 50, 10, 5),
            Combatant::new("Warlord", 120, 18, 8).as_hero(),
        ]);
        assert!(battle.is_boss_battle());
    }

    #[test]
    fn invalid_rosters_are_rejected() {
        let config = BattleConfig::new();
        assert_eq!(
            Battle::new(hero(), vec![], Inventory::default(), config.clone(), 1).unwrap_err(),
            BattleError::NoEnemies
        );

        let nine = vec![Combatant::new("Rat", 5, 1, 0); 9];
        assert!(matches!(
            Battle::new(hero(), nine, Inventory::default(), config.clone(), 1),
            Err(BattleError::TooManyEnemies { count: 9, .. })
        ));

        let npc = Combatant::new("Hero", 100, 20, 5);
        let goblin = vec![Combatant::new("Goblin", 50, 10, 5)];
        assert!(matches!(
            Battle::new(npc, goblin.clone(), Inventory::default(), config.clone(), 1),
            Err(BattleError::InvalidPlayer { .. })
        ));

        let corpse = vec![Combatant::new("Husk", 50, 10, 5).with_health(0)];
        assert!(matches!(
            Battle::new(hero(), corpse, Inventory::default(), config, 1),
            Err(BattleError::InvalidEnemy { .. })
        ));
    }

    #[test]
    fn abort_is_terminal_and_records_the_fault() {
        let mut battle = battle(vec![Combatant::new("Goblin", 50, 10, 5)]);
        battle.abort(BattleError::EnemyOutOfRange { index: 4 });
        assert!(battle.is_battle_over());
        assert!(!battle.battle_won());
        assert_eq!(battle.fault(), Some(&BattleError::EnemyOutOfRange { index: 4 }));

        let outcome = battle.into_outcome();
        assert_eq!(outcome.result, Some(BattleResult::Lost));
        assert!(outcome.fault.is_some());
    }

    #[test]
    fn rewards_apply_only_once() {
        let items = ItemCatalog::new(vec![crate::env::ItemDefinition::material("Bone")]);
        let clock = ManualClock::new();
        let mut animator = NullAnimator;
        let rng = FixedRng::ALWAYS;
        let mut env = BattleEnv::new(&items, &rng, &clock, &mut animator);

        let loot = RewardGenerator::new(
            crate::rewards::LootTable::new(
                1,
                vec![crate::rewards::LootEntry::new("Bone", 2, 2, 100)],
            ),
            Default::default(),
        );
        let mut battle = battle(vec![Combatant::new("Rat", 1, 0, 0)]).with_rewards(loot);

        assert!(battle.apply_battle_rewards(1, false, &items, &rng).is_none());
        assert_eq!(
            battle.attack(&mut env),
            Ok(ActionOutcome::BattleOver(BattleResult::Won))
        );
        assert_eq!(battle.rewards(), &[ItemStack::new("Bone", 2)]);

        let granted = battle.apply_battle_rewards(1, false, &items, &rng);
        assert_eq!(granted, Some(vec![ItemStack::new("Bone", 2)]));
        assert_eq!(battle.inventory().count_of("Bone"), 2);
        assert!(battle.apply_battle_rewards(1, false, &items, &rng).is_none());
        assert!(battle.take_rewards().is_empty());
        assert_eq!(battle.inventory().count_of("Bone"), 2);
    }

    #[test]
    fn finished_battle_stops_animating() {
        let items = ItemCatalog::default();
        let clock = ManualClock::new();
        let mut animator = NullAnimator;
        let mut env = BattleEnv::new(&items, &FixedRng::NEVER, &clock, &mut animator);

        let mut battle = battle(vec![Combatant::new("Rat", 1, 0, 0)]);
        assert_eq!(
            battle.attack(&mut env),
            Ok(ActionOutcome::BattleOver(BattleResult::Won))
        );
        assert!(!battle.is_animating());

        clock.advance(battle.config().watchdog() * 2);
        assert_eq!(battle.poll_watchdog(&mut env), None);
        assert_eq!(battle.on_watchdog_fired(&mut env), None);
        assert!(matches!(
            battle.log().iter().last(),
            Some(BattleEvent::BattleEnded {
                result: BattleResult::Won,
                aborted: false
            })
        ));
    }
}
