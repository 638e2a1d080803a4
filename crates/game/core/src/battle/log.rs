//! Structured battle log for hosts that render a combat feed.

use std::collections::VecDeque;

use crate::state::BuffKind;

/// Which way a battle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BattleResult {
    Won,
    Lost,
}

/// Something that happened during a battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    BattleStarted {
        enemies: usize,
        boss: bool,
    },
    Attack {
        attacker: String,
        target: String,
        damage: i32,
        critical: bool,
        special: bool,
    },
    ItemUsed {
        item: String,
        target: Option<String>,
    },
    ItemDamage {
        item: String,
        target: String,
        damage: i32,
    },
    Healed {
        target: String,
        amount: i32,
    },
    BuffApplied {
        target: String,
        kind: BuffKind,
        magnitude: i32,
        turns: u32,
    },
    BuffExpired {
        target: String,
        kind: BuffKind,
    },
    Poisoned {
        target: String,
        damage: i32,
    },
    PoisonCured {
        target: String,
    },
    PoisonTick {
        target: String,
        damage: i32,
    },
    Stunned {
        target: String,
    },
    EnemyPotion {
        enemy: String,
    },
    Defeated {
        name: String,
    },
    TurnStarted {
        turn: u32,
    },
    WatchdogFired,
    TurnForced,
    BattleEnded {
        result: BattleResult,
        aborted: bool,
    },
    RewardsApplied {
        stacks: usize,
    },
}

/// Bounded log; the oldest entries fall off first.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleLog {
    capacity: usize,
    entries: VecDeque<BattleEvent>,
    /// Total events ever pushed, including dropped ones.
    recorded: u64,
}

impl BattleLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: VecDeque::new(),
            recorded: 0,
        }
    }

    pub fn push(&mut self, event: BattleEvent) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(event);
        self.recorded += 1;
    }

    pub fn recorded(&self) -> u64 {
        self.recorded
    }

    /// Retained events pushed after `mark`, a previous [`Self::recorded`] value.
    pub fn since(&self, mark: u64) -> impl Iterator<Item = &BattleEvent> {
        let fresh = self.recorded.saturating_sub(mark).min(self.entries.len() as u64) as usize;
        self.entries.iter().skip(self.entries.len() - fresh)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BattleEvent> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&BattleEvent> {
        self.entries.back()
    }
}
