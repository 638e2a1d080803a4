//! Deterministic collaborators for tests and headless hosts.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::{AnimationDriver, AttackAnimation, Clock, ItemAnimation, RngOracle};

/// Returns the same value for every seed.
///
/// `FixedRng(99)` makes every `roll_d100` land on 100, so no percentage roll
/// below 100 ever succeeds (no crits, no enemy potions, no specials).
#[derive(Clone, Copy, Debug)]
pub struct FixedRng(pub u32);

impl FixedRng {
    /// Every chance roll fails.
    pub const NEVER: Self = Self(99);
    /// Every chance roll succeeds.
    pub const ALWAYS: Self = Self(0);
}

impl RngOracle for FixedRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        self.0
    }
}

/// Replays a scripted sequence of values, then repeats the last one.
#[derive(Debug)]
pub struct ScriptedRng {
    values: Vec<u32>,
    cursor: Mutex<usize>,
}

impl ScriptedRng {
    pub fn new(values: Vec<u32>) -> Self {
        Self {
            values,
            cursor: Mutex::new(0),
        }
    }

    /// Builds a script from d100 outcomes (1-100).
    pub fn from_d100(rolls: &[u32]) -> Self {
        Self::new(rolls.iter().map(|roll| roll.saturating_sub(1)).collect())
    }
}

impl RngOracle for ScriptedRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        let mut cursor = match self.cursor.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let value = self
            .values
            .get(*cursor)
            .or_else(|| self.values.last())
            .copied()
            .unwrap_or(0);
        *cursor += 1;
        value
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = match self.now.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Everything a [`RecordingAnimator`] was asked to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnimationCall {
    Attack(AttackAnimation),
    ItemUse(ItemAnimation),
    StopAll,
}

/// Animation driver that records requests instead of playing them.
#[derive(Clone, Debug, Default)]
pub struct RecordingAnimator {
    pub calls: Vec<AnimationCall>,
}

impl RecordingAnimator {
    pub fn attacks(&self) -> impl Iterator<Item = &AttackAnimation> {
        self.calls.iter().filter_map(|call| match call {
            AnimationCall::Attack(attack) => Some(attack),
            _ => None,
        })
    }
}

impl AnimationDriver for RecordingAnimator {
    fn start_attack_animation(&mut self, animation: AttackAnimation) {
        self.calls.push(AnimationCall::Attack(animation));
    }

    fn start_item_use_animation(&mut self, animation: ItemAnimation) {
        self.calls.push(AnimationCall::ItemUse(animation));
    }

    fn stop_all_animations(&mut self) {
        self.calls.push(AnimationCall::StopAll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_rng_repeats_last_value() {
        let rng = ScriptedRng::from_d100(&[10, 90]);
        assert_eq!(rng.roll_d100(0), 10);
        assert_eq!(rng.roll_d100(0), 90);
        assert_eq!(rng.roll_d100(0), 90);
    }

    #[test]
    fn fixed_rng_extremes() {
        assert!(!FixedRng::NEVER.chance_pct(1, 99));
        assert!(FixedRng::ALWAYS.chance_pct(1, 1));
    }

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new();
        let start = clock.now();
        clock.advance(Duration::from_millis(250));
        assert_eq!(clock.now() - start, Duration::from_millis(250));
    }
}
