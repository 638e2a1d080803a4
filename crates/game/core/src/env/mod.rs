//! Collaborators the engine calls into.
//!
//! Oracles expose static item definitions and randomness; the clock and the
//! animation driver connect the engine to its host. The [`BattleEnv`]
//! aggregate bundles them so battle operations can reach everything they need
//! without hard coupling to concrete implementations.
mod animation;
mod clock;
mod items;
mod rng;
pub mod testing;

pub use animation::{AnimationDriver, AttackAnimation, CombatantRef, ItemAnimation, NullAnimator};
pub use clock::{Clock, SystemClock};
pub use items::{ConsumableEffect, EffectTarget, ItemCatalog, ItemDefinition, ItemKind, ItemOracle};
pub use rng::{PcgRng, RngOracle, RollContext, compute_seed};

/// Aggregates the collaborators required by battle operations.
pub struct BattleEnv<'a> {
    items: &'a dyn ItemOracle,
    rng: &'a dyn RngOracle,
    clock: &'a dyn Clock,
    animator: &'a mut dyn AnimationDriver,
}

impl<'a> BattleEnv<'a> {
    pub fn new(
        items: &'a dyn ItemOracle,
        rng: &'a dyn RngOracle,
        clock: &'a dyn Clock,
        animator: &'a mut dyn AnimationDriver,
    ) -> Self {
        Self {
            items,
            rng,
            clock,
            animator,
        }
    }

    pub fn items(&self) -> &'a dyn ItemOracle {
        self.items
    }

    pub fn rng(&self) -> &'a dyn RngOracle {
        self.rng
    }

    pub fn clock(&self) -> &'a dyn Clock {
        self.clock
    }

    pub fn animator(&mut self) -> &mut dyn AnimationDriver {
        &mut *self.animator
    }
}
