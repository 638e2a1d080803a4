//! Animation driver seam.
//!
//! The engine never knows how long an animation runs. It asks the driver to
//! start one, marks itself as animating, and waits for the host to report
//! completion (or for the watchdog to fire).

/// Which side of the battle a combatant belongs to, with its roster index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatantRef {
    Player,
    Enemy(usize),
}

impl CombatantRef {
    /// Stable actor index used when deriving RNG seeds.
    pub fn actor_index(&self) -> u32 {
        match self {
            Self::Player => 0,
            Self::Enemy(index) => *index as u32 + 1,
        }
    }
}

/// Data for an attack animation request.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackAnimation {
    pub attacker: CombatantRef,
    pub target: CombatantRef,
    pub damage: i32,
    pub is_critical: bool,
}

/// Data for an item-use animation request.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemAnimation {
    pub item: String,
    pub target: Option<CombatantRef>,
}

/// Host-side animation player.
pub trait AnimationDriver {
    fn start_attack_animation(&mut self, animation: AttackAnimation);

    fn start_item_use_animation(&mut self, animation: ItemAnimation);

    fn stop_all_animations(&mut self);
}

/// Driver for headless hosts. Nothing plays, so callers should report
/// completion immediately after each action.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAnimator;

impl AnimationDriver for NullAnimator {
    fn start_attack_animation(&mut self, _animation: AttackAnimation) {}

    fn start_item_use_animation(&mut self, _animation: ItemAnimation) {}

    fn stop_all_animations(&mut self) {}
}
