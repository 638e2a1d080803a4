//! Combat resolution system.
//!
//! Pure functions over [`Combatant`](crate::state::Combatant) values. The
//! battle state machine calls these and owns all sequencing; nothing in here
//! logs beyond `tracing::debug!` or touches the host.
//!
//! - `damage`: base, critical and special-ability damage, health reduction
//! - `status`: timed buffs, stun, poison ticks, colour countdowns

pub mod damage;
pub mod status;

pub use damage::{
    Strike, apply_critical, apply_damage, calculate_damage, calculate_special_ability_damage,
    is_character_defeated, is_critical_hit, roll_strike, seeds_for,
};
pub use status::{
    BuffApplication, EndOfTurn, apply_buff, apply_poison, cure_poison, process_end_of_turn,
    tick_poison, update_temporary_bonuses,
};
