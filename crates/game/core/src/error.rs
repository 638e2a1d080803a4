//! Common error infrastructure for battle-core.
//!
//! The engine distinguishes three failure classes:
//!
//! - **Declined actions**: precondition violations such as attacking while an
//!   animation plays. The engine leaves state untouched and reports a
//!   [`RejectReason`]; hosts are expected to disable such actions anyway.
//! - **Domain errors**: crafting and inventory failures ([`CraftError`],
//!   [`InventoryError`]) that callers may want to show to the player.
//! - **Engine faults**: corrupted battle setup ([`BattleError`]). These abort
//!   the battle into a safe terminal state instead of panicking.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition; the same request may succeed later.
    ///
    /// Examples: item cooldown, animation still playing
    Recoverable,

    /// Invalid input, should not retry without changes.
    ///
    /// Examples: empty slot, target already defeated
    Validation,

    /// Unexpected state inconsistency.
    Internal,

    /// Battle state corrupted, cannot continue.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all battle-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Why the engine declined a requested action.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RejectReason {
    #[error("the battle is already over")]
    BattleOver,

    #[error("it is not the player's turn")]
    NotPlayerTurn,

    #[error("an animation is still playing")]
    Animating,

    #[error("item cooldown has not elapsed")]
    ItemCooldown,

    #[error("no enemy is selected")]
    NoTarget,

    #[error("enemy {index} cannot be targeted")]
    InvalidTarget { index: usize },

    #[error("inventory slot {slot} is empty")]
    EmptySlot { slot: usize },

    #[error("item '{name}' is not in the catalog")]
    UnknownItem { name: String },

    #[error("item '{name}' cannot be used in battle")]
    NotUsable { name: String },

    #[error("health is already full")]
    FullHealth,

    #[error("the player is not poisoned")]
    NotPoisoned,

    #[error("no living enemies remain")]
    NoLivingEnemies,

    #[error("a target must be chosen for the pending item first")]
    TargetSelectionPending,

    #[error("no item is waiting for a target")]
    NotSelectingTarget,
}

impl GameError for RejectReason {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Animating | Self::ItemCooldown | Self::TargetSelectionPending => {
                ErrorSeverity::Recoverable
            }
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BattleOver => "BATTLE_OVER",
            Self::NotPlayerTurn => "NOT_PLAYER_TURN",
            Self::Animating => "ANIMATING",
            Self::ItemCooldown => "ITEM_COOLDOWN",
            Self::NoTarget => "NO_TARGET",
            Self::InvalidTarget { .. } => "INVALID_TARGET",
            Self::EmptySlot { .. } => "EMPTY_SLOT",
            Self::UnknownItem { .. } => "UNKNOWN_ITEM",
            Self::NotUsable { .. } => "NOT_USABLE",
            Self::FullHealth => "FULL_HEALTH",
            Self::NotPoisoned => "NOT_POISONED",
            Self::NoLivingEnemies => "NO_LIVING_ENEMIES",
            Self::TargetSelectionPending => "TARGET_SELECTION_PENDING",
            Self::NotSelectingTarget => "NOT_SELECTING_TARGET",
        }
    }
}

/// Engine faults that make a battle impossible to start or continue.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BattleError {
    #[error("player combatant is invalid: {reason}")]
    InvalidPlayer { reason: &'static str },

    #[error("a battle needs at least one enemy")]
    NoEnemies,

    #[error("too many enemies: {count} (max {max})")]
    TooManyEnemies { count: usize, max: usize },

    #[error("enemy reference {index} is out of range")]
    EnemyOutOfRange { index: usize },

    #[error("enemy '{name}' has invalid vitals")]
    InvalidEnemy { name: String },
}

impl GameError for BattleError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::EnemyOutOfRange { .. } => ErrorSeverity::Internal,
            _ => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPlayer { .. } => "INVALID_PLAYER",
            Self::NoEnemies => "NO_ENEMIES",
            Self::TooManyEnemies { .. } => "TOO_MANY_ENEMIES",
            Self::EnemyOutOfRange { .. } => "ENEMY_OUT_OF_RANGE",
            Self::InvalidEnemy { .. } => "INVALID_ENEMY",
        }
    }
}

/// Inventory mutation failures. Every failing operation leaves the inventory unchanged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InventoryError {
    #[error("not enough space for {quantity}x '{name}'")]
    Full { name: String, quantity: u32 },

    #[error("need {required}x '{name}' but only {available} held")]
    Insufficient {
        name: String,
        required: u32,
        available: u32,
    },

    #[error("slot {slot} does not exist")]
    NoSuchSlot { slot: usize },

    #[error("item '{name}' is not in the catalog")]
    UnknownItem { name: String },
}

impl GameError for InventoryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownItem { .. } => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Full { .. } => "INVENTORY_FULL",
            Self::Insufficient { .. } => "INSUFFICIENT_ITEMS",
            Self::NoSuchSlot { .. } => "NO_SUCH_SLOT",
            Self::UnknownItem { .. } => "UNKNOWN_ITEM",
        }
    }
}

/// Crafting failures reported by [`crate::crafting::try_craft`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CraftError {
    #[error("recipe '{recipe}' is malformed: {reason}")]
    InvalidRecipe {
        recipe: String,
        reason: &'static str,
    },

    #[error("missing materials: need {required}x '{material}', have {available}")]
    InsufficientMaterials {
        material: String,
        required: u32,
        available: u32,
    },

    #[error("no room for {quantity}x '{item}'")]
    InventoryFull { item: String, quantity: u32 },

    #[error("the grid does not match any recipe")]
    NoMatchingRecipe,
}

impl GameError for CraftError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidRecipe { .. } => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRecipe { .. } => "INVALID_RECIPE",
            Self::InsufficientMaterials { .. } => "INSUFFICIENT_MATERIALS",
            Self::InventoryFull { .. } => "INVENTORY_FULL",
            Self::NoMatchingRecipe => "NO_MATCHING_RECIPE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_rejections_are_recoverable() {
        assert!(RejectReason::Animating.severity().is_recoverable());
        assert!(RejectReason::ItemCooldown.severity().is_recoverable());
        assert!(!RejectReason::FullHealth.severity().is_recoverable());
    }

    #[test]
    fn setup_faults_are_fatal() {
        assert_eq!(BattleError::NoEnemies.severity(), ErrorSeverity::Fatal);
        assert!(
            BattleError::EnemyOutOfRange { index: 3 }
                .severity()
                .is_internal()
        );
    }

    #[test]
    fn error_codes_are_stable() {
        let err = CraftError::InventoryFull {
            item: "Torch".into(),
            quantity: 2,
        };
        assert_eq!(err.error_code(), "INVENTORY_FULL");
        assert_eq!(err.to_string(), "no room for 2x 'Torch'");
    }
}
