//! Unified error types surfaced by the runtime API.
//!
//! Wraps engine declines, setup faults and worker coordination failures so
//! clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use battle_core::{BattleError, RejectReason};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The engine declined the request; battle state is unchanged.
    #[error("action rejected: {0}")]
    Rejected(#[from] RejectReason),

    #[error("failed to set up the battle")]
    Setup(#[from] BattleError),

    #[error("session requires {0} before building")]
    MissingComponent(&'static str),

    #[error("unknown encounter '{0}'")]
    UnknownEncounter(String),

    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("session worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl RuntimeError {
    /// The engine's decline reason, if this error is one.
    pub fn rejection(&self) -> Option<&RejectReason> {
        match self {
            Self::Rejected(reason) => Some(reason),
            _ => None,
        }
    }
}
