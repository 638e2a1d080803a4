//! Async host for a single battle.
//!
//! This crate wires the deterministic engine from `battle-core` into a tokio
//! task. Consumers build a [`BattleSession`], drive it through
//! [`SessionHandle`], and subscribe to [`SessionEvent`]s to render the fight.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the session and its builder
//! - [`api`] exposes the handle and error types downstream clients interact with
//! - [`events`] defines what subscribers receive
//! - [`oracle`] adapts shared content and tokio time to engine collaborators
//! - [`config`] reads host-level settings from the environment
//! - `workers` keeps the session task internal to the crate
pub mod api;
pub mod config;
pub mod events;
pub mod oracle;
pub mod session;

mod workers;

pub use api::{Result, RuntimeError, SessionHandle};
pub use config::SessionConfig;
pub use events::SessionEvent;
pub use oracle::{OracleBundle, TokioClock};
pub use session::{BattleSession, SessionBuilder};
