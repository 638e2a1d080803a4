//! Worker tasks that back a battle session.
//!
//! The session worker owns the authoritative [`battle_core::Battle`]; every
//! other task talks to it through commands.

mod animator;
mod session;

pub(crate) use session::{Command, SessionWorker};
