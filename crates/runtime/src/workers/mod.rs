//! Worker tasks that back the runtime orchestration.
//!
//! The battle worker owns the authoritative battle and executes commands
//! sent through the runtime handle.

mod battle;

pub use battle::{BattleWorker, Command};
