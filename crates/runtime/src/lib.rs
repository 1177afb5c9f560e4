//! Async runtime that drives a battle in real time.
//!
//! `battle-core` resolves turns synchronously; this crate paces them. A
//! background worker owns the [`battle_core::Battle`], the [`Runtime`] loop
//! asks [`ActionProvider`]s for ally decisions and waits between the turn
//! phases, and every engine event is fanned out on the [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`setup`] bundles the oracles a battle is built from
//! - `workers` keeps the battle task internal to the crate
pub mod api;
pub mod events;
pub mod runtime;
pub mod setup;

mod workers;

pub use api::{
    ActionProvider, AutoPilotProvider, ChannelActionProvider, InputStage, PlayerInput, Result,
    RuntimeError, RuntimeHandle, SkillChoice, TargetChoice,
};
pub use events::{Event, EventBus, Topic};
pub use runtime::{PacingConfig, Runtime, RuntimeBuilder, RuntimeConfig, StepOutcome};
pub use setup::BattleSetup;
