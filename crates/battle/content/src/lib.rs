//! Data-driven battle content and loaders.
//!
//! This crate reads the static content a battle is fought with from RON/TOML
//! data files:
//! - Ally and enemy rosters (RON)
//! - Gear pieces, folded into per-combatant equipment bonuses (RON)
//! - Spawn layouts (RON)
//! - Combo rules (RON)
//! - Battle configuration (TOML)
//!
//! Loaded content is handed to `battle-core` through its oracle traits and
//! never appears in battle state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ComboLoader, ConfigLoader, ContentBundle, ContentFactory, EquipmentLoader, GearPiece,
    LoadResult, RosterLoader, SpawnLoader, SpawnSpec,
};
