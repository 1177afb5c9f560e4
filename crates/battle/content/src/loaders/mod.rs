//! Content loaders for reading battle data from files.
//!
//! Each loader turns one RON/TOML file into the `battle-core` type that
//! backs the matching oracle.

pub mod combos;
pub mod config;
pub mod equipment;
pub mod factory;
pub mod roster;
pub mod spawns;

pub use combos::ComboLoader;
pub use config::ConfigLoader;
pub use equipment::{EquipmentLoader, GearPiece};
pub use factory::{ContentBundle, ContentFactory};
pub use roster::RosterLoader;
pub use spawns::{SpawnLoader, SpawnSpec};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
