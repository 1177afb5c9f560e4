//! Traits describing read-only battle data.
//!
//! Oracles expose rosters, equipment bonuses, spawn layouts and randomness.
//! The [`BattleEnv`] aggregate bundles the setup-time oracles so the registry
//! can build records without coupling to concrete content sources.
mod equipment;
mod error;
mod rng;
mod roster;
mod spawn;

pub use equipment::{EquipmentBonus, EquipmentOracle, EquipmentTable, NoEquipment};
pub use error::OracleError;
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use roster::{CombatantDefinition, RosterOracle, RosterSnapshot};
pub use spawn::{SpawnLayout, SpawnOracle};

/// Aggregates the oracles needed to set up a battle.
#[derive(Clone, Copy, Default)]
pub struct BattleEnv<'a> {
    roster: Option<&'a dyn RosterOracle>,
    equipment: Option<&'a dyn EquipmentOracle>,
    spawns: Option<&'a dyn SpawnOracle>,
}

impl<'a> BattleEnv<'a> {
    pub fn new(
        roster: Option<&'a dyn RosterOracle>,
        equipment: Option<&'a dyn EquipmentOracle>,
        spawns: Option<&'a dyn SpawnOracle>,
    ) -> Self {
        Self {
            roster,
            equipment,
            spawns,
        }
    }

    pub fn with_all(
        roster: &'a dyn RosterOracle,
        equipment: &'a dyn EquipmentOracle,
        spawns: &'a dyn SpawnOracle,
    ) -> Self {
        Self::new(Some(roster), Some(equipment), Some(spawns))
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the RosterOracle, or an error if not available.
    pub fn roster(&self) -> Result<&'a dyn RosterOracle, OracleError> {
        self.roster.ok_or(OracleError::RosterNotAvailable)
    }

    /// Returns the EquipmentOracle, or an error if not available.
    pub fn equipment(&self) -> Result<&'a dyn EquipmentOracle, OracleError> {
        self.equipment.ok_or(OracleError::EquipmentNotAvailable)
    }

    /// Returns the SpawnOracle, or an error if not available.
    pub fn spawns(&self) -> Result<&'a dyn SpawnOracle, OracleError> {
        self.spawns.ok_or(OracleError::SpawnsNotAvailable)
    }
}

impl core::fmt::Debug for BattleEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BattleEnv")
            .field("roster", &self.roster.is_some())
            .field("equipment", &self.equipment.is_some())
            .field("spawns", &self.spawns.is_some())
            .finish()
    }
}
