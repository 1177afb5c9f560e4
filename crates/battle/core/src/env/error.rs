//! Oracle access errors.

use crate::error::{BattleError, ErrorSeverity};

/// Errors that occur when accessing oracle data.
///
/// A battle cannot be set up without its roster, equipment and spawn
/// oracles, so a missing oracle is fatal.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("RosterOracle not available")]
    RosterNotAvailable,

    #[error("EquipmentOracle not available")]
    EquipmentNotAvailable,

    #[error("SpawnOracle not available")]
    SpawnsNotAvailable,
}

impl BattleError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::RosterNotAvailable => "ORACLE_ROSTER_NOT_AVAILABLE",
            Self::EquipmentNotAvailable => "ORACLE_EQUIPMENT_NOT_AVAILABLE",
            Self::SpawnsNotAvailable => "ORACLE_SPAWNS_NOT_AVAILABLE",
        }
    }
}
