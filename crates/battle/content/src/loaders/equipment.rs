//! Equipment loader.
//!
//! Gear is authored piece by piece; every piece names the combatant it is
//! equipped on and the stats it adds. Pieces for the same combatant stack.

use std::path::Path;

use battle_core::{BaseStats, EquipmentTable};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One equipped piece of gear.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GearPiece {
    pub name: String,
    /// Definition id of the wearer.
    pub owner: String,
    #[serde(default)]
    pub bonus: BaseStats,
}

/// Gear catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GearCatalog {
    pub pieces: Vec<GearPiece>,
}

/// Loader for equipment bonuses from RON files.
pub struct EquipmentLoader;

impl EquipmentLoader {
    pub fn load(path: &Path) -> LoadResult<EquipmentTable> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<EquipmentTable> {
        let catalog: GearCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse gear catalog RON: {}", e))?;

        let mut table = EquipmentTable::new();
        for piece in catalog.pieces {
            table.equip(piece.owner, piece.bonus);
        }
        Ok(table)
    }
}
