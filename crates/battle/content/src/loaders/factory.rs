//! Content factory for building oracles from data files.

use std::path::{Path, PathBuf};

use battle_core::{BattleConfig, ComboTable, EquipmentTable, RosterSnapshot, SpawnLayout};

use crate::loaders::{
    ComboLoader, ConfigLoader, EquipmentLoader, LoadResult, RosterLoader, SpawnLoader,
};

/// Everything one battle needs, loaded and cross-checked.
#[derive(Debug, Clone)]
pub struct ContentBundle {
    pub config: BattleConfig,
    pub roster: RosterSnapshot,
    pub equipment: EquipmentTable,
    pub spawns: SpawnLayout,
    pub combos: ComboTable,
}

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── allies.ron
/// ├── enemies.ron
/// ├── equipment.ron
/// ├── spawns.ron
/// └── combos.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load both rosters from `allies.ron` and `enemies.ron`.
    pub fn load_roster(&self) -> LoadResult<RosterSnapshot> {
        let allies = RosterLoader::load(&self.data_dir.join("allies.ron"))?;
        let enemies = RosterLoader::load(&self.data_dir.join("enemies.ron"))?;
        Ok(RosterSnapshot::new(allies, enemies))
    }

    /// Load gear from `equipment.ron`. A missing file means no gear.
    pub fn load_equipment(&self) -> LoadResult<EquipmentTable> {
        let path = self.data_dir.join("equipment.ron");
        if !path.exists() {
            return Ok(EquipmentTable::new());
        }
        EquipmentLoader::load(&path)
    }

    /// Load the spawn layout from `spawns.ron`.
    pub fn load_spawns(&self) -> LoadResult<SpawnLayout> {
        SpawnLoader::load(&self.data_dir.join("spawns.ron"))
    }

    /// Load combo rules from `combos.ron`. A missing file means no combos.
    pub fn load_combos(&self) -> LoadResult<ComboTable> {
        let path = self.data_dir.join("combos.ron");
        if !path.exists() {
            return Ok(ComboTable::default());
        }
        ComboLoader::load(&path)
    }

    /// Load every file and check that they agree with each other.
    pub fn load_bundle(&self) -> LoadResult<ContentBundle> {
        let bundle = ContentBundle {
            config: self.load_config()?,
            roster: self.load_roster()?,
            equipment: self.load_equipment()?,
            spawns: self.load_spawns()?,
            combos: self.load_combos()?,
        };

        if let Some(owner) = bundle.equipment.ids().find(|id| {
            !bundle
                .roster
                .allies
                .iter()
                .chain(&bundle.roster.enemies)
                .any(|d| d.id == *id)
        }) {
            anyhow::bail!("equipment for unknown combatant '{}'", owner);
        }
        if bundle.spawns.enemies.len() < bundle.roster.enemies.len() {
            anyhow::bail!(
                "{} enemies but only {} enemy spawn slots",
                bundle.roster.enemies.len(),
                bundle.spawns.enemies.len()
            );
        }
        Ok(bundle)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
