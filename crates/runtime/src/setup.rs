//! Oracles and parameters a battle is built from.
//!
//! Content is immutable once the battle starts; [`BattleSetup`] keeps it
//! behind `Arc`s so loaders, tests and the runtime can share one copy and
//! build a [`battle_core::BattleEnv`] on demand.
use std::sync::Arc;

use battle_core::{
    Battle, BattleConfig, BattleEnv, ComboTable, ConfigurationError, EquipmentOracle, NoEquipment,
    PcgRng, RngOracle, RosterOracle, SpawnOracle,
};

pub struct BattleSetup {
    pub(crate) roster: Arc<dyn RosterOracle>,
    pub(crate) equipment: Arc<dyn EquipmentOracle>,
    pub(crate) spawns: Arc<dyn SpawnOracle>,
    pub(crate) config: BattleConfig,
    pub(crate) combos: ComboTable,
    pub(crate) rng: Box<dyn RngOracle>,
    pub(crate) seed: u64,
}

impl BattleSetup {
    /// Gearless battle with default balance, no combos and seed 0.
    pub fn new(roster: Arc<dyn RosterOracle>, spawns: Arc<dyn SpawnOracle>) -> Self {
        Self {
            roster,
            equipment: Arc::new(NoEquipment),
            spawns,
            config: BattleConfig::default(),
            combos: ComboTable::default(),
            rng: Box::new(PcgRng),
            seed: 0,
        }
    }

    pub fn with_equipment(mut self, equipment: Arc<dyn EquipmentOracle>) -> Self {
        self.equipment = equipment;
        self
    }

    pub fn with_config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_combos(mut self, combos: ComboTable) -> Self {
        self.combos = combos;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the RNG, e.g. with a fixed oracle in tests.
    pub fn with_rng(mut self, rng: Box<dyn RngOracle>) -> Self {
        self.rng = rng;
        self
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Converts the setup into a ready battle.
    pub fn build(self) -> Result<Battle, ConfigurationError> {
        let env = BattleEnv::with_all(
            self.roster.as_ref(),
            self.equipment.as_ref(),
            self.spawns.as_ref(),
        );
        Battle::setup(&env, self.config, self.combos, self.rng, self.seed)
    }
}

impl std::fmt::Debug for BattleSetup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleSetup")
            .field("allies", &self.roster.allies().len())
            .field("enemies", &self.roster.enemies().len())
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}
