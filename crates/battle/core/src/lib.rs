//! Deterministic turn/combat resolution shared by the runtime and tools.
//!
//! `battle-core` owns the combat rules: the speed-weighted initiative
//! scheduler, the combatant registry, the status engine, the turn resolver
//! and the pooled effect instances. It performs no I/O; every observable
//! change is surfaced as a [`BattleEvent`] that presentation layers drain.
//! All state mutation flows through [`Battle`].
pub mod battle;
pub mod combat;
pub mod config;
pub mod env;
pub mod error;
pub mod events;
pub mod pool;
pub mod registry;
pub mod resolver;
pub mod scheduler;
pub mod state;
pub mod status;

pub use battle::{Battle, BattleOutcome, BattleSnapshot};
pub use combat::{ComboRule, ComboTable, DamageBranch, DamageRoll, HistoryEntry};
pub use config::BattleConfig;
pub use env::{
    BattleEnv, CombatantDefinition, EquipmentBonus, EquipmentOracle, EquipmentTable,
    NoEquipment, OracleError, PcgRng, RngOracle, RosterOracle, RosterSnapshot, SpawnLayout,
    SpawnOracle, compute_seed,
};
pub use error::{BattleError, ErrorSeverity};
pub use events::{BattleEvent, DamageTotals};
pub use pool::{EffectInstance, EffectInstanceId, EffectObjectPool, PoolError};
pub use registry::{CombatantRegistry, ConfigurationError};
pub use resolver::{
    CombatResolver, DamageRecord, Resource, TargetClass, TargetRequest, TurnError, TurnOutcome,
    TurnPhase, TurnPlan, check_affordable,
};
pub use scheduler::{ActionValueScheduler, ScheduledTurn};
pub use state::{
    AttackRange, AttackType, BaseStats, CombatantId, CombatantKind, CombatantRecord, EffectType,
    Element, Position, Rotation, Side, SkillDefinition, SkillSlot, StatusEffectKind,
    StatusMarker,
};
pub use status::{StatusApplication, StatusEffectEngine};
