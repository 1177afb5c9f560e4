//! Owner of every combatant record in a battle.
//!
//! Records are created once at setup from the roster, the spawn layout and
//! the equipment bonuses, and stay registered after death so that totals and
//! snapshots can still refer to them.

use tracing::warn;

use crate::config::BattleConfig;
use crate::env::{BattleEnv, CombatantDefinition, EquipmentOracle, OracleError};
use crate::error::{BattleError, ErrorSeverity};
use crate::state::{CombatantId, CombatantKind, CombatantRecord, Position, RecordSeed, Side};

/// Setup failures. No partial battle state is created when one is returned.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("ally roster is empty")]
    EmptyAllyRoster,

    #[error("enemy roster is empty")]
    EmptyEnemyRoster,

    #[error("spawn layout has {available} ally slots, at least {required} required")]
    NotEnoughAllySlots { required: usize, available: usize },

    #[error("spawn layout has {available} enemy slots, at least {required} required")]
    NotEnoughEnemySlots { required: usize, available: usize },

    #[error("combatant '{name}' has non-positive speed {speed}")]
    InvalidSpeed { name: String, speed: f64 },

    #[error("combatant '{name}' has zero max HP")]
    InvalidMaxHp { name: String },
}

impl BattleError for ConfigurationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Oracle(inner) => inner.error_code(),
            Self::EmptyAllyRoster => "CONFIG_EMPTY_ALLY_ROSTER",
            Self::EmptyEnemyRoster => "CONFIG_EMPTY_ENEMY_ROSTER",
            Self::NotEnoughAllySlots { .. } => "CONFIG_NOT_ENOUGH_ALLY_SLOTS",
            Self::NotEnoughEnemySlots { .. } => "CONFIG_NOT_ENOUGH_ENEMY_SLOTS",
            Self::InvalidSpeed { .. } => "CONFIG_INVALID_SPEED",
            Self::InvalidMaxHp { .. } => "CONFIG_INVALID_MAX_HP",
        }
    }
}

/// Registered combatants in registration order (allies, then enemies).
#[derive(Clone, Debug, Default)]
pub struct CombatantRegistry {
    records: Vec<CombatantRecord>,
}

impl CombatantRegistry {
    /// Builds the records for a battle.
    ///
    /// At most [`BattleConfig::MAX_ALLIES`] allies are fielded and enemies are
    /// capped at the number of enemy slots; extra definitions are skipped.
    pub fn setup_combatants(env: &BattleEnv<'_>) -> Result<Self, ConfigurationError> {
        let roster = env.roster()?;
        let equipment = env.equipment()?;
        let spawns = env.spawns()?;

        let allies = roster.allies();
        let enemies = roster.enemies();
        if allies.is_empty() {
            return Err(ConfigurationError::EmptyAllyRoster);
        }
        if enemies.is_empty() {
            return Err(ConfigurationError::EmptyEnemyRoster);
        }

        let ally_slots = spawns.ally_slots();
        let enemy_slots = spawns.enemy_slots();
        if ally_slots.len() < BattleConfig::MIN_ALLY_SLOTS {
            return Err(ConfigurationError::NotEnoughAllySlots {
                required: BattleConfig::MIN_ALLY_SLOTS,
                available: ally_slots.len(),
            });
        }
        if enemy_slots.len() < BattleConfig::MIN_ENEMY_SLOTS {
            return Err(ConfigurationError::NotEnoughEnemySlots {
                required: BattleConfig::MIN_ENEMY_SLOTS,
                available: enemy_slots.len(),
            });
        }

        let ally_count = allies.len().min(BattleConfig::MAX_ALLIES);
        let enemy_count = enemies.len().min(enemy_slots.len());
        if ally_count < allies.len() || enemy_count < enemies.len() {
            warn!(
                target: "battle::registry",
                allies = allies.len(),
                enemies = enemies.len(),
                ally_count,
                enemy_count,
                "roster exceeds available slots, extra combatants skipped"
            );
        }

        let fielded = allies
            .iter()
            .zip(ally_slots)
            .take(ally_count)
            .map(|(def, slot)| (def, CombatantKind::Ally, *slot))
            .chain(
                enemies
                    .iter()
                    .zip(enemy_slots)
                    .take(enemy_count)
                    .map(|(def, slot)| (def, def.enemy_kind(), *slot)),
            );

        let mut records = Vec::with_capacity(ally_count + enemy_count);
        for (index, (def, kind, slot)) in fielded.enumerate() {
            let seed = Self::seed(def, kind, slot, equipment)?;
            records.push(CombatantRecord::new(CombatantId(index as u32), seed));
        }
        Ok(Self { records })
    }

    fn seed(
        def: &CombatantDefinition,
        kind: CombatantKind,
        position: Position,
        equipment: &dyn EquipmentOracle,
    ) -> Result<RecordSeed, ConfigurationError> {
        let stats = def.stats.with_bonus(&equipment.bonus(&def.id));
        if !(stats.speed > 0.0) {
            return Err(ConfigurationError::InvalidSpeed {
                name: def.name.clone(),
                speed: stats.speed,
            });
        }
        if stats.max_hp == 0 {
            return Err(ConfigurationError::InvalidMaxHp {
                name: def.name.clone(),
            });
        }
        Ok(RecordSeed {
            definition_id: def.id.clone(),
            name: def.name.clone(),
            kind,
            stats,
            element: def.element,
            attack_type: def.attack_type,
            attack_range: def.attack_range,
            level: def.level,
            skill3_mana_cost: def.skill3_mana_cost,
            skills: def.skills.clone(),
            position,
        })
    }

    pub fn get(&self, id: CombatantId) -> Option<&CombatantRecord> {
        self.records.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: CombatantId) -> Option<&mut CombatantRecord> {
        self.records.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatantRecord> {
        self.records.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut CombatantRecord> {
        self.records.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Living combatants of `side` in registration order.
    pub fn living(&self, side: Side) -> impl Iterator<Item = &CombatantRecord> {
        self.records
            .iter()
            .filter(move |r| r.side() == side && r.is_alive())
    }

    /// Defeated combatants of `side` in registration order.
    pub fn dead(&self, side: Side) -> impl Iterator<Item = &CombatantRecord> {
        self.records
            .iter()
            .filter(move |r| r.side() == side && !r.is_alive())
    }

    pub fn living_count(&self, side: Side) -> usize {
        self.living(side).count()
    }

    pub fn is_alive(&self, id: CombatantId) -> bool {
        self.get(id).is_some_and(CombatantRecord::is_alive)
    }

    /// True once either side has no living combatants.
    pub fn is_battle_over(&self) -> bool {
        self.living_count(Side::Ally) == 0 || self.living_count(Side::Enemy) == 0
    }

    /// The side still standing, once the battle is over.
    pub fn winner(&self) -> Option<Side> {
        match (
            self.living_count(Side::Ally) > 0,
            self.living_count(Side::Enemy) > 0,
        ) {
            (true, false) => Some(Side::Ally),
            (false, true) => Some(Side::Enemy),
            _ => None,
        }
    }

    /// Highest speed among all registered combatants.
    pub fn max_speed(&self) -> f64 {
        self.records
            .iter()
            .map(CombatantRecord::speed)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{EquipmentTable, NoEquipment, RosterSnapshot, SpawnLayout};
    use crate::state::BaseStats;

    fn def(name: &str, hp: u32, speed: f64) -> CombatantDefinition {
        CombatantDefinition::new(
            name.to_lowercase(),
            name,
            BaseStats {
                max_hp: hp,
                speed,
                attack: 50.0,
                ..BaseStats::default()
            },
        )
    }

    fn roster(allies: usize, enemies: usize) -> RosterSnapshot {
        RosterSnapshot::new(
            (0..allies).map(|i| def(&format!("Ally{i}"), 100, 100.0)).collect(),
            (0..enemies).map(|i| def(&format!("Enemy{i}"), 80, 90.0)).collect(),
        )
    }

    #[test]
    fn setup_binds_allies_then_enemies_in_order() {
        let roster = roster(2, 3);
        let spawns = SpawnLayout::lines(4, 3, 2.0, 10.0);
        let env = BattleEnv::with_all(&roster, &NoEquipment, &spawns);

        let registry = CombatantRegistry::setup_combatants(&env).unwrap();
        assert_eq!(registry.len(), 5);
        let sides: Vec<_> = registry.iter().map(CombatantRecord::side).collect();
        assert_eq!(
            sides,
            [Side::Ally, Side::Ally, Side::Enemy, Side::Enemy, Side::Enemy]
        );
        let enemy = registry.get(CombatantId(3)).unwrap();
        assert_eq!(enemy.position(), Position::new(2.0, 0.0, 10.0));
        assert_eq!(enemy.current_hp(), 80);
    }

    #[test]
    fn equipment_bonus_is_added_to_base_stats() {
        let roster = roster(1, 1);
        let spawns = SpawnLayout::lines(4, 1, 2.0, 10.0);
        let mut gear = EquipmentTable::new();
        gear.equip(
            "ally0",
            BaseStats {
                attack: 25.0,
                max_hp: 50,
                ..BaseStats::default()
            },
        );
        let env = BattleEnv::with_all(&roster, &gear, &spawns);

        let registry = CombatantRegistry::setup_combatants(&env).unwrap();
        let ally = registry.get(CombatantId(0)).unwrap();
        assert_eq!(ally.stats().attack, 75.0);
        assert_eq!(ally.max_hp(), 150);
        assert_eq!(ally.current_hp(), 150);
    }

    #[test]
    fn rosters_are_capped_by_slots() {
        let roster = roster(6, 5);
        let spawns = SpawnLayout::lines(6, 2, 2.0, 10.0);
        let env = BattleEnv::with_all(&roster, &NoEquipment, &spawns);

        let registry = CombatantRegistry::setup_combatants(&env).unwrap();
        assert_eq!(registry.living_count(Side::Ally), BattleConfig::MAX_ALLIES);
        assert_eq!(registry.living_count(Side::Enemy), 2);
    }

    #[test]
    fn setup_rejects_invalid_configuration() {
        let spawns = SpawnLayout::lines(4, 1, 2.0, 10.0);
        let empty = roster(0, 1);
        let env = BattleEnv::with_all(&empty, &NoEquipment, &spawns);
        assert_eq!(
            CombatantRegistry::setup_combatants(&env).unwrap_err(),
            ConfigurationError::EmptyAllyRoster
        );

        let full = roster(1, 1);
        let few_slots = SpawnLayout::lines(3, 1, 2.0, 10.0);
        let env = BattleEnv::with_all(&full, &NoEquipment, &few_slots);
        assert!(matches!(
            CombatantRegistry::setup_combatants(&env),
            Err(ConfigurationError::NotEnoughAllySlots {
                required: 4,
                available: 3
            })
        ));

        let no_enemy_slots = SpawnLayout::lines(4, 0, 2.0, 10.0);
        let env = BattleEnv::with_all(&full, &NoEquipment, &no_enemy_slots);
        assert!(matches!(
            CombatantRegistry::setup_combatants(&env),
            Err(ConfigurationError::NotEnoughEnemySlots { .. })
        ));

        let env = BattleEnv::new(Some(&full), None, Some(&spawns));
        let err = CombatantRegistry::setup_combatants(&env).unwrap_err();
        assert_eq!(err.error_code(), "ORACLE_EQUIPMENT_NOT_AVAILABLE");
    }

    #[test]
    fn zero_speed_is_a_configuration_error() {
        let roster = RosterSnapshot::new(vec![def("Still", 100, 0.0)], vec![def("Foe", 80, 90.0)]);
        let spawns = SpawnLayout::lines(4, 1, 2.0, 10.0);
        let env = BattleEnv::with_all(&roster, &NoEquipment, &spawns);
        assert!(matches!(
            CombatantRegistry::setup_combatants(&env),
            Err(ConfigurationError::InvalidSpeed { .. })
        ));
    }

    #[test]
    fn battle_is_over_when_a_side_is_wiped() {
        let roster = roster(1, 2);
        let spawns = SpawnLayout::lines(4, 2, 2.0, 10.0);
        let env = BattleEnv::with_all(&roster, &NoEquipment, &spawns);
        let mut registry = CombatantRegistry::setup_combatants(&env).unwrap();

        registry.get_mut(CombatantId(1)).unwrap().take_damage(999);
        assert!(!registry.is_battle_over());
        assert_eq!(registry.dead(Side::Enemy).count(), 1);

        registry.get_mut(CombatantId(2)).unwrap().take_damage(999);
        assert!(registry.is_battle_over());
        assert_eq!(registry.winner(), Some(Side::Ally));
    }
}
