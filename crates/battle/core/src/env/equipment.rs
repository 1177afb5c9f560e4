use std::collections::BTreeMap;

use crate::state::BaseStats;

/// Stat bonus contributed by a combatant's equipped gear.
pub type EquipmentBonus = BaseStats;

/// Resolves the equipment bonus of a combatant definition.
///
/// Effective stats are `base + bonus` for every stat.
pub trait EquipmentOracle: Send + Sync {
    fn bonus(&self, definition_id: &str) -> EquipmentBonus;
}

/// Oracle for battles fought without gear.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoEquipment;

impl EquipmentOracle for NoEquipment {
    fn bonus(&self, _definition_id: &str) -> EquipmentBonus {
        EquipmentBonus::default()
    }
}

/// Bonuses keyed by definition id; unknown ids get no bonus.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipmentTable {
    bonuses: BTreeMap<String, EquipmentBonus>,
}

impl EquipmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `bonus` to whatever the definition already has.
    pub fn equip(&mut self, definition_id: impl Into<String>, bonus: EquipmentBonus) {
        let entry = self.bonuses.entry(definition_id.into()).or_default();
        *entry = entry.with_bonus(&bonus);
    }

    /// Definition ids that carry a bonus.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.bonuses.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bonuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bonuses.is_empty()
    }
}

impl EquipmentOracle for EquipmentTable {
    fn bonus(&self, definition_id: &str) -> EquipmentBonus {
        self.bonuses
            .get(definition_id)
            .copied()
            .unwrap_or_default()
    }
}
