//! Combatant records: the per-battle mutable state of every fighter.
//!
//! Allies and enemies share one record type; their differences (input
//! source, crit profile, enemy action policy) live in [`CombatantKind`].
//! Mutators are crate-private so only the registry, scheduler, status engine
//! and resolver can change a record, and each one enforces the record's
//! bounds on the way in.

use arrayvec::ArrayVec;

use super::{
    AttackRange, AttackType, CombatantId, Element, Position, Side, SkillDefinition, SkillSlot,
    StatusEffectKind,
};
use crate::config::BattleConfig;

/// Stat block used both for base definitions and for equipment bonuses.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BaseStats {
    pub max_hp: u32,
    pub attack: f64,
    pub defense: f64,
    pub speed: f64,
    pub agility: f64,
    pub crit_rate: f64,
    pub crit_dmg: f64,
    pub bonus_dmg: f64,
    pub vulnerability: f64,
    pub resistance: f64,
}

impl BaseStats {
    /// Adds an equipment bonus on top of these stats.
    pub fn with_bonus(self, bonus: &BaseStats) -> Self {
        Self {
            max_hp: self.max_hp.saturating_add(bonus.max_hp),
            attack: self.attack + bonus.attack,
            defense: self.defense + bonus.defense,
            speed: self.speed + bonus.speed,
            agility: self.agility + bonus.agility,
            crit_rate: self.crit_rate + bonus.crit_rate,
            crit_dmg: self.crit_dmg + bonus.crit_dmg,
            bonus_dmg: self.bonus_dmg + bonus.bonus_dmg,
            vulnerability: self.vulnerability + bonus.vulnerability,
            resistance: self.resistance + bonus.resistance,
        }
    }
}

/// Capabilities that differ between allies and enemies.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatantKind {
    /// Player-controlled. Selections arrive from outside the engine.
    Ally,
    /// Engine-controlled, picking its slot with a mana/chance policy.
    Enemy {
        /// Probability of using the skill slot when the ultimate is not ready.
        skill2_chance: f64,
    },
}

impl CombatantKind {
    pub const DEFAULT_SKILL2_CHANCE: f64 = 0.3;

    pub const fn side(&self) -> Side {
        match self {
            Self::Ally => Side::Ally,
            Self::Enemy { .. } => Side::Enemy,
        }
    }
}

/// A placeholder status recorded for duration bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusMarker {
    pub kind: StatusEffectKind,
    pub turns_remaining: u32,
}

/// Mutable battle state and effective stats of one combatant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantRecord {
    id: CombatantId,
    definition_id: String,
    name: String,
    kind: CombatantKind,
    stats: BaseStats,
    element: Element,
    attack_type: AttackType,
    attack_range: AttackRange,
    level: u32,
    skill3_mana_cost: u32,
    skills: [SkillDefinition; 3],
    position: Position,

    current_hp: u32,
    mana: u32,
    energy: u32,
    skill_charge: u8,
    action_value: f64,
    slow_amount: f64,
    slow_turns_remaining: u32,
    markers: ArrayVec<StatusMarker, { BattleConfig::MAX_STATUS_MARKERS }>,
}

/// Identity and static attributes used to build a [`CombatantRecord`].
#[derive(Clone, Debug)]
pub(crate) struct RecordSeed {
    pub definition_id: String,
    pub name: String,
    pub kind: CombatantKind,
    pub stats: BaseStats,
    pub element: Element,
    pub attack_type: AttackType,
    pub attack_range: AttackRange,
    pub level: u32,
    pub skill3_mana_cost: u32,
    pub skills: [SkillDefinition; 3],
    pub position: Position,
}

impl CombatantRecord {
    pub(crate) fn new(id: CombatantId, seed: RecordSeed) -> Self {
        Self {
            id,
            current_hp: seed.stats.max_hp,
            definition_id: seed.definition_id,
            name: seed.name,
            kind: seed.kind,
            stats: seed.stats,
            element: seed.element,
            attack_type: seed.attack_type,
            attack_range: seed.attack_range,
            level: seed.level,
            skill3_mana_cost: seed.skill3_mana_cost,
            skills: seed.skills,
            position: seed.position,
            mana: 0,
            energy: 0,
            skill_charge: 0,
            action_value: 0.0,
            slow_amount: 0.0,
            slow_turns_remaining: 0,
            markers: ArrayVec::new(),
        }
    }

    // ===== read access =====

    pub fn id(&self) -> CombatantId {
        self.id
    }

    pub fn definition_id(&self) -> &str {
        &self.definition_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &CombatantKind {
        &self.kind
    }

    pub fn side(&self) -> Side {
        self.kind.side()
    }

    pub fn stats(&self) -> &BaseStats {
        &self.stats
    }

    pub fn element(&self) -> Element {
        self.element
    }

    pub fn attack_type(&self) -> AttackType {
        self.attack_type
    }

    pub fn attack_range(&self) -> AttackRange {
        self.attack_range
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn skill3_mana_cost(&self) -> u32 {
        self.skill3_mana_cost
    }

    pub fn skill(&self, slot: SkillSlot) -> &SkillDefinition {
        &self.skills[slot.index()]
    }

    pub fn skills(&self) -> &[SkillDefinition; 3] {
        &self.skills
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    pub fn max_hp(&self) -> u32 {
        self.stats.max_hp
    }

    pub fn mana(&self) -> u32 {
        self.mana
    }

    pub fn energy(&self) -> u32 {
        self.energy
    }

    pub fn skill_charge(&self) -> u8 {
        self.skill_charge
    }

    pub fn action_value(&self) -> f64 {
        self.action_value
    }

    pub fn speed(&self) -> f64 {
        self.stats.speed
    }

    pub fn slow_amount(&self) -> f64 {
        self.slow_amount
    }

    pub fn slow_turns_remaining(&self) -> u32 {
        self.slow_turns_remaining
    }

    pub fn is_slowed(&self) -> bool {
        self.slow_turns_remaining > 0
    }

    pub fn markers(&self) -> &[StatusMarker] {
        &self.markers
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Crit chance and crit damage bonus this combatant rolls with.
    pub fn crit_profile(&self, config: &BattleConfig) -> (f64, f64) {
        match self.kind {
            CombatantKind::Ally => (self.stats.crit_rate, self.stats.crit_dmg),
            CombatantKind::Enemy { .. } => (config.enemy_crit_rate, config.enemy_crit_dmg),
        }
    }

    // ===== crate-private mutators =====

    /// Subtracts `amount` HP, saturating at zero. Returns the HP lost.
    pub(crate) fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.current_hp);
        self.current_hp -= lost;
        lost
    }

    /// Restores up to `amount` HP without exceeding max HP. Returns the HP gained.
    pub(crate) fn heal(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.stats.max_hp - self.current_hp);
        self.current_hp += gained;
        gained
    }

    pub(crate) fn gain_mana(&mut self, amount: u32) {
        self.mana = self
            .mana
            .saturating_add(amount)
            .min(self.skill3_mana_cost);
    }

    pub(crate) fn drain_mana(&mut self) {
        self.mana = 0;
    }

    pub(crate) fn gain_energy(&mut self, amount: u32, cap: u32) {
        self.energy = self.energy.saturating_add(amount).min(cap);
    }

    pub(crate) fn gain_skill_charge(&mut self) {
        self.skill_charge = (self.skill_charge + 1).min(BattleConfig::SKILL_CHARGE_CAP);
    }

    pub(crate) fn reset_skill_charge(&mut self) {
        self.skill_charge = 0;
    }

    pub(crate) fn set_action_value(&mut self, value: f64) {
        self.action_value = value;
    }

    /// Moves the action value by `amount`, scaled by the slow factor while slowed.
    pub(crate) fn advance_action_value(&mut self, amount: f64) {
        let factor = if self.is_slowed() {
            self.slow_amount
        } else {
            1.0
        };
        self.action_value += amount * factor;
    }

    pub(crate) fn apply_slow(&mut self, amount: f64, turns: u32) {
        self.slow_amount = amount;
        self.slow_turns_remaining = turns;
    }

    /// Records or refreshes a placeholder status. Returns false when the
    /// marker list is full.
    pub(crate) fn add_marker(&mut self, kind: StatusEffectKind, turns: u32) -> bool {
        if let Some(existing) = self.markers.iter_mut().find(|m| m.kind == kind) {
            existing.turns_remaining = turns;
            return true;
        }
        self.markers
            .try_push(StatusMarker {
                kind,
                turns_remaining: turns,
            })
            .is_ok()
    }

    /// Counts down slow and marker durations by one tick.
    pub(crate) fn tick_statuses(&mut self) {
        self.slow_turns_remaining = self.slow_turns_remaining.saturating_sub(1);
        for marker in self.markers.iter_mut() {
            marker.turns_remaining = marker.turns_remaining.saturating_sub(1);
        }
        self.markers.retain(|m| m.turns_remaining > 0);
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn seed(name: &str, kind: CombatantKind, stats: BaseStats) -> RecordSeed {
        RecordSeed {
            definition_id: name.to_lowercase(),
            name: name.to_string(),
            kind,
            stats,
            element: Element::Wind,
            attack_type: AttackType::Melee,
            attack_range: AttackRange::Melee,
            level: 1,
            skill3_mana_cost: 100,
            skills: [
                SkillDefinition::new("Basic"),
                SkillDefinition::new("Skill"),
                SkillDefinition::new("Ultimate"),
            ],
            position: Position::ORIGIN,
        }
    }
}
