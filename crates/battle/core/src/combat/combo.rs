//! Battle history and combo multipliers.
//!
//! Every hit is appended to the [`BattleHistory`]. A [`ComboTable`] rule
//! matches the most recent hit against the current actor and skill and scales
//! the primary hit of the current turn.

use crate::state::{CombatantId, Side};

/// One damage application.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoryEntry {
    pub attacker: CombatantId,
    pub attacker_name: String,
    pub side: Side,
    pub skill: String,
    pub target: CombatantId,
    pub damage: u32,
}

/// Ordered log of every hit in the battle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BattleHistory {
    entries: Vec<HistoryEntry>,
}

impl BattleHistory {
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Total damage dealt by combatants of `side`.
    pub fn damage_dealt_by(&self, side: Side) -> u64 {
        self.entries
            .iter()
            .filter(|e| e.side == side)
            .map(|e| u64::from(e.damage))
            .sum()
    }
}

/// `(previous actor, previous skill, current actor, current skill) → multiplier`.
///
/// Actors are matched by display name and skills by skill name.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComboRule {
    pub previous_actor: String,
    pub previous_skill: String,
    pub current_actor: String,
    pub current_skill: String,
    pub multiplier: f64,
}

impl ComboRule {
    pub fn new(
        previous: (&str, &str),
        current: (&str, &str),
        multiplier: f64,
    ) -> Self {
        Self {
            previous_actor: previous.0.to_string(),
            previous_skill: previous.1.to_string(),
            current_actor: current.0.to_string(),
            current_skill: current.1.to_string(),
            multiplier,
        }
    }

    fn matches(&self, previous: &HistoryEntry, actor: &str, skill: &str) -> bool {
        self.previous_actor == previous.attacker_name
            && self.previous_skill == previous.skill
            && self.current_actor == actor
            && self.current_skill == skill
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComboTable {
    rules: Vec<ComboRule>,
}

impl ComboTable {
    pub fn new(rules: Vec<ComboRule>) -> Self {
        Self { rules }
    }

    /// The shipped combo: Astra's Entropic Wave followed by Hugo's
    /// Cataclysmic Blow.
    pub fn standard() -> Self {
        Self::new(vec![ComboRule::new(
            ("Astra", "EntropicWave"),
            ("Hugo", "Cataclysmic Blow"),
            1.2,
        )])
    }

    pub fn insert(&mut self, rule: ComboRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[ComboRule] {
        &self.rules
    }

    /// Multiplier for `actor` using `skill` right after `previous`; 1.0 when
    /// no rule matches.
    pub fn multiplier(&self, previous: Option<&HistoryEntry>, actor: &str, skill: &str) -> f64 {
        previous
            .and_then(|prev| self.rules.iter().find(|r| r.matches(prev, actor, skill)))
            .map_or(1.0, |r| r.multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, skill: &str, side: Side, damage: u32) -> HistoryEntry {
        HistoryEntry {
            attacker: CombatantId(0),
            attacker_name: name.to_string(),
            side,
            skill: skill.to_string(),
            target: CombatantId(4),
            damage,
        }
    }

    #[test]
    fn standard_combo_matches_only_the_exact_sequence() {
        let table = ComboTable::standard();
        let wave = entry("Astra", "EntropicWave", Side::Ally, 10);

        assert_eq!(table.multiplier(Some(&wave), "Hugo", "Cataclysmic Blow"), 1.2);
        assert_eq!(table.multiplier(Some(&wave), "Hugo", "Slash"), 1.0);
        assert_eq!(table.multiplier(None, "Hugo", "Cataclysmic Blow"), 1.0);

        let other = entry("Astra", "Spark", Side::Ally, 10);
        assert_eq!(table.multiplier(Some(&other), "Hugo", "Cataclysmic Blow"), 1.0);
    }

    #[test]
    fn table_is_extensible() {
        let mut table = ComboTable::default();
        table.insert(ComboRule::new(("Mira", "Frost"), ("Kade", "Shatter"), 1.5));
        let frost = entry("Mira", "Frost", Side::Ally, 5);
        assert_eq!(table.multiplier(Some(&frost), "Kade", "Shatter"), 1.5);
    }

    #[test]
    fn history_totals_by_side() {
        let mut history = BattleHistory::default();
        history.record(entry("Hugo", "Slash", Side::Ally, 40));
        history.record(entry("Goblin", "Bite", Side::Enemy, 12));
        history.record(entry("Astra", "Spark", Side::Ally, 2));

        assert_eq!(history.damage_dealt_by(Side::Ally), 42);
        assert_eq!(history.damage_dealt_by(Side::Enemy), 12);
        assert_eq!(history.last().unwrap().attacker_name, "Astra");
    }
}
