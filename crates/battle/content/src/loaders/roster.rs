//! Roster loader.
//!
//! Allies and enemies share one format: an ordered list of combatant
//! definitions. Order is fielding order.

use std::collections::HashSet;
use std::path::Path;

use battle_core::CombatantDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Roster file structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterFile {
    pub combatants: Vec<CombatantDefinition>,
}

/// Loader for combatant rosters from RON files.
pub struct RosterLoader;

impl RosterLoader {
    /// Load a roster from a RON file.
    ///
    /// Ids must be unique within the file.
    pub fn load(path: &Path) -> LoadResult<Vec<CombatantDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid roster {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<Vec<CombatantDefinition>> {
        let file: RosterFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse roster RON: {}", e))?;

        let mut seen = HashSet::new();
        for definition in &file.combatants {
            if definition.id.is_empty() {
                anyhow::bail!("combatant '{}' has no id", definition.name);
            }
            if !seen.insert(definition.id.as_str()) {
                anyhow::bail!("duplicate combatant id '{}'", definition.id);
            }
        }
        Ok(file.combatants)
    }
}

#[cfg(test)]
mod tests {
    use battle_core::{Element, StatusEffectKind};

    use super::*;

    const ROSTER: &str = r#"(
        combatants: [
            (
                id: "astra",
                name: "Astra",
                element: Tide,
                stats: (max_hp: 300, attack: 40.0, speed: 110.0),
                skills: [
                    (name: "Mend", is_buff: true, status_effect: Heal, heal_multiplier: 0.3),
                    (name: "EntropicWave", is_aoe: true),
                    (name: "Undertow", damage_multiplier: 2.5),
                ],
            ),
            (id: "hugo", name: "Hugo", stats: (max_hp: 420, attack: 55.0, speed: 95.0)),
        ],
    )"#;

    #[test]
    fn parses_definitions_with_defaults() {
        let roster = RosterLoader::parse(ROSTER).unwrap();
        assert_eq!(roster.len(), 2);

        let astra = &roster[0];
        assert_eq!(astra.element, Element::Tide);
        assert_eq!(astra.stats.max_hp, 300);
        assert_eq!(astra.stats.defense, 0.0);
        assert_eq!(astra.level, 1);
        assert_eq!(astra.skills[0].status_effect, StatusEffectKind::Heal);
        assert!(astra.skills[1].is_aoe);
        assert_eq!(astra.skills[1].max_aoe_targets, 3);
        assert_eq!(astra.skills[2].damage_multiplier, 2.5);

        let hugo = &roster[1];
        assert_eq!(hugo.skill3_mana_cost, CombatantDefinition::DEFAULT_SKILL3_MANA_COST);
        assert_eq!(hugo.skills[0].damage_multiplier, 1.0);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = RosterLoader::parse(
            r#"(combatants: [(id: "a", name: "A"), (id: "a", name: "B")])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate combatant id 'a'"));
    }

    #[test]
    fn rejects_wrong_skill_count() {
        let err = RosterLoader::parse(
            r#"(combatants: [(id: "a", name: "A", skills: [(name: "Jab"), (name: "Hook")])])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("exactly three skills"));
    }

    #[test]
    fn loads_shipped_rosters() {
        let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let allies = RosterLoader::load(&data.join("allies.ron")).unwrap();
        let enemies = RosterLoader::load(&data.join("enemies.ron")).unwrap();

        assert_eq!(allies.len(), 4);
        assert_eq!(enemies.len(), 3);
        assert_eq!(allies[0].skills[1].name, "EntropicWave");
        assert!(allies[0].skills[1].is_aoe);
    }

    #[test]
    fn rejects_missing_ids() {
        assert!(RosterLoader::parse(r#"(combatants: [(name: "Nameless")])"#).is_err());
    }
}
