use crate::state::{
    AttackRange, AttackType, BaseStats, CombatantKind, Element, SkillDefinition,
};

/// Static definition of a combatant before equipment is applied.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatantDefinition {
    /// Stable id used to look up equipment.
    pub id: String,
    /// Display name; combo rules match on it.
    pub name: String,
    pub element: Element,
    pub attack_type: AttackType,
    pub attack_range: AttackRange,
    pub level: u32,
    pub stats: BaseStats,
    /// Mana needed for slot 2, which is also the mana cap.
    pub skill3_mana_cost: u32,
    /// Only used when the definition is fielded as an enemy.
    pub skill2_chance: f64,
    /// Basic, skill and ultimate, in slot order. Data files list them.
    #[cfg_attr(feature = "serde", serde(with = "skill_list"))]
    pub skills: [SkillDefinition; 3],
}

impl CombatantDefinition {
    pub const DEFAULT_SKILL3_MANA_COST: u32 = 100;

    pub fn new(id: impl Into<String>, name: impl Into<String>, stats: BaseStats) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stats,
            ..Self::default()
        }
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = element;
        self
    }

    pub fn with_skills(mut self, skills: [SkillDefinition; 3]) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_range(mut self, attack_type: AttackType, attack_range: AttackRange) -> Self {
        self.attack_type = attack_type;
        self.attack_range = attack_range;
        self
    }

    pub fn enemy_kind(&self) -> CombatantKind {
        CombatantKind::Enemy {
            skill2_chance: self.skill2_chance,
        }
    }
}

impl Default for CombatantDefinition {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            element: Element::default(),
            attack_type: AttackType::default(),
            attack_range: AttackRange::default(),
            level: 1,
            stats: BaseStats::default(),
            skill3_mana_cost: Self::DEFAULT_SKILL3_MANA_COST,
            skill2_chance: CombatantKind::DEFAULT_SKILL2_CHANCE,
            skills: Default::default(),
        }
    }
}

/// Reads the three skill slots from a list; any other length is an error.
#[cfg(feature = "serde")]
mod skill_list {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::state::SkillDefinition;

    pub fn serialize<S>(skills: &[SkillDefinition; 3], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        skills.as_slice().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[SkillDefinition; 3], D::Error>
    where
        D: Deserializer<'de>,
    {
        let skills = Vec::<SkillDefinition>::deserialize(deserializer)?;
        let count = skills.len();
        skills
            .try_into()
            .map_err(|_| D::Error::invalid_length(count, &"exactly three skills"))
    }
}

/// Supplies the ordered ally and enemy rosters for a battle.
pub trait RosterOracle: Send + Sync {
    fn allies(&self) -> &[CombatantDefinition];

    fn enemies(&self) -> &[CombatantDefinition];
}

/// In-memory roster.
#[derive(Clone, Debug, Default)]
pub struct RosterSnapshot {
    pub allies: Vec<CombatantDefinition>,
    pub enemies: Vec<CombatantDefinition>,
}

impl RosterSnapshot {
    pub fn new(allies: Vec<CombatantDefinition>, enemies: Vec<CombatantDefinition>) -> Self {
        Self { allies, enemies }
    }
}

impl RosterOracle for RosterSnapshot {
    fn allies(&self) -> &[CombatantDefinition] {
        &self.allies
    }

    fn enemies(&self) -> &[CombatantDefinition] {
        &self.enemies
    }
}
