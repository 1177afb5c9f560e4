use crate::combat::DamageBranch;
use crate::pool::EffectInstanceId;
use crate::state::{CombatantId, Side, SkillSlot};
use crate::status::StatusApplication;

/// Which side a skill's targets are drawn from, relative to the caster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetClass {
    /// The caster's own side (buff and support skills).
    Allies,
    /// The opposing side.
    Opponents,
}

impl TargetClass {
    pub fn side_for(self, caster: Side) -> Side {
        match self {
            Self::Allies => caster,
            Self::Opponents => caster.opponent(),
        }
    }
}

/// Offered to the caster after a skill is chosen.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetRequest {
    pub actor: CombatantId,
    pub slot: SkillSlot,
    pub class: TargetClass,
    /// Living combatants that may be chosen, in registration order.
    pub candidates: Vec<CombatantId>,
    /// Target used when no explicit choice is made.
    pub default_target: Option<CombatantId>,
}

/// A turn whose action and primary target are locked in.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnPlan {
    pub actor: CombatantId,
    pub slot: SkillSlot,
    pub skill: String,
    pub is_buff: bool,
    pub primary: CombatantId,
    /// The caster closes in on the target before the hit lands.
    pub requires_movement: bool,
    pub animation_secs: f64,
}

/// Damage dealt to one target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRecord {
    pub target: CombatantId,
    pub amount: u32,
    pub is_crit: bool,
    pub branch: DamageBranch,
    pub hp_after: u32,
}

/// Everything a resolved turn changed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnOutcome {
    pub actor: CombatantId,
    pub slot: SkillSlot,
    pub skill: String,
    pub primary: CombatantId,
    pub secondaries: Vec<CombatantId>,
    pub damage: Vec<DamageRecord>,
    pub statuses: Vec<StatusApplication>,
    pub effects: Vec<EffectInstanceId>,
    pub combo_multiplier: f64,
    pub defeated: Vec<CombatantId>,
}

impl TurnOutcome {
    pub fn total_damage(&self) -> u64 {
        self.damage.iter().map(|d| u64::from(d.amount)).sum()
    }

    pub fn damage_to(&self, target: CombatantId) -> Option<&DamageRecord> {
        self.damage.iter().find(|d| d.target == target)
    }
}
