//! Skill definitions and the three action slots every combatant carries.

use super::Element;

/// One of the three action slots.
///
/// External input addresses slots by index (0, 1, 2); use
/// [`SkillSlot::from_index`] to validate it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillSlot {
    /// Slot 0. Always affordable, builds skill charge.
    Basic,
    /// Slot 1. Allies need a full skill charge.
    Skill,
    /// Slot 2. Needs a full mana bar.
    Ultimate,
}

impl SkillSlot {
    pub const ALL: [Self; 3] = [Self::Basic, Self::Skill, Self::Ultimate];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Basic),
            1 => Some(Self::Skill),
            2 => Some(Self::Ultimate),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Basic => 0,
            Self::Skill => 1,
            Self::Ultimate => 2,
        }
    }
}

/// Status effects a skill may apply.
///
/// Shield, Panic and Burn are recorded on the target with their duration but
/// have no mechanical effect yet.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusEffectKind {
    /// No lingering effect. On a buff skill this advances the target's turn.
    #[default]
    None,
    Freeze,
    Burn,
    Slow,
    Panic,
    Heal,
    Shield,
}

impl StatusEffectKind {
    /// Effects that are stored for bookkeeping only.
    pub const fn is_placeholder(self) -> bool {
        matches!(self, Self::Burn | Self::Panic | Self::Shield)
    }
}

/// Where a skill's visual effect spawns for ranged casters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectType {
    /// On the target.
    #[default]
    Static,
    /// At the caster, travelling towards the target.
    Projectile,
    /// Above the target, falling onto it.
    FromAbove,
}

/// Static description of one skill.
///
/// Exactly one damage branch applies, chosen from the multiplier fields (see
/// [`crate::combat::DamageBranch::of`]).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkillDefinition {
    pub name: String,
    pub damage_multiplier: f64,
    pub dot_multiplier: f64,
    pub break_base: f64,
    pub break_scaling: f64,
    pub weakness_type_bonus: f64,
    pub element: Element,
    pub is_aoe: bool,
    /// Total targets hit including the primary.
    pub max_aoe_targets: usize,
    pub aoe_damage_reduction: f64,
    pub is_buff: bool,
    pub status_effect: StatusEffectKind,
    pub status_duration: u32,
    pub slow_amount: f64,
    pub heal_multiplier: f64,
    pub shield_amount: f64,

    // ===== presentation hints =====
    /// Pool key of the visual effect spawned on hit.
    pub effect_key: Option<String>,
    pub effect_type: EffectType,
    pub effect_height_offset: f64,
    /// Interpolation factor between caster and target for melee effects.
    pub effect_distance_offset: f64,
    pub effect_above_height: f64,
    /// The caster walks up to the target before striking.
    pub has_movement: bool,
    /// Length of the cast animation in seconds, used for hit pacing.
    pub animation_secs: f64,
}

impl SkillDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Number of secondary targets an AoE hit may reach.
    pub fn secondary_target_count(&self) -> usize {
        if self.is_aoe {
            self.max_aoe_targets.saturating_sub(1)
        } else {
            0
        }
    }
}

impl Default for SkillDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            damage_multiplier: 1.0,
            dot_multiplier: 0.0,
            break_base: 0.0,
            break_scaling: 0.0,
            weakness_type_bonus: 1.0,
            element: Element::default(),
            is_aoe: false,
            max_aoe_targets: 3,
            aoe_damage_reduction: 0.5,
            is_buff: false,
            status_effect: StatusEffectKind::None,
            status_duration: 0,
            slow_amount: 0.7,
            heal_multiplier: 0.0,
            shield_amount: 0.0,
            effect_key: None,
            effect_type: EffectType::Static,
            effect_height_offset: 1.0,
            effect_distance_offset: 1.0,
            effect_above_height: 5.0,
            has_movement: false,
            animation_secs: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_index_round_trip_rejects_out_of_range() {
        for slot in SkillSlot::ALL {
            assert_eq!(SkillSlot::from_index(slot.index()), Some(slot));
        }
        assert_eq!(SkillSlot::from_index(3), None);
    }

    #[test]
    fn single_target_skill_has_no_secondaries() {
        let mut skill = SkillDefinition::new("Slash");
        assert_eq!(skill.secondary_target_count(), 0);
        skill.is_aoe = true;
        assert_eq!(skill.secondary_target_count(), 2);
        skill.max_aoe_targets = 0;
        assert_eq!(skill.secondary_target_count(), 0);
    }
}
