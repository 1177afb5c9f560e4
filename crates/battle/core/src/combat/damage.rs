//! Damage calculation.
//!
//! Every skill resolves through exactly one branch:
//!
//! ```text
//! direct = atk × mult × crit × (1 + bonus + eb) × (1 + vuln + eb)
//!          × (1 − res × ef) × atk / (atk + def) × aoe
//! dot    = atk × dot_mult × (1 + bonus + eb) × (1 + vuln + eb) × (1 − res × ef) × aoe
//! break  = (break_base × (1 + level × 0.05) + atk × break_scaling)
//!          × weakness_bonus × elemental_modifier × aoe
//! ```
//!
//! Results are rounded half-to-even and floored at zero.

use super::ElementalAdvantage;
use crate::config::BattleConfig;
use crate::state::{CombatantRecord, SkillDefinition};

/// Which damage formula a skill uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageBranch {
    Direct,
    DamageOverTime,
    Break,
}

impl DamageBranch {
    /// DoT wins when its multiplier is positive, then break; otherwise direct.
    pub fn of(skill: &SkillDefinition) -> Self {
        if skill.dot_multiplier > 0.0 {
            Self::DamageOverTime
        } else if skill.break_base > 0.0 {
            Self::Break
        } else {
            Self::Direct
        }
    }
}

/// Attacker-side inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackerProfile {
    pub attack: f64,
    pub crit_rate: f64,
    pub crit_dmg: f64,
    pub bonus_dmg: f64,
    pub level: u32,
}

impl AttackerProfile {
    pub fn of(record: &CombatantRecord, config: &BattleConfig) -> Self {
        let (crit_rate, crit_dmg) = record.crit_profile(config);
        Self {
            attack: record.stats().attack,
            crit_rate,
            crit_dmg,
            bonus_dmg: record.stats().bonus_dmg,
            level: record.level(),
        }
    }
}

/// Defender-side inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DefenderProfile {
    pub defense: f64,
    pub vulnerability: f64,
    pub resistance: f64,
}

impl DefenderProfile {
    pub fn of(record: &CombatantRecord) -> Self {
        Self {
            defense: record.stats().defense,
            vulnerability: record.stats().vulnerability,
            resistance: record.stats().resistance,
        }
    }
}

/// Per-hit context.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitContext {
    pub advantage: ElementalAdvantage,
    pub is_primary: bool,
    /// Uniform roll in `[0, 1)` compared against the crit rate.
    pub crit_roll: f64,
}

/// Computed damage for one target.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRoll {
    pub amount: u32,
    pub is_crit: bool,
    pub branch: DamageBranch,
}

/// Rounds half-to-even and floors at zero.
pub fn round_damage(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    value.round_ties_even() as u32
}

pub fn calculate_damage(
    attacker: &AttackerProfile,
    defender: &DefenderProfile,
    skill: &SkillDefinition,
    hit: &HitContext,
    config: &BattleConfig,
) -> DamageRoll {
    let aoe = if hit.is_primary {
        1.0
    } else {
        1.0 - skill.aoe_damage_reduction
    };
    let eb = hit.advantage.bonus;
    let amplified = (1.0 + attacker.bonus_dmg + eb)
        * (1.0 + defender.vulnerability + eb)
        * (1.0 - defender.resistance * hit.advantage.resistance_factor);

    let branch = DamageBranch::of(skill);
    let (raw, is_crit) = match branch {
        DamageBranch::Direct => {
            let is_crit = hit.crit_roll < attacker.crit_rate;
            let crit = if is_crit { 1.0 + attacker.crit_dmg } else { 1.0 };
            let mitigation = if attacker.attack + defender.defense > 0.0 {
                attacker.attack / (attacker.attack + defender.defense)
            } else {
                0.0
            };
            let raw =
                attacker.attack * skill.damage_multiplier * crit * amplified * mitigation * aoe;
            (raw, is_crit)
        }
        DamageBranch::DamageOverTime => {
            (attacker.attack * skill.dot_multiplier * amplified * aoe, false)
        }
        DamageBranch::Break => {
            let level = 1.0 + attacker.level as f64 * config.break_level_scaling;
            let raw = (skill.break_base * level + attacker.attack * skill.break_scaling)
                * skill.weakness_type_bonus
                * hit.advantage.modifier
                * aoe;
            (raw, false)
        }
    };

    DamageRoll {
        amount: round_damage(raw),
        is_crit,
        branch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_CRIT: f64 = 0.999;

    fn attacker(attack: f64) -> AttackerProfile {
        AttackerProfile {
            attack,
            crit_rate: 0.0,
            crit_dmg: 0.5,
            bonus_dmg: 0.0,
            level: 1,
        }
    }

    fn defender(defense: f64) -> DefenderProfile {
        DefenderProfile {
            defense,
            vulnerability: 0.0,
            resistance: 0.0,
        }
    }

    fn hit(is_primary: bool) -> HitContext {
        HitContext {
            advantage: ElementalAdvantage::NEUTRAL,
            is_primary,
            crit_roll: NO_CRIT,
        }
    }

    #[test]
    fn branch_selection_prefers_dot_then_break() {
        let mut skill = SkillDefinition::new("x");
        assert_eq!(DamageBranch::of(&skill), DamageBranch::Direct);
        skill.break_base = 10.0;
        assert_eq!(DamageBranch::of(&skill), DamageBranch::Break);
        skill.dot_multiplier = 0.4;
        assert_eq!(DamageBranch::of(&skill), DamageBranch::DamageOverTime);
    }

    #[test]
    fn direct_damage_applies_defense_mitigation() {
        let config = BattleConfig::default();
        let skill = SkillDefinition::new("Strike");
        let roll = calculate_damage(&attacker(50.0), &defender(10.0), &skill, &hit(true), &config);
        // 50 × 50 / 60 = 41.67
        assert_eq!(roll.amount, 42);
        assert!(!roll.is_crit);
        assert_eq!(roll.branch, DamageBranch::Direct);
    }

    #[test]
    fn direct_damage_crits_below_rate() {
        let config = BattleConfig::default();
        let skill = SkillDefinition::new("Strike");
        let mut profile = attacker(100.0);
        profile.crit_rate = 0.5;
        let crit_hit = HitContext {
            crit_roll: 0.1,
            ..hit(true)
        };
        let roll = calculate_damage(&profile, &defender(0.0), &skill, &crit_hit, &config);
        assert!(roll.is_crit);
        assert_eq!(roll.amount, 150);
    }

    #[test]
    fn advantage_raises_direct_damage() {
        let config = BattleConfig::default();
        let skill = SkillDefinition::new("Gust");
        let mut profile = DefenderProfile {
            resistance: 0.5,
            ..defender(0.0)
        };
        let advantaged = HitContext {
            advantage: ElementalAdvantage {
                modifier: 1.5,
                bonus: 0.5,
                resistance_factor: 0.5,
            },
            ..hit(true)
        };
        // 100 × 1.5 × 1.5 × 0.75 = 168.75
        let roll = calculate_damage(&attacker(100.0), &profile, &skill, &advantaged, &config);
        assert_eq!(roll.amount, 169);

        let roll = calculate_damage(&attacker(100.0), &profile, &skill, &hit(true), &config);
        assert_eq!(roll.amount, 50);

        profile.resistance = 0.0;
        let roll = calculate_damage(&attacker(100.0), &profile, &skill, &hit(true), &config);
        assert_eq!(roll.amount, 100);
    }

    #[test]
    fn dot_ignores_defense_and_crit() {
        let config = BattleConfig::default();
        let mut skill = SkillDefinition::new("Burn");
        skill.dot_multiplier = 0.5;
        let mut profile = attacker(80.0);
        profile.crit_rate = 1.0;
        let roll = calculate_damage(&profile, &defender(500.0), &skill, &hit(true), &config);
        assert_eq!(roll.amount, 40);
        assert!(!roll.is_crit);
    }

    #[test]
    fn break_scales_with_level_and_weakness() {
        let config = BattleConfig::default();
        let mut skill = SkillDefinition::new("Shatter");
        skill.break_base = 100.0;
        skill.break_scaling = 0.5;
        skill.weakness_type_bonus = 2.0;
        let mut profile = attacker(40.0);
        profile.level = 10;
        // (100 × 1.5 + 20) × 2 = 340
        let roll = calculate_damage(&profile, &defender(999.0), &skill, &hit(true), &config);
        assert_eq!(roll.amount, 340);
        assert_eq!(roll.branch, DamageBranch::Break);
    }

    #[test]
    fn secondary_targets_take_reduced_damage() {
        let config = BattleConfig::default();
        let mut skill = SkillDefinition::new("Wave");
        skill.is_aoe = true;
        skill.aoe_damage_reduction = 0.5;
        let primary = calculate_damage(&attacker(100.0), &defender(0.0), &skill, &hit(true), &config);
        let secondary = calculate_damage(&attacker(100.0), &defender(0.0), &skill, &hit(false), &config);
        assert_eq!(primary.amount, 100);
        assert_eq!(secondary.amount, 50);
    }

    #[test]
    fn rounding_is_half_to_even_and_non_negative() {
        assert_eq!(round_damage(2.5), 2);
        assert_eq!(round_damage(3.5), 4);
        assert_eq!(round_damage(-12.0), 0);
        assert_eq!(round_damage(f64::NAN), 0);
    }
}
