//! Where a skill's visual effect spawns.

use crate::state::{CombatantRecord, EffectType, Position, SkillDefinition};

/// Spawn point for the effect on the primary target.
///
/// Melee casters place it between themselves and the target; ranged casters
/// follow the skill's effect type.
pub fn primary_effect_position(
    caster: &CombatantRecord,
    target: &CombatantRecord,
    skill: &SkillDefinition,
) -> Position {
    let height = skill.effect_height_offset;
    if caster.attack_range().is_melee() {
        return caster
            .position()
            .lerp(target.position(), skill.effect_distance_offset)
            .raised(height);
    }
    match skill.effect_type {
        EffectType::Projectile => caster.position().raised(height),
        EffectType::FromAbove => target
            .position()
            .raised(height + skill.effect_above_height),
        EffectType::Static => target.position().raised(height),
    }
}

/// Spawn point for the effect on a secondary AoE target.
pub fn secondary_effect_position(target: &CombatantRecord, skill: &SkillDefinition) -> Position {
    target.position().raised(skill.effect_height_offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AttackRange, BaseStats, CombatantId, CombatantKind, RecordSeed, fixtures};

    fn at(id: u32, position: Position, range: AttackRange) -> CombatantRecord {
        let stats = BaseStats {
            max_hp: 10,
            speed: 1.0,
            ..BaseStats::default()
        };
        let seed = RecordSeed {
            position,
            attack_range: range,
            ..fixtures::seed("x", CombatantKind::Ally, stats)
        };
        CombatantRecord::new(CombatantId(id), seed)
    }

    fn skill(effect_type: EffectType) -> SkillDefinition {
        SkillDefinition {
            effect_type,
            effect_height_offset: 1.0,
            effect_distance_offset: 0.5,
            effect_above_height: 5.0,
            ..SkillDefinition::new("fx")
        }
    }

    #[test]
    fn melee_effect_sits_between_caster_and_target() {
        let caster = at(0, Position::new(0.0, 0.0, 0.0), AttackRange::Melee);
        let target = at(1, Position::new(0.0, 0.0, 10.0), AttackRange::Melee);
        let pos = primary_effect_position(&caster, &target, &skill(EffectType::FromAbove));
        assert_eq!(pos, Position::new(0.0, 1.0, 5.0));
    }

    #[test]
    fn ranged_effect_follows_effect_type() {
        let caster = at(0, Position::new(0.0, 0.0, 0.0), AttackRange::Ranged);
        let target = at(1, Position::new(0.0, 0.0, 10.0), AttackRange::Melee);

        let projectile = primary_effect_position(&caster, &target, &skill(EffectType::Projectile));
        assert_eq!(projectile, Position::new(0.0, 1.0, 0.0));

        let above = primary_effect_position(&caster, &target, &skill(EffectType::FromAbove));
        assert_eq!(above, Position::new(0.0, 6.0, 10.0));

        let fixed = primary_effect_position(&caster, &target, &skill(EffectType::Static));
        assert_eq!(fixed, Position::new(0.0, 1.0, 10.0));
        assert_eq!(secondary_effect_position(&target, &skill(EffectType::Static)), fixed);
    }
}
