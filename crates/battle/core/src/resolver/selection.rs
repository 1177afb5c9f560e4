//! Skill affordability and the enemy action policy.

use super::{Resource, TurnError};
use crate::config::BattleConfig;
use crate::state::{CombatantKind, CombatantRecord, SkillSlot};

/// Checks that an ally can pay for `slot` right now.
///
/// Slot 1 needs a full skill charge and slot 2 a full mana bar; nothing is
/// consumed here.
pub fn check_affordable(record: &CombatantRecord, slot: SkillSlot) -> Result<(), TurnError> {
    let shortfall = match slot {
        SkillSlot::Basic => None,
        SkillSlot::Skill => {
            let required = u32::from(BattleConfig::SKILL_CHARGE_CAP);
            let available = u32::from(record.skill_charge());
            (available < required).then_some((Resource::SkillCharge, required, available))
        }
        SkillSlot::Ultimate => {
            let required = record.skill3_mana_cost();
            let available = record.mana();
            (available < required).then_some((Resource::Mana, required, available))
        }
    };

    match shortfall {
        None => Ok(()),
        Some((resource, required, available)) => Err(TurnError::ResourceInsufficient {
            actor: record.id(),
            slot,
            resource,
            required,
            available,
        }),
    }
}

/// Enemy policy: the ultimate when mana is full, otherwise the skill slot
/// with probability `skill2_chance`, otherwise the basic attack.
///
/// `roll` is a uniform value in `[0, 1)`.
pub fn enemy_policy(record: &CombatantRecord, roll: f64) -> SkillSlot {
    let skill2_chance = match record.kind() {
        CombatantKind::Enemy { skill2_chance } => *skill2_chance,
        CombatantKind::Ally => 0.0,
    };
    if record.mana() >= record.skill3_mana_cost() {
        SkillSlot::Ultimate
    } else if roll < skill2_chance {
        SkillSlot::Skill
    } else {
        SkillSlot::Basic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{BaseStats, CombatantId, fixtures};

    fn record(kind: CombatantKind) -> CombatantRecord {
        let stats = BaseStats {
            max_hp: 100,
            speed: 100.0,
            ..BaseStats::default()
        };
        CombatantRecord::new(CombatantId(1), fixtures::seed("Nyx", kind, stats))
    }

    #[test]
    fn basic_is_always_affordable() {
        let hero = record(CombatantKind::Ally);
        assert!(check_affordable(&hero, SkillSlot::Basic).is_ok());
    }

    #[test]
    fn skill_needs_full_charge() {
        let mut hero = record(CombatantKind::Ally);
        hero.gain_skill_charge();
        hero.gain_skill_charge();
        let err = check_affordable(&hero, SkillSlot::Skill).unwrap_err();
        assert_eq!(
            err,
            TurnError::ResourceInsufficient {
                actor: CombatantId(1),
                slot: SkillSlot::Skill,
                resource: Resource::SkillCharge,
                required: 3,
                available: 2,
            }
        );
        hero.gain_skill_charge();
        assert!(check_affordable(&hero, SkillSlot::Skill).is_ok());
    }

    #[test]
    fn ultimate_needs_full_mana() {
        let mut hero = record(CombatantKind::Ally);
        hero.gain_mana(99);
        assert!(matches!(
            check_affordable(&hero, SkillSlot::Ultimate),
            Err(TurnError::ResourceInsufficient {
                resource: Resource::Mana,
                ..
            })
        ));
        hero.gain_mana(1);
        assert!(check_affordable(&hero, SkillSlot::Ultimate).is_ok());
    }

    #[test]
    fn enemy_policy_prefers_ultimate_then_rolls_for_skill() {
        let mut foe = record(CombatantKind::Enemy { skill2_chance: 0.3 });
        assert_eq!(enemy_policy(&foe, 0.1), SkillSlot::Skill);
        assert_eq!(enemy_policy(&foe, 0.3), SkillSlot::Basic);
        assert_eq!(enemy_policy(&foe, 0.9), SkillSlot::Basic);

        foe.gain_mana(100);
        assert_eq!(enemy_policy(&foe, 0.1), SkillSlot::Ultimate);
    }
}
