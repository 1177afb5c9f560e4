//! Post-action resource bookkeeping.

use crate::config::BattleConfig;
use crate::state::{CombatantKind, CombatantRecord, SkillSlot};

/// Pays for and rewards the attacker's action.
///
/// Allies: basic → +mana and +1 charge; skill → +mana and charge reset;
/// ultimate → mana drained. Enemies: basic/skill → +mana and +energy;
/// ultimate → mana drained.
pub(crate) fn settle_attacker(record: &mut CombatantRecord, slot: SkillSlot, config: &BattleConfig) {
    match (*record.kind(), slot) {
        (_, SkillSlot::Ultimate) => record.drain_mana(),
        (CombatantKind::Ally, SkillSlot::Basic) => {
            record.gain_mana(config.ally_mana_gain);
            record.gain_skill_charge();
        }
        (CombatantKind::Ally, SkillSlot::Skill) => {
            record.gain_mana(config.ally_mana_gain);
            record.reset_skill_charge();
        }
        (CombatantKind::Enemy { .. }, SkillSlot::Basic | SkillSlot::Skill) => {
            record.gain_mana(config.enemy_mana_gain);
            record.gain_energy(config.enemy_energy_gain, config.energy_cap);
        }
    }
}

/// Any combatant that is hit gains mana, even from a zero-damage hit.
pub(crate) fn settle_target(record: &mut CombatantRecord, config: &BattleConfig) {
    record.gain_mana(config.target_mana_gain);
}
