//! Status effect application and per-tick duration bookkeeping.
//!
//! Freeze and Slow write the slow fields the scheduler reads; Heal restores
//! HP immediately; `None` nudges the target's action value. Shield, Panic and
//! Burn are recorded as markers and only count down.

use tracing::debug;

use crate::config::BattleConfig;
use crate::state::{CombatantId, CombatantRecord, SkillDefinition, StatusEffectKind};

/// Result of applying one status effect.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusApplication {
    pub target: CombatantId,
    pub effect: StatusEffectKind,
    pub duration: u32,
    /// HP actually restored by a Heal.
    pub hp_restored: u32,
    /// Requested action value change before slow scaling.
    pub action_value_shift: f64,
}

/// Applies status effects using the battle's tuning values.
#[derive(Clone, Copy, Debug)]
pub struct StatusEffectEngine {
    freeze_slow_amount: f64,
    turn_threshold: f64,
    advance_fraction: f64,
}

impl StatusEffectEngine {
    pub fn new(config: &BattleConfig) -> Self {
        Self {
            freeze_slow_amount: config.freeze_slow_amount,
            turn_threshold: config.turn_threshold,
            advance_fraction: config.action_advance_fraction,
        }
    }

    /// The `amount` argument a skill passes for its own status effect.
    pub fn amount_for(skill: &SkillDefinition) -> f64 {
        match skill.status_effect {
            StatusEffectKind::Slow => skill.slow_amount,
            StatusEffectKind::Heal => skill.heal_multiplier,
            StatusEffectKind::Shield => skill.shield_amount,
            _ => 0.0,
        }
    }

    /// Applies `effect` to `target`.
    ///
    /// `amount` is the slow factor for Slow, the max-HP multiplier for Heal
    /// and the shield value for Shield; other effects ignore it.
    pub fn apply(
        &self,
        target: &mut CombatantRecord,
        effect: StatusEffectKind,
        duration: u32,
        amount: f64,
    ) -> StatusApplication {
        let mut application = StatusApplication {
            target: target.id(),
            effect,
            duration,
            hp_restored: 0,
            action_value_shift: 0.0,
        };

        match effect {
            StatusEffectKind::Freeze => target.apply_slow(self.freeze_slow_amount, duration),
            StatusEffectKind::Slow => target.apply_slow(amount, duration),
            StatusEffectKind::Heal => {
                let amount = (target.max_hp() as f64 * amount).round_ties_even().max(0.0) as u32;
                application.hp_restored = target.heal(amount);
            }
            StatusEffectKind::None => {
                let shift = -(self.turn_threshold / target.speed()) * self.advance_fraction;
                target.advance_action_value(shift);
                application.action_value_shift = shift;
            }
            StatusEffectKind::Shield | StatusEffectKind::Panic | StatusEffectKind::Burn => {
                if !target.add_marker(effect, duration) {
                    debug!(
                        target: "battle::status",
                        combatant = %target.id(),
                        ?effect,
                        "status marker list full, effect dropped"
                    );
                }
            }
        }

        debug!(
            target: "battle::status",
            combatant = %target.id(),
            ?effect,
            duration,
            amount,
            hp_restored = application.hp_restored,
            "status applied"
        );
        application
    }

    /// Counts down the target's timed statuses by one tick.
    pub fn update_status(&self, target: &mut CombatantRecord) {
        target.tick_statuses();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{BaseStats, CombatantKind, fixtures};

    fn record(max_hp: u32, speed: f64) -> CombatantRecord {
        let stats = BaseStats {
            max_hp,
            speed,
            ..BaseStats::default()
        };
        CombatantRecord::new(
            CombatantId(2),
            fixtures::seed("Astra", CombatantKind::Ally, stats),
        )
    }

    fn engine() -> StatusEffectEngine {
        StatusEffectEngine::new(&BattleConfig::default())
    }

    #[test]
    fn heal_rounds_and_clamps_to_max_hp() {
        let mut target = record(200, 100.0);
        target.take_damage(120);

        let applied = engine().apply(&mut target, StatusEffectKind::Heal, 0, 0.3);
        assert_eq!(applied.hp_restored, 60);
        assert_eq!(target.current_hp(), 140);

        let applied = engine().apply(&mut target, StatusEffectKind::Heal, 0, 0.5);
        assert_eq!(applied.hp_restored, 60);
        assert_eq!(target.current_hp(), 200);
    }

    #[test]
    fn freeze_uses_configured_slow_amount() {
        let mut target = record(100, 100.0);
        engine().apply(&mut target, StatusEffectKind::Freeze, 2, 0.7);
        assert_eq!(target.slow_amount(), BattleConfig::DEFAULT_FREEZE_SLOW_AMOUNT);
        assert_eq!(target.slow_turns_remaining(), 2);
    }

    #[test]
    fn slow_expires_after_its_duration() {
        let engine = engine();
        let mut target = record(100, 100.0);
        engine.apply(&mut target, StatusEffectKind::Slow, 2, 0.7);
        assert!(target.is_slowed());

        engine.update_status(&mut target);
        assert_eq!(target.slow_turns_remaining(), 1);
        engine.update_status(&mut target);
        engine.update_status(&mut target);
        assert_eq!(target.slow_turns_remaining(), 0);
        assert!(!target.is_slowed());
    }

    #[test]
    fn none_moves_action_value_by_speed_fraction() {
        let mut target = record(100, 100.0);
        target.set_action_value(500.0);
        let applied = engine().apply(&mut target, StatusEffectKind::None, 0, 0.0);
        assert_eq!(applied.action_value_shift, -30.0);
        assert_eq!(target.action_value(), 470.0);
    }

    #[test]
    fn placeholders_only_record_markers() {
        let mut target = record(100, 100.0);
        let before = target.clone();
        engine().apply(&mut target, StatusEffectKind::Shield, 3, 50.0);

        assert_eq!(target.current_hp(), before.current_hp());
        assert_eq!(target.slow_turns_remaining(), 0);
        assert_eq!(target.markers().len(), 1);
        assert_eq!(target.markers()[0].kind, StatusEffectKind::Shield);
    }
}
