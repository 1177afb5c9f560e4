//! Observable battle events.
//!
//! The engine queues events as it mutates state; callers drain them with
//! [`crate::Battle::drain_events`] and forward them to whatever presents the
//! battle.

use crate::pool::EffectInstanceId;
use crate::state::{CombatantId, Position, Side, SkillSlot, StatusEffectKind};

/// Damage dealt per side over a battle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageTotals {
    pub allies: u64,
    pub enemies: u64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    TurnStarted {
        actor: CombatantId,
        side: Side,
        turn: u32,
        tick: u64,
    },
    ActionSelected {
        actor: CombatantId,
        slot: SkillSlot,
        skill: String,
        target: CombatantId,
    },
    DamageApplied {
        attacker: CombatantId,
        target: CombatantId,
        skill: String,
        amount: u32,
        is_crit: bool,
        hp_after: u32,
    },
    StatusApplied {
        target: CombatantId,
        effect: StatusEffectKind,
        duration: u32,
        hp_restored: u32,
    },
    CombatantDefeated {
        combatant: CombatantId,
        side: Side,
    },
    EffectSpawned {
        instance: EffectInstanceId,
        key: String,
        position: Position,
    },
    EffectReleased {
        instance: EffectInstanceId,
    },
    TurnEnded {
        actor: CombatantId,
    },
    BattleEnded {
        victory: bool,
        abandoned: bool,
        turn_count: u32,
        damage: DamageTotals,
    },
}

impl BattleEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::BattleEnded { .. })
    }
}
