//! Battle data model: combatant records, skills and the small value types
//! they are built from.
mod combatant;
mod common;
mod element;
mod skill;

#[cfg(test)]
pub(crate) use combatant::fixtures;
pub(crate) use combatant::RecordSeed;
pub use combatant::{BaseStats, CombatantKind, CombatantRecord, StatusMarker};
pub use common::{CombatantId, Position, Rotation, Side};
pub use element::{AttackRange, AttackType, Element};
pub use skill::{EffectType, SkillDefinition, SkillSlot, StatusEffectKind};
