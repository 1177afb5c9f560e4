//! Combat formulas: elemental advantage, damage branches, combos and target
//! queries. Everything here is pure; the resolver applies the results.
mod combo;
mod damage;
mod element;
pub mod targeting;

pub use combo::{BattleHistory, ComboRule, ComboTable, HistoryEntry};
pub use damage::{
    AttackerProfile, DamageBranch, DamageRoll, DefenderProfile, HitContext, calculate_damage,
    round_damage,
};
pub use element::ElementalAdvantage;
