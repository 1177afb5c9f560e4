use super::TurnPhase;
use crate::error::{BattleError, ErrorSeverity};
use crate::state::{CombatantId, SkillSlot};

/// Resource a skill slot consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Resource {
    Mana,
    SkillCharge,
}

/// Errors raised while driving a turn through the resolver.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnError {
    #[error("skill index {index} is out of range")]
    UnknownSkill { index: usize },

    #[error("{slot} needs {required} {resource}, {actor} has {available}")]
    ResourceInsufficient {
        actor: CombatantId,
        slot: SkillSlot,
        resource: Resource,
        required: u32,
        available: u32,
    },

    #[error("{target} is not a valid target")]
    InvalidTarget { target: CombatantId },

    #[error("no valid target for {actor}")]
    NoValidTarget { actor: CombatantId },

    #[error("turn of {actor} is still in flight")]
    TurnInFlight { actor: CombatantId },

    #[error("no turn in flight")]
    NoTurnInFlight,

    #[error("expected phase {expected:?}, resolver is in {actual:?}")]
    InvalidPhase {
        expected: TurnPhase,
        actual: TurnPhase,
    },

    #[error("{actor} is not player-controlled")]
    NotPlayerControlled { actor: CombatantId },

    #[error("combatant {0} is not registered")]
    UnknownCombatant(CombatantId),

    #[error("battle is over")]
    BattleOver,
}

impl BattleError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        use TurnError::*;
        match self {
            ResourceInsufficient { .. } | InvalidTarget { .. } | NoValidTarget { .. } => {
                ErrorSeverity::Recoverable
            }
            UnknownSkill { .. }
            | TurnInFlight { .. }
            | NoTurnInFlight
            | InvalidPhase { .. }
            | NotPlayerControlled { .. }
            | BattleOver => ErrorSeverity::Validation,
            UnknownCombatant(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use TurnError::*;
        match self {
            UnknownSkill { .. } => "TURN_UNKNOWN_SKILL",
            ResourceInsufficient { .. } => "TURN_RESOURCE_INSUFFICIENT",
            InvalidTarget { .. } => "TURN_INVALID_TARGET",
            NoValidTarget { .. } => "TURN_NO_VALID_TARGET",
            TurnInFlight { .. } => "TURN_IN_FLIGHT",
            NoTurnInFlight => "TURN_NOT_IN_FLIGHT",
            InvalidPhase { .. } => "TURN_INVALID_PHASE",
            NotPlayerControlled { .. } => "TURN_NOT_PLAYER_CONTROLLED",
            UnknownCombatant(_) => "TURN_UNKNOWN_COMBATANT",
            BattleOver => "TURN_BATTLE_OVER",
        }
    }
}
