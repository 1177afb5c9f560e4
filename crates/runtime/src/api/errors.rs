//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, battle setup, turn resolution
//! and action providers so clients can bubble them up with consistent
//! context.
use thiserror::Error;
use tokio::sync::oneshot;

use battle_core::{BattleError, ConfigurationError, ErrorSeverity, TurnError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("action provider channel closed")]
    ActionProviderChannelClosed,

    #[error("battle worker command channel closed")]
    CommandChannelClosed,

    #[error("battle worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("battle worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires a battle setup before building")]
    MissingSetup,

    #[error("failed to set up battle")]
    Setup(#[from] ConfigurationError),

    #[error(transparent)]
    Turn(#[from] TurnError),
}

impl RuntimeError {
    /// The turn error behind this failure, if any.
    pub fn turn_error(&self) -> Option<&TurnError> {
        match self {
            Self::Turn(err) => Some(err),
            _ => None,
        }
    }

    /// True when the failed request can simply be retried with new input.
    pub fn is_recoverable(&self) -> bool {
        self.turn_error()
            .is_some_and(|err| err.severity() == ErrorSeverity::Recoverable)
    }
}
