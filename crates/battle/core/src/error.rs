//! Common error infrastructure for battle-core.
//!
//! Domain errors (`ConfigurationError`, `TurnError`, `PoolError`,
//! `OracleError`) live next to the component that raises them. They all
//! implement [`BattleError`] so callers can classify failures uniformly.

/// How bad a failure is and whether the caller can retry.
///
/// - **Recoverable**: the caller may retry with different input
/// - **Validation**: the input is rejected and must change before retrying
/// - **Internal**: an inconsistency that indicates a bug
/// - **Fatal**: the battle cannot be set up or continued
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The caller can retry with another selection.
    ///
    /// Examples: skill not affordable yet, target no longer alive
    Recoverable,

    /// The input itself is wrong.
    ///
    /// Examples: unknown combatant id, skill index out of range
    Validation,

    /// Engine state went inconsistent.
    Internal,

    /// The battle cannot go on.
    ///
    /// Examples: missing roster, too few spawn slots
    Fatal,
}

impl ErrorSeverity {
    /// Lowercase label used in logs.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Retrying with other input may succeed.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// The failure points at a bug or broken setup.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

impl core::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common trait for all battle errors.
pub trait BattleError: core::error::Error {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a stable, machine-readable code for logs and clients.
    fn error_code(&self) -> &'static str;

    /// Retrying with other input may succeed.
    fn is_recoverable(&self) -> bool {
        self.severity().is_recoverable()
    }
}
