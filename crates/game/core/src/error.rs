//! Common error infrastructure for shadow-core.
//!
//! Domain-specific errors (e.g. [`crate::combat::ActionError`]) live next to
//! the operations they guard. This module only provides the shared
//! classification used by callers to pick a recovery strategy.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the same request may succeed later (e.g. after resting)
/// - **Validation**: the request itself is invalid and must be changed
/// - **Internal**: unexpected state inconsistency; indicates a bug
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition, e.g. not enough energy right now.
    Recoverable,

    /// Invalid input that should not be retried unchanged.
    Validation,

    /// State inconsistency that should be investigated.
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all shadow-core errors.
///
/// Implementors use `#[derive(thiserror::Error)]` for `Display`/`Error` and
/// classify severity by recoverability, not by impact.
pub trait CombatErrorKind: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for log fields and for asserting on errors in tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
