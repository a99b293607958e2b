//! Domain error model.

use thiserror::Error;

/// Result type used across the bookkeeping core.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business failures (rejected input,
/// missing accounts, out-of-balance views). IO and persistence concerns
/// belong to the surrounding application.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input was rejected before it reached the books (unbalanced
    /// transaction, non-positive adjustment amount, ...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A query referenced an account absent from the journal.
    #[error("account not found: {0}")]
    NotFound(String),

    /// A derived view does not balance. Always surfaced with the exact
    /// discrepancy, never auto-corrected.
    #[error("{context} out of balance (discrepancy: {discrepancy})")]
    Consistency { context: String, discrepancy: i64 },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(account: impl Into<String>) -> Self {
        Self::NotFound(account.into())
    }

    pub fn consistency(context: impl Into<String>, discrepancy: i64) -> Self {
        Self::Consistency {
            context: context.into(),
            discrepancy,
        }
    }
}
