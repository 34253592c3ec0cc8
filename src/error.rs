//! Error types for queryforge.

use thiserror::Error;

/// Validation failure raised while assembling a query.
///
/// Construction either succeeds and returns a fully formed immutable query,
/// or fails synchronously with one of these variants and no side effect.
/// Every variant points at a mistake in the chain that produced it, not a
/// transient condition, so callers should fix the call site rather than
/// retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `build()` was called before any table was named.
    #[error("query has no table; call from(), insert_into(), update() or delete_from() first")]
    MissingTable,

    /// A SELECT reached `build()` with an empty projection list.
    #[error("SELECT query has no projection fields; call select() first")]
    EmptyProjection,

    /// An INSERT or UPDATE reached `build()` without any column assignments.
    #[error("{kind} statement has no column assignments; call set() first")]
    NoAssignments { kind: &'static str },

    /// A required identifier was empty after trimming.
    #[error("{what} must not be empty")]
    EmptyIdentifier { what: &'static str },

    /// A numeric bound that must be non-negative was negative.
    #[error("{what} must not be negative, got {value}")]
    NegativeBound { what: &'static str, value: i64 },

    /// A BETWEEN condition carried something other than two bound values.
    #[error("BETWEEN expects exactly two values, got {got}")]
    BetweenBounds { got: usize },
}

/// Result type alias for query construction.
pub type Result<T> = std::result::Result<T, ValidationError>;
