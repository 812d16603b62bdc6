//! Errors raised before or instead of iterating.

use thiserror::Error;

/// Reasons a solve cannot start.
///
/// Running out of iterations is not among them: that is a
/// [`Status`](crate::Status) of a successful call.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolveError {
    /// The system has no unknowns.
    #[error("empty system: at least one equation is required")]
    EmptySystem,

    /// The coefficient matrix is not n×n.
    #[error("coefficient matrix must be square, got {rows}x{cols}")]
    NonSquare {
        /// Row count.
        rows: usize,
        /// Column count.
        cols: usize,
    },

    /// A vector does not match the matrix order.
    #[error("{what} has length {actual}, expected {expected}")]
    DimensionMismatch {
        /// Which vector is wrong.
        what: &'static str,
        /// Matrix order.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// A diagonal entry is zero, so the update for that row divides by zero.
    #[error("zero pivot on the diagonal at row {row}")]
    ZeroPivot {
        /// Zero-based row of the offending pivot.
        row: usize,
    },

    /// Dominance was required and the matrix is not strictly diagonally dominant.
    #[error("matrix is not diagonally dominant")]
    NotDiagonallyDominant,

    /// Tolerance is negative or not finite.
    #[error("tolerance must be a finite non-negative number, got {0}")]
    InvalidTolerance(f64),

    /// The iteration bound is zero.
    #[error("max iterations must be at least 1")]
    InvalidMaxIterations,
}
