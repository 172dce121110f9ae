//! Error types for the linear-algebra crate.

use thiserror::Error;

/// Errors produced by dense linear-algebra routines.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LinalgError {
    /// Operation requires a square matrix.
    #[error("Expected a square matrix, got {rows}x{cols}")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// Operand sizes do not agree.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        got: usize,
    },

    /// Matrix is not Hermitian within tolerance.
    #[error("Matrix is not Hermitian (max |H - H†| = {deviation:e})")]
    NotHermitian {
        /// Largest elementwise deviation from Hermiticity.
        deviation: f64,
    },

    /// Linear system is numerically singular.
    #[error("Matrix is numerically singular")]
    Singular,

    /// A vector has (numerically) zero norm and cannot be normalized.
    #[error("Cannot normalize a zero vector")]
    ZeroVector,

    /// Iterative eigensolver did not converge.
    #[error("Eigensolver did not converge within {iterations} iterations")]
    NoConvergence {
        /// Iteration cap that was reached.
        iterations: usize,
    },

    /// A vector space is too small for the requested draw.
    #[error("Dimension must be at least {min}, got {got}")]
    DimensionTooSmall {
        /// Smallest accepted dimension.
        min: usize,
        /// Dimension supplied.
        got: usize,
    },

    /// Input contains NaN or infinite entries.
    #[error("Matrix contains non-finite entries")]
    NonFinite,
}

/// Result type for linear-algebra operations.
pub type LinalgResult<T> = Result<T, LinalgError>;
