//! Error types for phase estimation.

use qpe_adapter_sim::SimError;
use qpe_ir::IrError;
use qpe_linalg::LinalgError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while building or running a phase-estimation
/// experiment.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QpeError {
    /// Circuit construction failed.
    #[error(transparent)]
    Ir(#[from] IrError),

    /// A linear-algebra routine failed.
    #[error(transparent)]
    Linalg(#[from] LinalgError),

    /// Simulation failed.
    #[error(transparent)]
    Sim(#[from] SimError),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A constructed operator failed its unitarity check.
    #[error("Operator is not unitary: ‖U†U − I‖ = {deviation:e} (tolerance {tolerance:e})")]
    Construction {
        /// Frobenius norm of U†U − I.
        deviation: f64,
        /// Configured tolerance.
        tolerance: f64,
    },

    /// Eigenpairs handed to the factory are inconsistent.
    #[error("Invalid eigenpairs: {0}")]
    InvalidEigenpairs(String),

    /// The single-step wrap left a phase outside [0, 1).
    #[error("Phase {raw} needs more than one wrap step (got {wrapped}); keep |λT| below 2π")]
    PhaseWrapBoundary {
        /// λT / 2π before wrapping.
        raw: f64,
        /// Result of the single step.
        wrapped: f64,
    },

    /// Matrix given as a Hamiltonian is not Hermitian.
    #[error("Hamiltonian is not Hermitian (max |H − H†| = {deviation:e})")]
    NotHermitian {
        /// Largest elementwise deviation.
        deviation: f64,
    },

    /// The circuit builder only drives single-qubit system registers.
    #[error("Target unitary must be 2x2, got {rows}x{cols}")]
    UnsupportedUnitary {
        /// Rows.
        rows: usize,
        /// Columns.
        cols: usize,
    },

    /// Estimation-register width out of range.
    #[error("Estimation register must have between 1 and {max} wires, got {requested}")]
    InvalidEstimationWires {
        /// Requested width.
        requested: u32,
        /// Largest width accepted.
        max: u32,
    },

    /// Probabilities do not form a distribution.
    #[error("Invalid distribution: {0}")]
    InvalidDistribution(String),

    /// Requested initial system state is unusable.
    #[error("Invalid system state: {0}")]
    InvalidState(String),

    /// Evolution time must be positive and finite.
    #[error("Duration must be positive and finite, got {0}")]
    InvalidDuration(f64),

    /// Non-finite eigenvalue or phase.
    #[error("Non-finite value: {0}")]
    NonFinite(f64),
}

/// Result type for phase-estimation operations.
pub type QpeResult<T> = Result<T, QpeError>;
