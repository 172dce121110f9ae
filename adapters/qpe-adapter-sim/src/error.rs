//! Simulator errors.

use qpe_ir::QubitId;
use thiserror::Error;

/// Errors raised while applying gates or reading out a state.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// Gate matrix dimension does not match the number of addressed targets.
    #[error("Gate '{gate}' has dimension {got} for {targets} target wire(s), expected {expected}")]
    DimensionMismatch {
        /// Gate name.
        gate: String,
        /// Number of target wires.
        targets: usize,
        /// Dimension implied by the target count.
        expected: usize,
        /// Dimension of the gate's matrix.
        got: usize,
    },

    /// Wire index outside the register.
    #[error("Qubit {qubit} is out of range for a {num_qubits}-qubit state")]
    QubitOutOfRange {
        /// Offending wire.
        qubit: QubitId,
        /// Register width.
        num_qubits: usize,
    },

    /// The same wire appears twice among the controls and targets.
    #[error("Qubit {0} is used more than once in a single operation")]
    DuplicateQubit(QubitId),

    /// Circuit is wider than the simulator accepts.
    #[error("Circuit has {requested} qubits but the simulator supports at most {max}")]
    TooManyQubits {
        /// Qubits requested.
        requested: usize,
        /// Configured ceiling.
        max: u32,
    },

    /// State norm left the accepted band after a gate.
    #[error("State norm drifted to {norm} after '{gate}' (tolerance {tolerance:e})")]
    NormalizationDrift {
        /// Gate after which the drift was detected.
        gate: String,
        /// Observed norm.
        norm: f64,
        /// Configured tolerance.
        tolerance: f64,
    },

    /// Initial amplitudes are not a valid state.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result type for simulator operations.
pub type SimResult<T> = Result<T, SimError>;
