//! Phase-estimation circuit assembly.
//!
//! Register layout: the system qubit is `q0` (register `system`), the m
//! estimation qubits are `q1..=qm` (register `estimation`). The estimation
//! list is big-endian: `est[0]` is the most significant bit, so `est[j]`
//! controls U^(2^(m−1−j)).

use ndarray::{Array2, array};
use num_complex::Complex64;
use tracing::{debug, instrument};

use qpe_ir::{Circuit, CustomGate, Gate, QubitId};

use crate::error::{QpeError, QpeResult};

/// Widest estimation register the builder assembles.
pub const MAX_ESTIMATION_WIRES: u32 = 24;

/// A built circuit plus the wires needed to read it out.
#[derive(Debug, Clone)]
pub struct QpeCircuit {
    /// The gate sequence.
    pub circuit: Circuit,
    /// The system (target) wire.
    pub system: QubitId,
    /// Estimation wires, most significant first.
    pub estimation: Vec<QubitId>,
}

/// Assembles H layer, controlled power ladder and inverse QFT.
#[derive(Debug, Clone)]
pub struct QpeCircuitBuilder<'a> {
    unitary: &'a Array2<Complex64>,
    estimation_wires: u32,
    initial_state: Option<[Complex64; 2]>,
}

impl<'a> QpeCircuitBuilder<'a> {
    /// Builder for a 2×2 `unitary` with `estimation_wires` wires of precision.
    pub fn new(unitary: &'a Array2<Complex64>, estimation_wires: u32) -> Self {
        Self {
            unitary,
            estimation_wires,
            initial_state: None,
        }
    }

    /// Prepare the system wire in `a|0⟩ + b|1⟩` (normalized here) first.
    #[must_use]
    pub fn with_initial_state(mut self, amplitudes: [Complex64; 2]) -> Self {
        self.initial_state = Some(amplitudes);
        self
    }

    /// Emit the circuit.
    #[instrument(skip(self), fields(m = self.estimation_wires))]
    pub fn build(&self) -> QpeResult<QpeCircuit> {
        let (rows, cols) = self.unitary.dim();
        if (rows, cols) != (2, 2) {
            return Err(QpeError::UnsupportedUnitary { rows, cols });
        }
        let m = self.estimation_wires;
        if m == 0 || m > MAX_ESTIMATION_WIRES {
            return Err(QpeError::InvalidEstimationWires {
                requested: m,
                max: MAX_ESTIMATION_WIRES,
            });
        }

        let mut circuit = Circuit::new(format!("qpe_{m}"));
        let system = circuit.add_qreg("system", 1)[0];
        let estimation = circuit.add_qreg("estimation", m);

        if let Some(amplitudes) = self.initial_state {
            circuit.gate(state_preparation(amplitudes)?, [system])?;
        }

        for &wire in &estimation {
            circuit.h(wire)?;
        }

        // k-th least-significant wire controls U^(2^k)
        let mut power = self.unitary.clone();
        for k in 0..m {
            let control = estimation[(m - 1 - k) as usize];
            let gate = CustomGate::new(format!("u_pow_{}", 1u64 << k), power.clone())?;
            let power_gate = Gate::custom(gate).with_label(format!("U^2^{k}"));
            circuit.controlled(power_gate, [control], [system])?;
            power = power.dot(&power);
        }

        circuit.append_inverse_qft(&estimation)?;
        debug!(
            gates = circuit.len(),
            depth = circuit.depth(),
            "assembled phase-estimation circuit"
        );

        Ok(QpeCircuit {
            circuit,
            system,
            estimation,
        })
    }
}

/// Unitary whose first column is the normalized `(a, b)`:
/// `[[a, −b*], [b, a*]]`.
pub fn state_preparation(amplitudes: [Complex64; 2]) -> QpeResult<CustomGate> {
    let [a, b] = amplitudes;
    let norm = (a.norm_sqr() + b.norm_sqr()).sqrt();
    if !norm.is_finite() || norm < f64::EPSILON {
        return Err(QpeError::InvalidState(format!(
            "amplitudes ({a}, {b}) cannot be normalized"
        )));
    }
    let (a, b) = (a / norm, b / norm);
    Ok(CustomGate::new("prep", array![[a, -b.conj()], [b, a.conj()]])?)
}
