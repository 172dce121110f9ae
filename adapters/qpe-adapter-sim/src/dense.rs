//! Reference simulator that builds the full 2^n × 2^n operator per gate.
//!
//! Exponentially slower than [`Statevector`](crate::Statevector); it exists
//! to cross-check the index-arithmetic kernels.

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use qpe_ir::{Gate, QubitId};

use crate::error::SimResult;
use crate::simulator::{StateSimulator, check_operands, validate_amplitudes};

/// Statevector evolved by explicit matrix-vector products.
#[derive(Debug, Clone)]
pub struct DenseStatevector {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl DenseStatevector {
    /// |0...0⟩ on `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Wrap explicit unit-norm amplitudes.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> SimResult<Self> {
        let num_qubits = validate_amplitudes(&amplitudes)?;
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Full-register operator of `gate` on `targets` under `controls`.
    ///
    /// Columns whose control bits are not all set map to themselves; the
    /// rest mix only among indices that differ in target bits.
    pub fn operator(
        &self,
        gate: &Gate,
        controls: &[QubitId],
        targets: &[QubitId],
    ) -> SimResult<Array2<Complex64>> {
        check_operands(self.num_qubits, gate, controls, targets)?;
        let dim = 1 << self.num_qubits;
        let local = gate.matrix();
        let ctrl_mask = controls.iter().fold(0, |m, q| m | (1 << q.index()));
        let k = targets.len();

        // Local index of a global basis state: targets[0] is the MSB.
        let local_of = |i: usize| -> usize {
            targets
                .iter()
                .fold(0, |acc, q| (acc << 1) | ((i >> q.index()) & 1))
        };
        let with_local = |i: usize, l: usize| -> usize {
            targets.iter().enumerate().fold(i, |acc, (t, q)| {
                let bit = (l >> (k - 1 - t)) & 1;
                (acc & !(1 << q.index())) | (bit << q.index())
            })
        };

        let mut op = Array2::<Complex64>::zeros((dim, dim));
        for col in 0..dim {
            if col & ctrl_mask != ctrl_mask {
                op[[col, col]] = Complex64::new(1.0, 0.0);
                continue;
            }
            let lc = local_of(col);
            for lr in 0..(1 << k) {
                op[[with_local(col, lr), col]] = local[[lr, lc]];
            }
        }
        Ok(op)
    }
}

impl StateSimulator for DenseStatevector {
    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    fn apply_gate(
        &mut self,
        gate: &Gate,
        controls: &[QubitId],
        targets: &[QubitId],
    ) -> SimResult<()> {
        let op = self.operator(gate, controls, targets)?;
        let psi = Array1::from_vec(std::mem::take(&mut self.amplitudes));
        self.amplitudes = op.dot(&psi).to_vec();
        Ok(())
    }
}
