//! Statevector simulation engine.
//!
//! Gates act on the amplitude array by index arithmetic: for every basis
//! index whose control bits are set and whose target bits are clear, the
//! 2^k amplitudes reachable by flipping target bits are gathered, multiplied
//! by the gate matrix and scattered back. No full operator is built.

use ndarray::Array2;
use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;

use qpe_ir::{Gate, QubitId, StandardGate};

use crate::error::SimResult;
use crate::simulator::{StateSimulator, check_operands, local_offset, validate_amplitudes};

/// A pure state of `num_qubits` qubits stored as 2^n amplitudes.
#[derive(Debug, Clone)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Wrap explicit amplitudes. The length must be a power of two and the
    /// vector must have unit norm within `1e-10`.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> SimResult<Self> {
        let num_qubits = validate_amplitudes(&amplitudes)?;
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Bit mask of the given wires.
    fn mask(qubits: &[QubitId]) -> usize {
        qubits.iter().fold(0, |m, q| m | (1 << q.index()))
    }

    // =========================================================================
    // Fast paths
    // =========================================================================

    fn apply_x(&mut self, ctrl_mask: usize, target: usize) {
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if i & ctrl_mask == ctrl_mask && i & tgt_mask == 0 {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    fn apply_h(&mut self, ctrl_mask: usize, target: usize) {
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if i & ctrl_mask == ctrl_mask && i & tgt_mask == 0 {
                let j = i | tgt_mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = FRAC_1_SQRT_2 * (a + b);
                self.amplitudes[j] = FRAC_1_SQRT_2 * (a - b);
            }
        }
    }

    /// diag(1, e^(iθ)) on `target`, conditioned on `ctrl_mask`.
    fn apply_phase(&mut self, ctrl_mask: usize, target: usize, theta: f64) {
        let mask = ctrl_mask | (1 << target);
        let phase = Complex64::from_polar(1.0, theta);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask == mask {
                *amp *= phase;
            }
        }
    }

    fn apply_swap(&mut self, ctrl_mask: usize, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for i in 0..self.amplitudes.len() {
            if i & ctrl_mask == ctrl_mask && i & mask1 != 0 && i & mask2 == 0 {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    // =========================================================================
    // General k-target kernel
    // =========================================================================

    fn apply_matrix(&mut self, matrix: &Array2<Complex64>, ctrl_mask: usize, targets: &[QubitId]) {
        let dim = matrix.nrows();
        let tgt_mask = Self::mask(targets);
        let offsets: Vec<usize> = (0..dim).map(|l| local_offset(l, targets)).collect();
        let mut local = vec![Complex64::new(0.0, 0.0); dim];

        for base in 0..self.amplitudes.len() {
            if base & tgt_mask != 0 || base & ctrl_mask != ctrl_mask {
                continue;
            }
            for (slot, &off) in local.iter_mut().zip(&offsets) {
                *slot = self.amplitudes[base | off];
            }
            for (row, &off) in offsets.iter().enumerate() {
                self.amplitudes[base | off] =
                    (0..dim).map(|col| matrix[[row, col]] * local[col]).sum();
            }
        }
    }
}

impl StateSimulator for Statevector {
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
        check_operands(self.num_qubits, gate, controls, targets)?;
        let ctrl_mask = Self::mask(controls);

        if let Some(std_gate) = gate.as_standard() {
            if let Some(theta) = std_gate.phase_angle() {
                self.apply_phase(ctrl_mask, targets[0].index(), theta);
                return Ok(());
            }
            match std_gate {
                StandardGate::I => return Ok(()),
                StandardGate::X => {
                    self.apply_x(ctrl_mask, targets[0].index());
                    return Ok(());
                }
                StandardGate::H => {
                    self.apply_h(ctrl_mask, targets[0].index());
                    return Ok(());
                }
                StandardGate::Swap => {
                    self.apply_swap(ctrl_mask, targets[0].index(), targets[1].index());
                    return Ok(());
                }
                _ => {}
            }
        }

        self.apply_matrix(&gate.matrix(), ctrl_mask, targets);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use qpe_ir::CustomGate;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn h() -> Gate {
        Gate::standard(StandardGate::H)
    }

    fn x() -> Gate {
        Gate::standard(StandardGate::X)
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(1.0, 0.0)));
        assert!(sv.amplitudes[1..].iter().all(|a| approx_eq(*a, Complex64::new(0.0, 0.0))));
        assert!((sv.norm() - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_hadamard() {
        let mut sv = Statevector::new(1);
        sv.apply_single(&h(), QubitId(0)).unwrap();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(FRAC_1_SQRT_2, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(FRAC_1_SQRT_2, 0.0)));
    }

    #[test]
    fn test_bell_state() {
        let mut sv = Statevector::new(2);
        sv.apply_single(&h(), QubitId(0)).unwrap();
        sv.apply_controlled(&x(), &[QubitId(0)], QubitId(1)).unwrap();

        assert!(approx_eq(sv.amplitudes[0], Complex64::new(FRAC_1_SQRT_2, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(FRAC_1_SQRT_2, 0.0)));
    }

    #[test]
    fn test_controlled_phase_only_hits_11() {
        let mut sv = Statevector::new(2);
        sv.apply_single(&h(), QubitId(0)).unwrap();
        sv.apply_single(&h(), QubitId(1)).unwrap();
        sv.apply_controlled(&Gate::standard(StandardGate::P(0.7)), &[QubitId(0)], QubitId(1))
            .unwrap();
        for i in 0..3 {
            assert!(approx_eq(sv.amplitudes[i], Complex64::new(0.5, 0.0)));
        }
        assert!(approx_eq(sv.amplitudes[3], Complex64::from_polar(0.5, 0.7)));
    }

    #[test]
    fn test_swap_moves_excitation() {
        let mut sv = Statevector::new(3);
        sv.apply_single(&x(), QubitId(0)).unwrap();
        sv.apply_gate(&Gate::standard(StandardGate::Swap), &[], &[QubitId(0), QubitId(2)])
            .unwrap();
        assert!(approx_eq(sv.amplitudes[0b100], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_custom_gate_matches_fast_path() {
        let custom = Gate::custom(CustomGate::new("hx", StandardGate::H.matrix()).unwrap());
        let mut fast = Statevector::new(2);
        let mut general = Statevector::new(2);
        fast.apply_single(&x(), QubitId(1)).unwrap();
        general.apply_single(&x(), QubitId(1)).unwrap();
        fast.apply_controlled(&h(), &[QubitId(1)], QubitId(0)).unwrap();
        general.apply_controlled(&custom, &[QubitId(1)], QubitId(0)).unwrap();
        for (a, b) in fast.amplitudes.iter().zip(&general.amplitudes) {
            assert!(approx_eq(*a, *b));
        }
    }

    #[test]
    fn test_two_target_custom_gate_first_target_is_msb() {
        // |01⟩ in local order (first target = MSB) means only the second
        // target is set; SWAP must move it onto the first target.
        let swap = Gate::custom(CustomGate::new("swap_m", StandardGate::Swap.matrix()).unwrap());
        let mut sv = Statevector::new(2);
        sv.apply_single(&x(), QubitId(0)).unwrap();
        sv.apply_gate(&swap, &[], &[QubitId(1), QubitId(0)]).unwrap();
        assert!(approx_eq(sv.amplitudes[0b10], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_operand_errors() {
        let mut sv = Statevector::new(2);
        assert!(matches!(
            sv.apply_single(&h(), QubitId(5)),
            Err(SimError::QubitOutOfRange { num_qubits: 2, .. })
        ));
        assert!(matches!(
            sv.apply_controlled(&x(), &[QubitId(1)], QubitId(1)),
            Err(SimError::DuplicateQubit(QubitId(1)))
        ));
        assert!(matches!(
            sv.apply_gate(&h(), &[], &[QubitId(0), QubitId(1)]),
            Err(SimError::DimensionMismatch { expected: 4, got: 2, .. })
        ));
    }

    #[test]
    fn test_from_amplitudes_rejects_bad_input() {
        let three = vec![Complex64::new(1.0, 0.0); 3];
        assert!(matches!(
            Statevector::from_amplitudes(three),
            Err(SimError::InvalidState(_))
        ));
        let unnormalized = vec![Complex64::new(1.0, 0.0); 2];
        assert!(Statevector::from_amplitudes(unnormalized).is_err());
    }
}
