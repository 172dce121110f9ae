//! Quantum gate types.

use ndarray::{Array2, array};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4};

use crate::error::{IrError, IrResult};

/// Standard gates with known semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// Phase gate diag(1, e^(iθ)).
    P(f64),
    /// SWAP gate.
    Swap,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::P(_) => "p",
            StandardGate::Swap => "swap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::Swap => 2,
            _ => 1,
        }
    }

    /// The phase angle of a diagonal `diag(1, e^(iθ))` gate, if this is one.
    ///
    /// Simulators use this to take the phase-only fast path.
    pub fn phase_angle(&self) -> Option<f64> {
        match self {
            StandardGate::Z => Some(std::f64::consts::PI),
            StandardGate::S => Some(FRAC_PI_2),
            StandardGate::Sdg => Some(-FRAC_PI_2),
            StandardGate::T => Some(FRAC_PI_4),
            StandardGate::Tdg => Some(-FRAC_PI_4),
            StandardGate::P(theta) => Some(*theta),
            _ => None,
        }
    }

    /// Dense unitary matrix of this gate.
    pub fn matrix(&self) -> Array2<Complex64> {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let i = Complex64::new(0.0, 1.0);
        if let Some(theta) = self.phase_angle() {
            return array![[one, zero], [zero, Complex64::from_polar(1.0, theta)]];
        }
        match self {
            StandardGate::X => array![[zero, one], [one, zero]],
            StandardGate::Y => array![[zero, -i], [i, zero]],
            StandardGate::H => {
                let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
                array![[h, h], [h, -h]]
            }
            StandardGate::Swap => array![
                [one, zero, zero, zero],
                [zero, zero, one, zero],
                [zero, one, zero, zero],
                [zero, zero, zero, one]
            ],
            _ => Array2::eye(2),
        }
    }
}

/// A gate, either standard or custom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    /// A standard gate with known semantics.
    Standard(StandardGate),
    /// A custom gate carrying its own matrix.
    Custom(CustomGate),
}

impl GateKind {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            GateKind::Standard(g) => g.name(),
            GateKind::Custom(g) => &g.name,
        }
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            GateKind::Standard(g) => g.num_qubits(),
            GateKind::Custom(g) => g.num_qubits,
        }
    }
}

/// A gate defined by an explicit dense matrix, such as a controlled power
/// U^(2^k) or a state-preparation unitary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomGate {
    /// The name of the gate.
    pub name: String,
    /// The number of qubits it operates on.
    pub num_qubits: u32,
    /// The unitary matrix (2^n × 2^n).
    pub matrix: Array2<Complex64>,
}

impl CustomGate {
    /// Create a custom gate from its matrix.
    ///
    /// The matrix must be square with a power-of-two dimension of at least 2.
    /// Unitarity is not checked here; the executor's normalization check
    /// catches non-unitary operators.
    pub fn new(name: impl Into<String>, matrix: Array2<Complex64>) -> IrResult<Self> {
        let name = name.into();
        let (rows, cols) = matrix.dim();
        if rows != cols || rows < 2 || !rows.is_power_of_two() {
            return Err(IrError::InvalidMatrix {
                gate_name: name,
                rows,
                cols,
            });
        }
        Ok(Self {
            name,
            num_qubits: rows.trailing_zeros(),
            matrix,
        })
    }
}

/// A gate with associated metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// The kind of gate.
    pub kind: GateKind,
    /// Optional label for the gate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Gate {
    /// Create a new gate from a standard gate.
    pub fn standard(gate: StandardGate) -> Self {
        Self {
            kind: GateKind::Standard(gate),
            label: None,
        }
    }

    /// Create a new gate from a custom gate.
    pub fn custom(gate: CustomGate) -> Self {
        Self {
            kind: GateKind::Custom(gate),
            label: None,
        }
    }

    /// Add a label to the gate.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the name of this gate.
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.kind.num_qubits()
    }

    /// Dense matrix of this gate.
    pub fn matrix(&self) -> Array2<Complex64> {
        match &self.kind {
            GateKind::Standard(g) => g.matrix(),
            GateKind::Custom(g) => g.matrix.clone(),
        }
    }

    /// The standard gate, if this is one.
    pub fn as_standard(&self) -> Option<&StandardGate> {
        match &self.kind {
            GateKind::Standard(g) => Some(g),
            GateKind::Custom(_) => None,
        }
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::standard(gate)
    }
}

impl From<CustomGate> for Gate {
    fn from(gate: CustomGate) -> Self {
        Gate::custom(gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_unitary(m: &Array2<Complex64>) -> bool {
        let dag = m.t().mapv(|x| x.conj());
        let product = dag.dot(m);
        let eye = Array2::<Complex64>::eye(m.nrows());
        product
            .iter()
            .zip(eye.iter())
            .all(|(a, b)| (a - b).norm() < 1e-12)
    }

    #[test]
    fn test_standard_gate_properties() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::Swap.num_qubits(), 2);
        assert_eq!(StandardGate::P(0.3).name(), "p");
        assert_eq!(StandardGate::T.phase_angle(), Some(FRAC_PI_4));
        assert_eq!(StandardGate::H.phase_angle(), None);
    }

    #[test]
    fn test_standard_matrices_are_unitary() {
        for gate in [
            StandardGate::I,
            StandardGate::X,
            StandardGate::Y,
            StandardGate::Z,
            StandardGate::H,
            StandardGate::S,
            StandardGate::Sdg,
            StandardGate::T,
            StandardGate::Tdg,
            StandardGate::P(1.234),
            StandardGate::Swap,
        ] {
            let m = gate.matrix();
            assert_eq!(m.nrows(), 1 << gate.num_qubits());
            assert!(is_unitary(&m), "{} is not unitary", gate.name());
        }
    }

    #[test]
    fn test_gate_creation() {
        let h = Gate::standard(StandardGate::H);
        assert_eq!(h.name(), "h");
        assert_eq!(h.num_qubits(), 1);
        assert!(h.label.is_none());

        let h_labeled = Gate::standard(StandardGate::H).with_label("superpose");
        assert_eq!(h_labeled.label, Some("superpose".to_string()));
    }

    #[test]
    fn test_custom_gate() {
        let custom = CustomGate::new("u_pow_4", Array2::eye(2)).unwrap();
        assert_eq!(custom.name, "u_pow_4");
        assert_eq!(custom.num_qubits, 1);

        let two = CustomGate::new("two", Array2::eye(4)).unwrap();
        assert_eq!(two.num_qubits, 2);
    }

    #[test]
    fn test_custom_gate_rejects_bad_shape() {
        let err = CustomGate::new("bad", Array2::zeros((2, 3))).unwrap_err();
        assert!(matches!(err, IrError::InvalidMatrix { rows: 2, cols: 3, .. }));

        let err = CustomGate::new("three", Array2::eye(3)).unwrap_err();
        assert!(matches!(err, IrError::InvalidMatrix { .. }));
    }
}
