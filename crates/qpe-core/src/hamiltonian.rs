//! Hermitian Hamiltonians and their time evolution.
//!
//! A Hamiltonian H evolves for a duration T into the unitary U = exp(iHT).
//! An eigenvector of H with eigenvalue λ is an eigenvector of U with phase
//! λT/2π, which is what phase estimation reads out.
//!
//! # Example
//!
//! ```rust
//! use qpe_core::{Hamiltonian, PauliOp};
//!
//! // H = 0.5·Z + 0.3·X
//! let h = Hamiltonian::from_terms(&[(0.5, PauliOp::Z), (0.3, PauliOp::X)]);
//! let eigenvalues = h.eigenvalues().unwrap();
//! let expected = (0.5f64 * 0.5 + 0.3 * 0.3).sqrt();
//! assert!((eigenvalues[0] + expected).abs() < 1e-12);
//! assert!((eigenvalues[1] - expected).abs() < 1e-12);
//! ```

use ndarray::{Array2, array};
use num_complex::Complex64;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use qpe_linalg::{HermitianEigen, eigh, hermiticity_deviation, random_hermitian, unitary_evolution};

use crate::error::{QpeError, QpeResult};

/// Accepted max |H − H†| for a matrix to count as Hermitian.
const HERMITIAN_TOLERANCE: f64 = 1e-10;

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauliOp {
    /// Identity.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

impl PauliOp {
    /// 2×2 matrix of this operator.
    pub fn matrix(self) -> Array2<Complex64> {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let i = Complex64::new(0.0, 1.0);
        match self {
            PauliOp::I => array![[one, zero], [zero, one]],
            PauliOp::X => array![[zero, one], [one, zero]],
            PauliOp::Y => array![[zero, -i], [i, zero]],
            PauliOp::Z => array![[one, zero], [zero, -one]],
        }
    }
}

/// A validated Hermitian matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Hamiltonian {
    matrix: Array2<Complex64>,
}

impl Hamiltonian {
    /// Wrap a matrix, rejecting non-square or non-Hermitian input.
    pub fn from_matrix(matrix: Array2<Complex64>) -> QpeResult<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols || rows == 0 {
            return Err(qpe_linalg::LinalgError::NotSquare { rows, cols }.into());
        }
        let deviation = hermiticity_deviation(&matrix);
        if deviation > HERMITIAN_TOLERANCE {
            return Err(QpeError::NotHermitian { deviation });
        }
        Ok(Self { matrix })
    }

    /// Single-qubit Hamiltonian c_i·I + c_x·X + c_y·Y + c_z·Z.
    pub fn from_pauli(c_i: f64, c_x: f64, c_y: f64, c_z: f64) -> Self {
        Self::from_terms(&[
            (c_i, PauliOp::I),
            (c_x, PauliOp::X),
            (c_y, PauliOp::Y),
            (c_z, PauliOp::Z),
        ])
    }

    /// Weighted sum of single-qubit Pauli operators.
    pub fn from_terms(terms: &[(f64, PauliOp)]) -> Self {
        let matrix = terms
            .iter()
            .fold(Array2::<Complex64>::zeros((2, 2)), |acc, &(c, op)| {
                acc + op.matrix().mapv(|z| z * c)
            });
        Self { matrix }
    }

    /// Random Hermitian with Gaussian entries of width `scale`.
    pub fn random<R: Rng + ?Sized>(dim: usize, scale: f64, rng: &mut R) -> Self {
        Self {
            matrix: random_hermitian(dim, scale, rng),
        }
    }

    /// The matrix.
    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }

    /// Hilbert-space dimension.
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Eigenvalues (ascending) and eigenvectors.
    pub fn eigen(&self) -> QpeResult<HermitianEigen> {
        Ok(eigh(&self.matrix)?)
    }

    /// Eigenvalues in ascending order.
    pub fn eigenvalues(&self) -> QpeResult<Vec<f64>> {
        Ok(self.eigen()?.values.to_vec())
    }

    /// exp(iHT).
    pub fn evolution(&self, duration: f64) -> QpeResult<Array2<Complex64>> {
        if !duration.is_finite() {
            return Err(QpeError::InvalidDuration(duration));
        }
        Ok(unitary_evolution(&self.matrix, duration)?)
    }

    /// Longest T with |λT| < 2π for every eigenvalue, i.e. 2π / max|λ|.
    ///
    /// Infinite for the zero Hamiltonian.
    pub fn max_safe_duration(&self) -> QpeResult<f64> {
        let radius = self
            .eigenvalues()?
            .iter()
            .fold(0.0_f64, |m, l| m.max(l.abs()));
        Ok(if radius == 0.0 { f64::INFINITY } else { TAU / radius })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use qpe_linalg::is_unitary;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_pauli_spectrum() {
        let h = Hamiltonian::from_pauli(0.5, 0.0, 0.0, 1.0);
        let values = h.eigenvalues().unwrap();
        assert_abs_diff_eq!(values[0], -0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(values[1], 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(h.max_safe_duration().unwrap(), TAU / 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_pauli_y_is_hermitian() {
        let h = Hamiltonian::from_pauli(0.0, 0.0, 0.7, 0.0);
        assert!(Hamiltonian::from_matrix(h.matrix().clone()).is_ok());
    }

    #[test]
    fn test_rejects_non_hermitian() {
        let m = array![
            [Complex64::new(1.0, 0.0), Complex64::new(1.0, 0.0)],
            [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)]
        ];
        assert!(matches!(
            Hamiltonian::from_matrix(m),
            Err(QpeError::NotHermitian { .. })
        ));
        assert!(Hamiltonian::from_matrix(Array2::zeros((2, 3))).is_err());
    }

    #[test]
    fn test_evolution_is_unitary_and_diagonal_in_eigenbasis() {
        let mut rng = StdRng::seed_from_u64(5);
        let h = Hamiltonian::random(2, 1.0, &mut rng);
        let t = 0.9;
        let u = h.evolution(t).unwrap();
        assert!(is_unitary(&u, 1e-10));

        let eig = h.eigen().unwrap();
        for i in 0..eig.len() {
            let v = eig.vector(i);
            let uv = u.dot(&v);
            let expected = Complex64::from_polar(1.0, eig.values[i] * t);
            for k in 0..v.len() {
                assert!((uv[k] - v[k] * expected).norm() < 1e-10);
            }
        }
    }

    #[test]
    fn test_zero_hamiltonian_has_unbounded_duration() {
        let h = Hamiltonian::from_pauli(0.0, 0.0, 0.0, 0.0);
        assert_eq!(h.max_safe_duration().unwrap(), f64::INFINITY);
    }
}
