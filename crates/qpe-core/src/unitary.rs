//! Unitaries with a known spectral decomposition.

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use rand::Rng;
use std::f64::consts::TAU;
use tracing::{debug, instrument};

use qpe_linalg::{
    normalize, orthogonal_unit_vector, outer, power_of_two, random_unit_vector,
    unitarity_deviation,
};

use crate::error::{QpeError, QpeResult};
use crate::hamiltonian::Hamiltonian;
use crate::phase::WrapPolicy;

/// Default accepted ‖U†U − I‖_F.
pub const DEFAULT_UNITARITY_TOLERANCE: f64 = 1e-8;

/// An eigenvector and its phase φ, meaning eigenvalue e^(2πiφ).
#[derive(Debug, Clone, PartialEq)]
pub struct Eigenpair {
    /// Phase φ.
    pub phase: f64,
    /// Unit eigenvector.
    pub vector: Array1<Complex64>,
}

impl Eigenpair {
    /// Pair a phase with a vector.
    pub fn new(phase: f64, vector: Array1<Complex64>) -> Self {
        Self { phase, vector }
    }
}

/// A unitary matrix together with its eigenpairs.
#[derive(Debug, Clone)]
pub struct PhaseUnitary {
    matrix: Array2<Complex64>,
    eigenpairs: Vec<Eigenpair>,
}

impl PhaseUnitary {
    /// The matrix U.
    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }

    /// Dimension of U.
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Phases φ_i, in eigenpair order.
    pub fn eigenphases(&self) -> Vec<f64> {
        self.eigenpairs.iter().map(|p| p.phase).collect()
    }

    /// Eigenvector `i`, if it exists.
    pub fn eigenvector(&self, i: usize) -> Option<&Array1<Complex64>> {
        self.eigenpairs.get(i).map(|p| &p.vector)
    }

    /// All eigenpairs.
    pub fn eigenpairs(&self) -> &[Eigenpair] {
        &self.eigenpairs
    }

    /// U^(2^k) by k repeated squarings.
    pub fn power_of_two(&self, k: u32) -> QpeResult<Array2<Complex64>> {
        Ok(power_of_two(&self.matrix, k)?)
    }

    /// ‖U†U − I‖_F.
    pub fn unitarity_deviation(&self) -> f64 {
        unitarity_deviation(&self.matrix)
    }

    /// U = exp(iHT) with eigenvectors of H and phases λT/2π mod 1.
    #[instrument(skip(hamiltonian), fields(dim = hamiltonian.dim()))]
    pub fn from_hamiltonian(
        hamiltonian: &Hamiltonian,
        duration: f64,
        tolerance: f64,
    ) -> QpeResult<Self> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(QpeError::InvalidDuration(duration));
        }
        let matrix = hamiltonian.evolution(duration)?;
        check_unitary(&matrix, tolerance)?;

        let eig = hamiltonian.eigen()?;
        let eigenpairs = eig
            .values
            .iter()
            .enumerate()
            .map(|(i, &lambda)| {
                let phase = WrapPolicy::Modulo.wrap(lambda * duration / TAU)?;
                Ok(Eigenpair::new(phase, eig.vector(i)))
            })
            .collect::<QpeResult<Vec<_>>>()?;
        Ok(Self { matrix, eigenpairs })
    }
}

fn check_unitary(matrix: &Array2<Complex64>, tolerance: f64) -> QpeResult<()> {
    let deviation = unitarity_deviation(matrix);
    if deviation < tolerance {
        Ok(())
    } else {
        Err(QpeError::Construction {
            deviation,
            tolerance,
        })
    }
}

/// Builds unitaries with prescribed eigenphases.
#[derive(Debug, Clone, Copy)]
pub struct UnitaryFactory {
    tolerance: f64,
}

impl Default for UnitaryFactory {
    fn default() -> Self {
        Self::new(DEFAULT_UNITARITY_TOLERANCE)
    }
}

impl UnitaryFactory {
    /// Factory that enforces ‖U†U − I‖_F < `tolerance`.
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Unitarity tolerance in use.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// A random 2×2 unitary with eigenphases `phase_a` and `phase_b`.
    ///
    /// v1 is a uniformly random unit vector and v2 a random unit vector
    /// orthogonal to it, so U = e^(2πi·a)·v1v1* + e^(2πi·b)·v2v2*.
    #[instrument(skip(self, rng))]
    pub fn build<R: Rng + ?Sized>(
        &self,
        phase_a: f64,
        phase_b: f64,
        rng: &mut R,
    ) -> QpeResult<PhaseUnitary> {
        let v1 = random_unit_vector(2, rng)?;
        let v2 = orthogonal_unit_vector(&v1, rng)?;
        self.from_eigenpairs(vec![Eigenpair::new(phase_a, v1), Eigenpair::new(phase_b, v2)])
    }

    /// U = Σ e^(2πi·φ_j)·v_j v_j* from caller-supplied eigenpairs.
    ///
    /// Vectors are normalized; they must be mutually orthogonal and there
    /// must be one per dimension, otherwise the unitarity check fails.
    pub fn from_eigenpairs(&self, eigenpairs: Vec<Eigenpair>) -> QpeResult<PhaseUnitary> {
        let dim = match eigenpairs.first() {
            Some(p) => p.vector.len(),
            None => return Err(QpeError::InvalidEigenpairs("no eigenpairs given".into())),
        };
        if dim < 2 {
            return Err(QpeError::InvalidEigenpairs(format!(
                "eigenvectors must have dimension at least 2, got {dim}"
            )));
        }

        let mut normalized = Vec::with_capacity(eigenpairs.len());
        for (i, pair) in eigenpairs.into_iter().enumerate() {
            if pair.vector.len() != dim {
                return Err(QpeError::InvalidEigenpairs(format!(
                    "eigenvector {i} has dimension {}, expected {dim}",
                    pair.vector.len()
                )));
            }
            if !pair.phase.is_finite() {
                return Err(QpeError::NonFinite(pair.phase));
            }
            normalized.push(Eigenpair::new(pair.phase, normalize(&pair.vector)?));
        }

        let matrix = normalized.iter().fold(Array2::zeros((dim, dim)), |acc, pair| {
            let eigenvalue = Complex64::from_polar(1.0, TAU * pair.phase);
            acc + outer(&pair.vector, &pair.vector).mapv(|z| z * eigenvalue)
        });

        check_unitary(&matrix, self.tolerance)?;
        debug!(
            deviation = unitarity_deviation(&matrix),
            phases = ?normalized.iter().map(|p| p.phase).collect::<Vec<_>>(),
            "constructed unitary"
        );
        Ok(PhaseUnitary {
            matrix,
            eigenpairs: normalized,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_build_has_requested_spectrum() {
        let mut rng = StdRng::seed_from_u64(3);
        let u = UnitaryFactory::default().build(0.25, 0.875, &mut rng).unwrap();
        assert!(u.unitarity_deviation() < 1e-8);
        assert_eq!(u.eigenphases(), vec![0.25, 0.875]);

        for pair in u.eigenpairs() {
            let uv = u.matrix().dot(&pair.vector);
            let lambda = Complex64::from_polar(1.0, TAU * pair.phase);
            for k in 0..2 {
                assert!((uv[k] - pair.vector[k] * lambda).norm() < 1e-12);
            }
        }
    }

    #[test]
    fn test_power_of_two_multiplies_phase() {
        let mut rng = StdRng::seed_from_u64(4);
        let u = UnitaryFactory::default().build(0.1, 0.3, &mut rng).unwrap();
        let u8 = u.power_of_two(3).unwrap();
        let v = u.eigenvector(0).unwrap();
        let expected = Complex64::from_polar(1.0, TAU * 0.8);
        let uv = u8.dot(v);
        for k in 0..2 {
            assert!((uv[k] - v[k] * expected).norm() < 1e-10);
        }
    }

    #[test]
    fn test_from_eigenpairs_standard_basis() {
        let u = UnitaryFactory::default()
            .from_eigenpairs(vec![
                Eigenpair::new(0.0, array![c(1.0), c(0.0)]),
                Eigenpair::new(0.5, array![c(0.0), c(2.0)]),
            ])
            .unwrap();
        assert!((u.matrix()[[0, 0]] - c(1.0)).norm() < 1e-12);
        assert!((u.matrix()[[1, 1]] - c(-1.0)).norm() < 1e-12);
        assert!((u.eigenvector(1).unwrap()[1] - c(1.0)).norm() < 1e-12);
    }

    #[test]
    fn test_incomplete_basis_is_construction_error() {
        let err = UnitaryFactory::default()
            .from_eigenpairs(vec![Eigenpair::new(0.2, array![c(1.0), c(0.0)])])
            .unwrap_err();
        assert!(matches!(err, QpeError::Construction { .. }));
    }

    #[test]
    fn test_non_orthogonal_vectors_fail() {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let err = UnitaryFactory::default()
            .from_eigenpairs(vec![
                Eigenpair::new(0.1, array![c(1.0), c(0.0)]),
                Eigenpair::new(0.6, array![c(s), c(s)]),
            ])
            .unwrap_err();
        assert!(matches!(err, QpeError::Construction { .. }));
    }

    #[test]
    fn test_invalid_eigenpairs() {
        let factory = UnitaryFactory::default();
        assert!(matches!(
            factory.from_eigenpairs(vec![]),
            Err(QpeError::InvalidEigenpairs(_))
        ));
        assert!(matches!(
            factory.from_eigenpairs(vec![
                Eigenpair::new(0.0, array![c(1.0), c(0.0)]),
                Eigenpair::new(0.0, array![c(1.0), c(0.0), c(0.0)]),
            ]),
            Err(QpeError::InvalidEigenpairs(_))
        ));
    }

    #[test]
    fn test_from_hamiltonian_phases() {
        let h = Hamiltonian::from_pauli(0.0, 0.0, 0.0, 1.0);
        let u = PhaseUnitary::from_hamiltonian(&h, 1.0, 1e-8).unwrap();
        // λ = −1 → phase 1 − 1/2π, λ = +1 → 1/2π
        let phases = u.eigenphases();
        assert!((phases[0] - (1.0 - 1.0 / TAU)).abs() < 1e-12);
        assert!((phases[1] - 1.0 / TAU).abs() < 1e-12);
        assert!(PhaseUnitary::from_hamiltonian(&h, -1.0, 1e-8).is_err());
    }
}
