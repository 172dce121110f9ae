//! Hermitian eigendecomposition.
//!
//! The decomposition itself is nalgebra's `SymmetricEigen`, which accepts
//! complex Hermitian input. This module converts at the `ndarray` boundary,
//! sorts the spectrum and fixes eigenvector phases.

use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::{Array1, Array2};
use num_complex::Complex64;
use tracing::debug;

use crate::error::{LinalgError, LinalgResult};
use crate::matrix::{hermiticity_deviation, require_square};

/// Iteration cap handed to the QR sweeps.
const MAX_ITERATIONS: usize = 1_000;

/// Relative tolerance on |H − H†| accepted as Hermitian.
const HERMITIAN_TOL: f64 = 1e-10;

/// Eigenvalues (ascending) and matching orthonormal eigenvectors.
#[derive(Debug, Clone)]
pub struct HermitianEigen {
    /// Real eigenvalues in ascending order.
    pub values: Array1<f64>,
    /// Eigenvectors stored as columns; column `i` pairs with `values[i]`.
    pub vectors: Array2<Complex64>,
}

impl HermitianEigen {
    /// Number of eigenpairs.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True for the decomposition of a 0×0 matrix.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The `i`-th eigenvector as an owned column.
    pub fn vector(&self, i: usize) -> Array1<Complex64> {
        self.vectors.column(i).to_owned()
    }

    /// Rebuild V·diag(λ)·V†.
    pub fn reconstruct(&self) -> Array2<Complex64> {
        let n = self.len();
        Array2::from_shape_fn((n, n), |(i, j)| {
            (0..n)
                .map(|k| self.vectors[[i, k]] * self.values[k] * self.vectors[[j, k]].conj())
                .sum()
        })
    }
}

/// Diagonalize a Hermitian matrix.
///
/// Eigenvectors are phase-fixed so their largest-magnitude component is
/// real and positive, making the output deterministic for a given input.
pub fn eigh(h: &Array2<Complex64>) -> LinalgResult<HermitianEigen> {
    let n = require_square(h)?;
    if h.iter().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
        return Err(LinalgError::NonFinite);
    }
    let scale = h.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt().max(1.0);
    let deviation = hermiticity_deviation(h);
    if deviation > HERMITIAN_TOL * scale {
        return Err(LinalgError::NotHermitian { deviation });
    }

    // SymmetricEigen reads one triangle only; symmetrize so both agree.
    let m = DMatrix::from_fn(n, n, |i, j| 0.5 * (h[[i, j]] + h[[j, i]].conj()));
    let eig = SymmetricEigen::try_new(m, f64::EPSILON, MAX_ITERATIONS)
        .ok_or(LinalgError::NoConvergence {
            iterations: MAX_ITERATIONS,
        })?;

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| eig.eigenvalues[i].total_cmp(&eig.eigenvalues[j]));

    let values = Array1::from_iter(order.iter().map(|&i| eig.eigenvalues[i]));
    let mut vectors = Array2::<Complex64>::zeros((n, n));
    for (dst, &src) in order.iter().enumerate() {
        let mut col = Array1::from_iter(eig.eigenvectors.column(src).iter().copied());
        fix_phase(&mut col);
        vectors.column_mut(dst).assign(&col);
    }
    debug!(n, ?values, "hermitian eigendecomposition");
    Ok(HermitianEigen { values, vectors })
}

fn fix_phase(col: &mut Array1<Complex64>) {
    let pivot = col
        .iter()
        .copied()
        .max_by(|x, y| x.norm().total_cmp(&y.norm()));
    if let Some(pivot) = pivot {
        if pivot.norm() > 0.0 {
            let rotation = pivot.conj() / pivot.norm();
            col.mapv_inplace(|z| z * rotation);
        }
    }
}
