//! Elementary dense-matrix helpers.

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use crate::error::{LinalgError, LinalgResult};

/// Require `a` to be square; return its dimension.
pub(crate) fn require_square(a: &Array2<Complex64>) -> LinalgResult<usize> {
    let (rows, cols) = a.dim();
    if rows != cols {
        return Err(LinalgError::NotSquare { rows, cols });
    }
    Ok(rows)
}

/// Conjugate transpose A†.
pub fn dagger(a: &Array2<Complex64>) -> Array2<Complex64> {
    a.t().mapv(|z| z.conj())
}

/// Frobenius norm of U†U − I.
///
/// Returns `f64::INFINITY` for non-square input.
pub fn unitarity_deviation(u: &Array2<Complex64>) -> f64 {
    let Ok(n) = require_square(u) else {
        return f64::INFINITY;
    };
    let product = dagger(u).dot(u);
    let eye = Array2::<Complex64>::eye(n);
    (&product - &eye).iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt()
}

/// True if ‖U†U − I‖_F < `tolerance`.
pub fn is_unitary(u: &Array2<Complex64>, tolerance: f64) -> bool {
    unitarity_deviation(u) < tolerance
}

/// Largest elementwise |H − H†|.
///
/// Returns `f64::INFINITY` for non-square input.
pub fn hermiticity_deviation(h: &Array2<Complex64>) -> f64 {
    if require_square(h).is_err() {
        return f64::INFINITY;
    }
    (h - &dagger(h))
        .iter()
        .map(|z| z.norm())
        .fold(0.0, f64::max)
}

/// True if max |H − H†| ≤ `tolerance`.
pub fn is_hermitian(h: &Array2<Complex64>, tolerance: f64) -> bool {
    hermiticity_deviation(h) <= tolerance
}

/// Outer product |v⟩⟨w| (i.e. v w*). With `w = v` this is the projector onto v.
pub fn outer(v: &Array1<Complex64>, w: &Array1<Complex64>) -> Array2<Complex64> {
    Array2::from_shape_fn((v.len(), w.len()), |(i, j)| v[i] * w[j].conj())
}

/// Return `v / ‖v‖`.
pub fn normalize(v: &Array1<Complex64>) -> LinalgResult<Array1<Complex64>> {
    let norm = v.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt();
    if !norm.is_finite() {
        return Err(LinalgError::NonFinite);
    }
    if norm < f64::EPSILON {
        return Err(LinalgError::ZeroVector);
    }
    Ok(v.mapv(|z| z / norm))
}

/// A^exponent by binary exponentiation.
pub fn matrix_power(a: &Array2<Complex64>, mut exponent: u64) -> LinalgResult<Array2<Complex64>> {
    let n = require_square(a)?;
    let mut result = Array2::<Complex64>::eye(n);
    let mut base = a.clone();
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = result.dot(&base);
        }
        exponent >>= 1;
        if exponent > 0 {
            base = base.dot(&base);
        }
    }
    Ok(result)
}

/// A^(2^k) by `k` successive squarings.
pub fn power_of_two(a: &Array2<Complex64>, k: u32) -> LinalgResult<Array2<Complex64>> {
    require_square(a)?;
    let mut m = a.clone();
    for _ in 0..k {
        m = m.dot(&m);
    }
    Ok(m)
}
