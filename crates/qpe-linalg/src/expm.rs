//! Matrix exponential via scaling-and-squaring with a Padé(13) approximant.
//!
//! Higham (2005), "The Scaling and Squaring Method for the Matrix
//! Exponential Revisited". The matrices exponentiated here are small
//! (Hamiltonians of a handful of levels), so no balancing is done.

use ndarray::{Array2, s};
use num_complex::Complex64;
use tracing::trace;

use crate::error::{LinalgError, LinalgResult};
use crate::matrix::require_square;

/// θ₁₃ from Higham's Table 10.2: the largest 1-norm for which the
/// Padé(13) approximant is accurate to double precision.
const THETA_13: f64 = 5.37;

/// Normalized Padé(13,13) coefficients b_k / b_0.
const PADE_COEFFS: [f64; 14] = [
    1.0,
    0.5,
    0.12,
    1.833_333_333_333_333_4e-2,
    1.992_753_623_188_405_8e-3,
    1.630_434_782_608_696e-4,
    1.035_196_687_401_6e-5,
    5.175_983_437_008_01e-7,
    2.043_151_356_652_5e-8,
    6.306_022_705_717_593e-10,
    1.483_770_048_404_14e-11,
    2.529_153_491_597_966e-13,
    2.810_170_546_219_962_4e-15,
    1.544_049_750_670_309e-17,
];

/// Pivots below this magnitude are treated as singular.
const PIVOT_EPS: f64 = 1e-15;

/// Compute exp(A) for a square complex matrix.
pub fn matrix_exp(a: &Array2<Complex64>) -> LinalgResult<Array2<Complex64>> {
    let n = require_square(a)?;
    if a.iter().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
        return Err(LinalgError::NonFinite);
    }
    match n {
        0 => return Ok(Array2::zeros((0, 0))),
        1 => return Ok(Array2::from_elem((1, 1), a[[0, 0]].exp())),
        _ => {}
    }

    let norm = one_norm(a);
    let squarings = if norm > THETA_13 {
        (norm / THETA_13).log2().ceil() as u32
    } else {
        0
    };
    trace!(norm, squarings, "matrix_exp scaling");

    let scale = Complex64::new(1.0 / 2f64.powi(squarings as i32), 0.0);
    let mut result = pade13(&a.mapv(|z| z * scale))?;
    for _ in 0..squarings {
        result = result.dot(&result);
    }
    Ok(result)
}

/// Time-evolution operator exp(i·H·t).
///
/// The sign convention makes an eigenvector of `H` with eigenvalue λ an
/// eigenvector of the result with eigenvalue e^(iλt).
pub fn unitary_evolution(h: &Array2<Complex64>, t: f64) -> LinalgResult<Array2<Complex64>> {
    let factor = Complex64::new(0.0, t);
    matrix_exp(&h.mapv(|z| z * factor))
}

/// Maximum absolute column sum.
fn one_norm(a: &Array2<Complex64>) -> f64 {
    a.columns()
        .into_iter()
        .map(|col| col.iter().map(|z| z.norm()).sum::<f64>())
        .fold(0.0, f64::max)
}

#[inline]
fn c(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

fn pade13(a: &Array2<Complex64>) -> LinalgResult<Array2<Complex64>> {
    let n = a.nrows();
    let eye = Array2::<Complex64>::eye(n);
    let b = PADE_COEFFS;

    let a2 = a.dot(a);
    let a4 = a2.dot(&a2);
    let a6 = a2.dot(&a4);

    // Odd part U = A (A6 (b13 A6 + b11 A4 + b9 A2) + b7 A6 + b5 A4 + b3 A2 + b1 I)
    let odd_high = &a6 * c(b[13]) + &a4 * c(b[11]) + &a2 * c(b[9]);
    let odd = a6.dot(&odd_high)
        + &a6 * c(b[7])
        + &a4 * c(b[5])
        + &a2 * c(b[3])
        + &eye * c(b[1]);
    let u = a.dot(&odd);

    // Even part V = A6 (b12 A6 + b10 A4 + b8 A2) + b6 A6 + b4 A4 + b2 A2 + b0 I
    let even_high = &a6 * c(b[12]) + &a4 * c(b[10]) + &a2 * c(b[8]);
    let v = a6.dot(&even_high)
        + &a6 * c(b[6])
        + &a4 * c(b[4])
        + &a2 * c(b[2])
        + &eye * c(b[0]);

    // exp(A) ≈ (V − U)⁻¹ (V + U)
    solve(&v - &u, &v + &u)
}

/// Solve A·X = B by Gaussian elimination with partial pivoting.
fn solve(a: Array2<Complex64>, b: Array2<Complex64>) -> LinalgResult<Array2<Complex64>> {
    let n = a.nrows();
    if b.nrows() != n {
        return Err(LinalgError::DimensionMismatch {
            expected: n,
            got: b.nrows(),
        });
    }
    let m = b.ncols();

    let mut aug = Array2::<Complex64>::zeros((n, n + m));
    aug.slice_mut(s![.., ..n]).assign(&a);
    aug.slice_mut(s![.., n..]).assign(&b);

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&x, &y| aug[[x, col]].norm().total_cmp(&aug[[y, col]].norm()))
            .unwrap_or(col);
        if pivot_row != col {
            for j in 0..(n + m) {
                aug.swap([col, j], [pivot_row, j]);
            }
        }

        let pivot = aug[[col, col]];
        if pivot.norm() < PIVOT_EPS {
            return Err(LinalgError::Singular);
        }
        for row in (col + 1)..n {
            let factor = aug[[row, col]] / pivot;
            for j in col..(n + m) {
                let above = aug[[col, j]];
                aug[[row, j]] -= factor * above;
            }
        }
    }

    let mut x = Array2::<Complex64>::zeros((n, m));
    for row in (0..n).rev() {
        let pivot = aug[[row, row]];
        for j in 0..m {
            let mut sum = aug[[row, n + j]];
            for k in (row + 1)..n {
                sum -= aug[[row, k]] * x[[k, j]];
            }
            x[[row, j]] = sum / pivot;
        }
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::is_unitary;
    use ndarray::array;

    fn assert_close(a: &Array2<Complex64>, b: &Array2<Complex64>, tol: f64) {
        assert_eq!(a.dim(), b.dim());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).norm() < tol, "{x} vs {y}");
        }
    }

    #[test]
    fn test_exp_zero_is_identity() {
        let z = Array2::<Complex64>::zeros((3, 3));
        assert_close(&matrix_exp(&z).unwrap(), &Array2::eye(3), 1e-14);
    }

    #[test]
    fn test_exp_diagonal() {
        let a = array![[c(1.0), c(0.0)], [c(0.0), Complex64::new(0.0, 2.0)]];
        let expected = array![
            [c(1f64.exp()), c(0.0)],
            [c(0.0), Complex64::from_polar(1.0, 2.0)]
        ];
        assert_close(&matrix_exp(&a).unwrap(), &expected, 1e-12);
    }

    #[test]
    fn test_exp_pauli_x_rotation() {
        // exp(iθX) = cos θ I + i sin θ X
        let theta = 0.83;
        let x = array![[c(0.0), c(1.0)], [c(1.0), c(0.0)]];
        let u = unitary_evolution(&x, theta).unwrap();
        let (s, co) = theta.sin_cos();
        let expected = array![
            [c(co), Complex64::new(0.0, s)],
            [Complex64::new(0.0, s), c(co)]
        ];
        assert_close(&u, &expected, 1e-12);
    }

    #[test]
    fn test_exp_large_norm_uses_squaring() {
        let theta = 40.0;
        let z = array![[c(1.0), c(0.0)], [c(0.0), c(-1.0)]];
        let u = unitary_evolution(&z, theta).unwrap();
        assert!(is_unitary(&u, 1e-9));
        assert!((u[[0, 0]] - Complex64::from_polar(1.0, theta)).norm() < 1e-9);
        assert!((u[[1, 1]] - Complex64::from_polar(1.0, -theta)).norm() < 1e-9);
    }

    #[test]
    fn test_exp_scalar() {
        let a = array![[Complex64::new(0.5, 1.0)]];
        let e = matrix_exp(&a).unwrap();
        assert!((e[[0, 0]] - Complex64::new(0.5, 1.0).exp()).norm() < 1e-14);
    }

    #[test]
    fn test_exp_rejects_bad_input() {
        let rect = Array2::<Complex64>::zeros((2, 3));
        assert!(matches!(
            matrix_exp(&rect),
            Err(LinalgError::NotSquare { .. })
        ));
        let nan = array![[c(f64::NAN), c(0.0)], [c(0.0), c(0.0)]];
        assert!(matches!(matrix_exp(&nan), Err(LinalgError::NonFinite)));
    }

    #[test]
    fn test_solve_singular() {
        let a = Array2::<Complex64>::zeros((2, 2));
        let b = Array2::<Complex64>::eye(2);
        assert!(matches!(solve(a, b), Err(LinalgError::Singular)));
    }
}
