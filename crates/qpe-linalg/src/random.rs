//! Random vectors and matrices drawn from complex Gaussian ensembles.
//!
//! All functions take the RNG explicitly so callers control seeding.

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::{LinalgError, LinalgResult};
use crate::matrix::normalize;

/// Below this residual norm the Gram-Schmidt step is redrawn.
const DEGENERATE_NORM: f64 = 1e-12;

fn complex_normal<R: Rng + ?Sized>(rng: &mut R) -> Complex64 {
    Complex64::new(rng.sample(StandardNormal), rng.sample(StandardNormal))
}

fn gaussian_vector<R: Rng + ?Sized>(dim: usize, rng: &mut R) -> Array1<Complex64> {
    Array1::from_shape_fn(dim, |_| complex_normal(rng))
}

/// A unit vector uniformly distributed on the complex sphere in ℂ^dim.
pub fn random_unit_vector<R: Rng + ?Sized>(
    dim: usize,
    rng: &mut R,
) -> LinalgResult<Array1<Complex64>> {
    if dim == 0 {
        return Err(LinalgError::DimensionTooSmall { min: 1, got: dim });
    }
    loop {
        let v = gaussian_vector(dim, rng);
        if let Ok(unit) = normalize(&v) {
            return Ok(unit);
        }
    }
}

/// A random unit vector orthogonal to the unit vector `v1`.
///
/// Draws a Gaussian vector, projects out its `v1` component and
/// renormalizes, redrawing in the measure-zero case where nothing is left.
pub fn orthogonal_unit_vector<R: Rng + ?Sized>(
    v1: &Array1<Complex64>,
    rng: &mut R,
) -> LinalgResult<Array1<Complex64>> {
    if v1.len() < 2 {
        return Err(LinalgError::DimensionTooSmall {
            min: 2,
            got: v1.len(),
        });
    }
    loop {
        let w = gaussian_vector(v1.len(), rng);
        let overlap: Complex64 = v1.iter().zip(w.iter()).map(|(a, b)| a.conj() * b).sum();
        let residual = &w - &v1.mapv(|a| a * overlap);
        let norm = residual.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt();
        if norm > DEGENERATE_NORM {
            return Ok(residual.mapv(|z| z / norm));
        }
    }
}

/// A random Hermitian matrix (A + A†)/2 with Gaussian entries of width `scale`.
pub fn random_hermitian<R: Rng + ?Sized>(
    dim: usize,
    scale: f64,
    rng: &mut R,
) -> Array2<Complex64> {
    let a = Array2::from_shape_fn((dim, dim), |_| complex_normal(rng) * scale);
    Array2::from_shape_fn((dim, dim), |(i, j)| 0.5 * (a[[i, j]] + a[[j, i]].conj()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::is_hermitian;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn norm(v: &Array1<Complex64>) -> f64 {
        v.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt()
    }

    #[test]
    fn test_unit_vector_is_normalized() {
        let mut rng = StdRng::seed_from_u64(1);
        for dim in 1..6 {
            let v = random_unit_vector(dim, &mut rng).unwrap();
            assert_eq!(v.len(), dim);
            assert_abs_diff_eq!(norm(&v), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_orthogonal_vector() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..20 {
            let v1 = random_unit_vector(2, &mut rng).unwrap();
            let v2 = orthogonal_unit_vector(&v1, &mut rng).unwrap();
            let overlap: Complex64 = v1.iter().zip(v2.iter()).map(|(a, b)| a.conj() * b).sum();
            assert!(overlap.norm() < 1e-12);
            assert_abs_diff_eq!(norm(&v2), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_degenerate_dimensions_are_rejected() {
        let mut rng = StdRng::seed_from_u64(4);
        assert!(matches!(
            random_unit_vector(0, &mut rng),
            Err(LinalgError::DimensionTooSmall { min: 1, got: 0 })
        ));
        let line = random_unit_vector(1, &mut rng).unwrap();
        assert!(matches!(
            orthogonal_unit_vector(&line, &mut rng),
            Err(LinalgError::DimensionTooSmall { min: 2, got: 1 })
        ));
    }

    #[test]
    fn test_same_seed_same_vector() {
        let a = random_unit_vector(2, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = random_unit_vector(2, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_hermitian() {
        let mut rng = StdRng::seed_from_u64(3);
        let h = random_hermitian(4, 0.5, &mut rng);
        assert!(is_hermitian(&h, 0.0));
        for i in 0..4 {
            assert_eq!(h[[i, i]].im, 0.0);
        }
    }
}
