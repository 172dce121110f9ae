//! `qpe-linalg`: dense complex linear algebra for phase estimation.
//!
//! The matrices involved in single-target phase estimation are tiny (2×2
//! unitaries, small Hermitians), so everything here works on dense
//! `ndarray::Array2<Complex64>` values:
//!
//! - [`matrix`]: adjoints, unitarity / Hermiticity checks, outer products,
//!   repeated-squaring powers
//! - [`expm`]: matrix exponential via Padé(13) scaling-and-squaring
//! - [`eigen`]: Hermitian eigendecomposition via `nalgebra::SymmetricEigen`
//! - [`random`]: normally distributed unit vectors, orthogonal complements,
//!   random Hermitians, all driven by a caller-supplied RNG
//!
//! # Example
//!
//! ```rust
//! use ndarray::array;
//! use num_complex::Complex64;
//! use qpe_linalg::{eigh, is_unitary, matrix_exp};
//!
//! let one = Complex64::new(1.0, 0.0);
//! let zero = Complex64::new(0.0, 0.0);
//! let pauli_x = array![[zero, one], [one, zero]];
//!
//! let eig = eigh(&pauli_x).unwrap();
//! assert!((eig.values[0] + 1.0).abs() < 1e-12);
//! assert!((eig.values[1] - 1.0).abs() < 1e-12);
//!
//! let u = matrix_exp(&pauli_x.mapv(|z| z * Complex64::new(0.0, 0.7))).unwrap();
//! assert!(is_unitary(&u, 1e-10));
//! ```

pub mod eigen;
pub mod error;
pub mod expm;
pub mod matrix;
pub mod random;

pub use eigen::{HermitianEigen, eigh};
pub use error::{LinalgError, LinalgResult};
pub use expm::{matrix_exp, unitary_evolution};
pub use matrix::{
    dagger, hermiticity_deviation, is_hermitian, is_unitary, matrix_power, normalize, outer,
    power_of_two, unitarity_deviation,
};
pub use random::{orthogonal_unit_vector, random_hermitian, random_unit_vector};
