//! `qpe-core`: quantum phase estimation on a local statevector simulator.
//!
//! Given a unitary U with eigenvector |u⟩ and U|u⟩ = e^(2πiφ)|u⟩, phase
//! estimation writes an m-bit approximation of φ into an estimation register.
//! This crate provides the pieces:
//!
//! - [`UnitaryFactory`]: random 2×2 unitaries with prescribed eigenphases
//! - [`Hamiltonian`]: Hermitian operators and their evolution exp(iHT)
//! - [`QpeCircuitBuilder`]: H layer, controlled U^(2^k) ladder, inverse QFT
//! - [`PhaseExtractor`]: bitstrings to phases, eigenvalues to phases
//! - [`PhaseEstimation`]: build, simulate and read out in one call
//!
//! # Quick start
//!
//! ```rust
//! use qpe_core::{PhaseEstimation, QpeConfig, SystemState, UnitaryFactory};
//!
//! let config = QpeConfig { seed: Some(7), ..QpeConfig::default() };
//! let mut rng = config.rng();
//! let unitary = UnitaryFactory::default().build(0.25, 0.875, &mut rng).unwrap();
//!
//! let runner = PhaseEstimation::new(config).unwrap();
//! let outcome = runner.run(&unitary, SystemState::Eigenstate(0)).unwrap();
//!
//! // 0.25 = 0.010 in binary: the readout is exactly "010".
//! assert_eq!(outcome.distribution.argmax(), 2);
//! assert!(outcome.distribution.probability(2) > 0.999_999);
//! ```

pub mod builder;
pub mod config;
pub mod distribution;
pub mod error;
pub mod experiment;
pub mod hamiltonian;
pub mod phase;
pub mod unitary;

pub use builder::{MAX_ESTIMATION_WIRES, QpeCircuit, QpeCircuitBuilder, state_preparation};
pub use config::{ConfigError, QpeConfig};
pub use distribution::ProbabilityDistribution;
pub use error::{QpeError, QpeResult};
pub use experiment::{EstimationOutcome, PhaseEstimation, SystemState};
pub use hamiltonian::{Hamiltonian, PauliOp};
pub use phase::{PhaseExtractor, PhaseHistogram, WrapPolicy, eigenvalue_from_phase};
pub use unitary::{DEFAULT_UNITARITY_TOLERANCE, Eigenpair, PhaseUnitary, UnitaryFactory};
