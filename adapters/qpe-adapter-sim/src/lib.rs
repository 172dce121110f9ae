//! Local Statevector Simulator for phase-estimation circuits
//!
//! Exact, deterministic simulation: the full state is kept in memory and
//! readout returns probabilities rather than sampled counts.
//!
//! # Features
//!
//! - **[`StateSimulator`]**: the simulation boundary. Apply gates (with any
//!   number of controls and targets) and read marginal probabilities.
//! - **[`Statevector`]**: index-arithmetic kernels with fast paths for X, H,
//!   diagonal phase gates and SWAP.
//! - **[`DenseStatevector`]**: reference implementation that materializes the
//!   full operator for every gate.
//! - **[`SimulatorBackend`]**: runs a `qpe_ir::Circuit` from |0…0⟩ and checks
//!   normalization after every gate.
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//!
//! # Example
//!
//! ```rust
//! use qpe_adapter_sim::{SimulatorBackend, StateSimulator};
//! use qpe_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell", 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let state = SimulatorBackend::new().run(&circuit).unwrap();
//! let probs = state.probabilities(&[QubitId(0), QubitId(1)]).unwrap();
//! assert!((probs[0b00] - 0.5).abs() < 1e-12);
//! assert!((probs[0b11] - 0.5).abs() < 1e-12);
//! ```

mod dense;
mod error;
mod simulator;
mod statevector;

pub use dense::DenseStatevector;
pub use error::{SimError, SimResult};
pub use simulator::{NormalizationPolicy, SimulatorBackend, SimulatorConfig, StateSimulator};
pub use statevector::Statevector;
