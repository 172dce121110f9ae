//! QPE Circuit Intermediate Representation
//!
//! This crate provides the data structures used to describe a phase
//! estimation experiment as a flat, ordered sequence of gate applications.
//!
//! # Core Components
//!
//! - **Qubits and Registers**: [`QubitId`] addresses a wire, [`Qubit`] records
//!   which named register (`system`, `estimation`, ...) it belongs to
//! - **Gates**: [`StandardGate`] for built-in gates (H, X, P, SWAP, ...) and
//!   [`CustomGate`] for operators carried as dense matrices (U^(2^k), state
//!   preparation)
//! - **Instructions**: [`Instruction`] combining a gate with target and control wires
//! - **Circuit**: [`Circuit`] builder API, including (inverse) QFT emission
//!
//! # Example: Inverse QFT on a three-qubit register
//!
//! ```rust
//! use qpe_ir::Circuit;
//!
//! let mut circuit = Circuit::new("iqft");
//! let wires = circuit.add_qreg("estimation", 3);
//! circuit.append_inverse_qft(&wires).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 3);
//! // 1 swap, 3 Hadamards, 3 controlled phases
//! assert_eq!(circuit.len(), 7);
//! ```
//!
//! # Wire conventions
//!
//! Register wire lists are big-endian: the first wire of a list is the most
//! significant bit of the integer that list encodes. For multi-target gates
//! the first target is the most significant bit of the gate's local index.

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{CustomGate, Gate, GateKind, StandardGate};
pub use instruction::Instruction;
pub use qubit::{Qubit, QubitId};
