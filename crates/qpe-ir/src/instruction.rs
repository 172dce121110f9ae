//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::gate::{Gate, StandardGate};
use crate::qubit::QubitId;

/// A gate applied to target wires, optionally conditioned on control wires.
///
/// The gate acts on `targets` only in the subspace where every wire in
/// `controls` is |1⟩ and leaves all other subspaces unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The gate to apply.
    pub gate: Gate,
    /// Wires the gate acts on (first target = most significant local bit).
    pub targets: Vec<QubitId>,
    /// Control wires; empty for an unconditioned gate.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub controls: Vec<QubitId>,
}

impl Instruction {
    /// Create an unconditioned gate instruction.
    pub fn gate(gate: impl Into<Gate>, targets: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            gate: gate.into(),
            targets: targets.into_iter().collect(),
            controls: vec![],
        }
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: impl Into<Gate>, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Create a controlled gate instruction.
    pub fn controlled(
        gate: impl Into<Gate>,
        controls: impl IntoIterator<Item = QubitId>,
        targets: impl IntoIterator<Item = QubitId>,
    ) -> Self {
        Self {
            gate: gate.into(),
            targets: targets.into_iter().collect(),
            controls: controls.into_iter().collect(),
        }
    }

    /// Get the name of the gate.
    pub fn name(&self) -> &str {
        self.gate.name()
    }

    /// True if this instruction has control wires.
    pub fn is_controlled(&self) -> bool {
        !self.controls.is_empty()
    }

    /// The standard gate, if this instruction applies one.
    pub fn standard_gate(&self) -> Option<&StandardGate> {
        self.gate.as_standard()
    }

    /// All wires touched by this instruction (controls first).
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.controls.iter().chain(self.targets.iter()).copied()
    }
}
