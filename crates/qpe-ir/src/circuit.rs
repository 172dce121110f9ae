//! High-level circuit builder API.

use std::f64::consts::PI;

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, StandardGate};
use crate::instruction::Instruction;
use crate::qubit::{Qubit, QubitId};

/// A quantum circuit: an ordered list of instructions over a fixed set of
/// qubits.
///
/// Every instruction is validated on insertion: its wires must exist, must
/// not repeat, and the gate arity must match the number of targets.
#[derive(Debug, Clone)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Qubits in the circuit.
    qubits: Vec<Qubit>,
    /// Instructions in application order.
    instructions: Vec<Instruction>,
    /// Counter for generating qubit IDs.
    next_qubit_id: u32,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            instructions: vec![],
            next_qubit_id: 0,
        }
    }

    /// Create a circuit with a given number of anonymous qubits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32) -> Self {
        let mut circuit = Self::new(name);
        for _ in 0..num_qubits {
            circuit.add_qubit();
        }
        circuit
    }

    /// Add a single qubit to the circuit.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.next_qubit_id);
        self.next_qubit_id += 1;
        self.qubits.push(Qubit::new(id));
        id
    }

    /// Add a quantum register with multiple qubits.
    ///
    /// Registers never share qubits: every call allocates fresh ids.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> Vec<QubitId> {
        let name = name.into();
        let mut ids = vec![];
        for i in 0..size {
            let id = QubitId(self.next_qubit_id);
            self.next_qubit_id += 1;
            self.qubits.push(Qubit::with_register(id, &name, i));
            ids.push(id);
        }
        ids
    }

    /// The qubits of a named register, in register order.
    pub fn register(&self, name: &str) -> IrResult<Vec<QubitId>> {
        let ids: Vec<_> = self
            .qubits
            .iter()
            .filter(|q| q.in_register(name))
            .map(|q| q.id)
            .collect();
        if ids.is_empty() {
            return Err(IrError::RegisterNotFound(name.to_string()));
        }
        Ok(ids)
    }

    // =========================================================================
    // Gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::X, qubit))
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Z, qubit))
    }

    /// Apply phase gate diag(1, e^(iθ)).
    pub fn p(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::P(theta), qubit))
    }

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::controlled(StandardGate::X, [control], [target]))
    }

    /// Apply controlled-phase gate.
    pub fn cp(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::controlled(
            StandardGate::P(theta),
            [control],
            [target],
        ))
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::Swap, [q1, q2]))
    }

    /// Apply an arbitrary gate to the given targets.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        targets: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(gate, targets))
    }

    /// Apply a gate to `targets`, conditioned on every control being |1⟩.
    pub fn controlled(
        &mut self,
        gate: impl Into<Gate>,
        controls: impl IntoIterator<Item = QubitId>,
        targets: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::controlled(gate, controls, targets))
    }

    /// Validate and append an instruction.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.validate(&instruction)?;
        self.instructions.push(instruction);
        Ok(self)
    }

    fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let expected = instruction.gate.num_qubits();
        let got = instruction.targets.len() as u32;
        if expected != got {
            return Err(IrError::QubitCountMismatch {
                gate_name: instruction.name().to_string(),
                expected,
                got,
            });
        }

        let mut seen: Vec<QubitId> = Vec::with_capacity(instruction.targets.len() + 1);
        for qubit in instruction.qubits() {
            if qubit.0 >= self.next_qubit_id {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: Some(instruction.name().to_string()),
                });
            }
            if seen.contains(&qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: Some(instruction.name().to_string()),
                });
            }
            seen.push(qubit);
        }
        Ok(())
    }

    // =========================================================================
    // Fourier transforms
    // =========================================================================

    /// Append the QFT over `wires` (big-endian: `wires[0]` is the MSB).
    ///
    /// Maps |x⟩ to (1/√N) Σ_k e^(2πi·xk/N) |k⟩.
    pub fn append_qft(&mut self, wires: &[QubitId]) -> IrResult<&mut Self> {
        let n = wires.len();
        for i in 0..n {
            self.h(wires[i])?;
            for j in (i + 1)..n {
                self.cp(qft_angle(j - i), wires[j], wires[i])?;
            }
        }
        for i in 0..n / 2 {
            self.swap(wires[i], wires[n - 1 - i])?;
        }
        Ok(self)
    }

    /// Append the inverse QFT over `wires` (big-endian).
    ///
    /// This is the exact reverse of [`Circuit::append_qft`] with negated
    /// rotation angles, i.e. the matrix (1/√N)·e^(−2πi·jk/N).
    pub fn append_inverse_qft(&mut self, wires: &[QubitId]) -> IrResult<&mut Self> {
        let n = wires.len();
        for i in 0..n / 2 {
            self.swap(wires[i], wires[n - 1 - i])?;
        }
        for i in (0..n).rev() {
            for j in ((i + 1)..n).rev() {
                self.cp(-qft_angle(j - i), wires[j], wires[i])?;
            }
            self.h(wires[i])?;
        }
        Ok(self)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the qubits in the circuit.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Instructions in application order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// True if the circuit has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Circuit depth: the number of layers when every instruction is placed
    /// one layer after the latest instruction on any of its wires.
    pub fn depth(&self) -> usize {
        let mut layer = vec![0usize; self.qubits.len()];
        let mut depth = 0;
        for inst in &self.instructions {
            let next = inst.qubits().map(|q| layer[q.index()]).max().unwrap_or(0) + 1;
            for q in inst.qubits() {
                layer[q.index()] = next;
            }
            depth = depth.max(next);
        }
        depth
    }
}

/// Rotation angle 2π / 2^(k+1) between wires `k` positions apart.
fn qft_angle(k: usize) -> f64 {
    PI / (1u64 << k) as f64
}
