//! Simulator trait and circuit executor.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, instrument, warn};

use qpe_ir::{Circuit, Gate, Instruction, QubitId};

use crate::error::{SimError, SimResult};
use crate::statevector::Statevector;

/// Accepted |‖ψ‖ − 1| for states handed in from outside.
const INPUT_NORM_TOLERANCE: f64 = 1e-10;

/// Operations every statevector simulator provides.
///
/// Only [`apply_gate`](Self::apply_gate), [`amplitudes`](Self::amplitudes)
/// and [`num_qubits`](Self::num_qubits) are required; the rest are built on
/// top of them.
pub trait StateSimulator {
    /// Register width.
    fn num_qubits(&self) -> usize;

    /// Raw amplitudes; qubit `q` is bit `1 << q` of the index.
    fn amplitudes(&self) -> &[Complex64];

    /// Apply `gate` to `targets` (first target = most significant local bit),
    /// conditioned on every wire in `controls` being |1⟩.
    fn apply_gate(
        &mut self,
        gate: &Gate,
        controls: &[QubitId],
        targets: &[QubitId],
    ) -> SimResult<()>;

    /// Apply a one-qubit gate.
    fn apply_single(&mut self, gate: &Gate, target: QubitId) -> SimResult<()> {
        self.apply_gate(gate, &[], &[target])
    }

    /// Apply a one-qubit gate under one or more controls.
    fn apply_controlled(
        &mut self,
        gate: &Gate,
        controls: &[QubitId],
        target: QubitId,
    ) -> SimResult<()> {
        self.apply_gate(gate, controls, &[target])
    }

    /// Apply a circuit instruction.
    fn apply_instruction(&mut self, instruction: &Instruction) -> SimResult<()> {
        self.apply_gate(&instruction.gate, &instruction.controls, &instruction.targets)
    }

    /// Marginal probabilities over `wires`, big-endian: `wires[0]` is the
    /// most significant bit of the returned index. Does not touch the state.
    fn probabilities(&self, wires: &[QubitId]) -> SimResult<Vec<f64>> {
        check_wires(self.num_qubits(), wires)?;
        let width = wires.len();
        let mut out = vec![0.0; 1 << width];
        for (i, amp) in self.amplitudes().iter().enumerate() {
            let idx = wires
                .iter()
                .enumerate()
                .fold(0, |acc, (j, q)| acc | (((i >> q.index()) & 1) << (width - 1 - j)));
            out[idx] += amp.norm_sqr();
        }
        Ok(out)
    }

    /// ‖ψ‖.
    fn norm(&self) -> f64 {
        self.amplitudes().iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt()
    }
}

/// Range and distinctness check shared by gate application and readout.
pub(crate) fn check_wires<'a>(
    num_qubits: usize,
    wires: impl IntoIterator<Item = &'a QubitId>,
) -> SimResult<()> {
    let mut seen = HashSet::new();
    for &q in wires {
        if q.index() >= num_qubits {
            return Err(SimError::QubitOutOfRange {
                qubit: q,
                num_qubits,
            });
        }
        if !seen.insert(q) {
            return Err(SimError::DuplicateQubit(q));
        }
    }
    Ok(())
}

/// Validate a gate application against a register of `num_qubits`.
pub(crate) fn check_operands(
    num_qubits: usize,
    gate: &Gate,
    controls: &[QubitId],
    targets: &[QubitId],
) -> SimResult<()> {
    let arity = gate.num_qubits() as usize;
    if arity != targets.len() {
        return Err(SimError::DimensionMismatch {
            gate: gate.name().to_string(),
            targets: targets.len(),
            expected: 1 << targets.len(),
            got: 1 << arity,
        });
    }
    check_wires(num_qubits, controls.iter().chain(targets))
}

/// Global index offset of local basis state `local` over `targets`,
/// with `targets[0]` as the most significant local bit.
pub(crate) fn local_offset(local: usize, targets: &[QubitId]) -> usize {
    let k = targets.len();
    targets
        .iter()
        .enumerate()
        .filter(|(t, _)| (local >> (k - 1 - t)) & 1 == 1)
        .fold(0, |acc, (_, q)| acc | (1 << q.index()))
}

/// Check caller-supplied amplitudes; returns the qubit count.
pub(crate) fn validate_amplitudes(amplitudes: &[Complex64]) -> SimResult<usize> {
    let len = amplitudes.len();
    if len == 0 || !len.is_power_of_two() {
        return Err(SimError::InvalidState(format!(
            "amplitude count {len} is not a power of two"
        )));
    }
    let norm = amplitudes.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt();
    if (norm - 1.0).abs() > INPUT_NORM_TOLERANCE {
        return Err(SimError::InvalidState(format!("norm is {norm}, expected 1")));
    }
    Ok(len.trailing_zeros() as usize)
}

/// What to do when a gate leaves the state unnormalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizationPolicy {
    /// Skip the check.
    Ignore,
    /// Log a warning and continue.
    Warn,
    /// Abort with [`SimError::NormalizationDrift`].
    #[default]
    Error,
}

impl std::str::FromStr for NormalizationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown normalization policy '{other}'")),
        }
    }
}

/// Executor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Widest circuit accepted.
    pub max_qubits: u32,
    /// Accepted |‖ψ‖ − 1| after each gate.
    pub normalization_tolerance: f64,
    /// Reaction to a drift beyond the tolerance.
    pub normalization_policy: NormalizationPolicy,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_qubits: 20,
            normalization_tolerance: 1e-9,
            normalization_policy: NormalizationPolicy::default(),
        }
    }
}

/// Local statevector executor for [`Circuit`]s.
///
/// Each run starts from a fresh |0…0⟩ state; nothing is shared between runs.
#[derive(Debug, Clone, Default)]
pub struct SimulatorBackend {
    config: SimulatorConfig,
}

impl SimulatorBackend {
    /// Create a backend with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend with explicit settings.
    pub fn with_config(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// Create a backend with a custom qubit ceiling.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self::with_config(SimulatorConfig {
            max_qubits,
            ..SimulatorConfig::default()
        })
    }

    /// Active settings.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Run `circuit` on a fresh statevector and return the final state.
    #[instrument(
        skip(self, circuit),
        fields(circuit = circuit.name(), qubits = circuit.num_qubits())
    )]
    pub fn run(&self, circuit: &Circuit) -> SimResult<Statevector> {
        let num_qubits = circuit.num_qubits();
        if num_qubits > self.config.max_qubits as usize {
            return Err(SimError::TooManyQubits {
                requested: num_qubits,
                max: self.config.max_qubits,
            });
        }
        let mut sv = Statevector::new(num_qubits);
        self.run_on(&mut sv, circuit)?;
        Ok(sv)
    }

    /// Apply every instruction of `circuit` to an existing simulator,
    /// enforcing the normalization policy after each gate.
    pub fn run_on<S: StateSimulator + ?Sized>(
        &self,
        state: &mut S,
        circuit: &Circuit,
    ) -> SimResult<()> {
        let start = Instant::now();
        debug!("Circuit has {} instructions", circuit.len());

        for instruction in circuit.instructions() {
            state.apply_instruction(instruction)?;
            self.check_norm(state, instruction.name())?;
        }

        debug!("Simulation completed in {:?}", start.elapsed());
        Ok(())
    }

    /// Run `circuit` and read the marginal distribution over `wires`.
    pub fn probabilities(&self, circuit: &Circuit, wires: &[QubitId]) -> SimResult<Vec<f64>> {
        self.run(circuit)?.probabilities(wires)
    }

    fn check_norm<S: StateSimulator + ?Sized>(&self, state: &S, gate: &str) -> SimResult<()> {
        let policy = self.config.normalization_policy;
        if policy == NormalizationPolicy::Ignore {
            return Ok(());
        }
        let norm = state.norm();
        let tolerance = self.config.normalization_tolerance;
        if (norm - 1.0).abs() <= tolerance {
            return Ok(());
        }
        match policy {
            NormalizationPolicy::Warn => {
                warn!(gate, norm, tolerance, "state norm drifted");
                Ok(())
            }
            _ => Err(SimError::NormalizationDrift {
                gate: gate.to_string(),
                norm,
                tolerance,
            }),
        }
    }
}
