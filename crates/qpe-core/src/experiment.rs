//! End-to-end phase-estimation runs.

use num_complex::Complex64;
use std::time::Instant;
use tracing::{debug, info, instrument};

use qpe_adapter_sim::{SimulatorBackend, StateSimulator};
use qpe_ir::Circuit;

use crate::builder::{QpeCircuit, QpeCircuitBuilder};
use crate::config::QpeConfig;
use crate::distribution::ProbabilityDistribution;
use crate::error::{QpeError, QpeResult};
use crate::phase::{PhaseExtractor, PhaseHistogram, WrapPolicy};
use crate::unitary::PhaseUnitary;

/// Initial state of the system wire.
#[derive(Debug, Clone, PartialEq)]
pub enum SystemState {
    /// |0⟩, a superposition of the eigenvectors in general.
    Zero,
    /// The `i`-th eigenvector of the unitary.
    Eigenstate(usize),
    /// `a|0⟩ + b|1⟩`, normalized before use.
    Amplitudes([Complex64; 2]),
}

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct EstimationOutcome {
    /// The simulated circuit.
    pub circuit: Circuit,
    /// Readout distribution over the estimation register.
    pub distribution: ProbabilityDistribution,
    /// Phase histogram derived from the distribution.
    pub histogram: PhaseHistogram,
    /// Exact eigenphases of the unitary, in [0, 1).
    pub true_phases: Vec<f64>,
}

/// Runs phase estimation on the local statevector simulator.
#[derive(Debug, Clone)]
pub struct PhaseEstimation {
    config: QpeConfig,
    backend: SimulatorBackend,
}

impl PhaseEstimation {
    /// Validate `config` and set up the simulator.
    pub fn new(config: QpeConfig) -> QpeResult<Self> {
        config.validate()?;
        let backend = SimulatorBackend::with_config(config.simulator_config());
        Ok(Self { config, backend })
    }

    /// Active configuration.
    pub fn config(&self) -> &QpeConfig {
        &self.config
    }

    /// Build the circuit for `unitary` and `state` without running it.
    pub fn circuit(&self, unitary: &PhaseUnitary, state: &SystemState) -> QpeResult<QpeCircuit> {
        let amplitudes = match state {
            SystemState::Zero => None,
            SystemState::Eigenstate(i) => {
                let v = unitary.eigenvector(*i).ok_or_else(|| {
                    QpeError::InvalidState(format!(
                        "eigenstate {i} requested but the unitary has {} eigenvectors",
                        unitary.eigenpairs().len()
                    ))
                })?;
                if v.len() != 2 {
                    return Err(QpeError::UnsupportedUnitary {
                        rows: unitary.dim(),
                        cols: unitary.dim(),
                    });
                }
                Some([v[0], v[1]])
            }
            SystemState::Amplitudes(a) => Some(*a),
        };

        let builder = QpeCircuitBuilder::new(unitary.matrix(), self.config.estimation_wires);
        match amplitudes {
            Some(a) => builder.with_initial_state(a).build(),
            None => builder.build(),
        }
    }

    /// Build, simulate and read out.
    #[instrument(skip(self, unitary), fields(m = self.config.estimation_wires))]
    pub fn run(&self, unitary: &PhaseUnitary, state: SystemState) -> QpeResult<EstimationOutcome> {
        let start = Instant::now();
        let QpeCircuit {
            circuit,
            estimation,
            ..
        } = self.circuit(unitary, &state)?;

        let sv = self.backend.run(&circuit)?;
        let probabilities = sv.probabilities(&estimation)?;
        let distribution =
            ProbabilityDistribution::new(self.config.estimation_wires, probabilities)?;
        let histogram =
            PhaseExtractor::new(self.config.wrap_policy).from_distribution(&distribution);

        let true_phases = unitary
            .eigenphases()
            .into_iter()
            .map(|p| WrapPolicy::Modulo.wrap(p))
            .collect::<QpeResult<Vec<_>>>()?;

        let argmax = distribution.argmax();
        info!(
            argmax,
            bitstring = %distribution.bitstring(argmax),
            probability = distribution.probability(argmax),
            "phase estimation complete"
        );
        debug!("Run completed in {:?}", start.elapsed());

        Ok(EstimationOutcome {
            circuit,
            distribution,
            histogram,
            true_phases,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unitary::{Eigenpair, UnitaryFactory};
    use ndarray::array;

    fn diagonal(phase_a: f64, phase_b: f64) -> PhaseUnitary {
        let one = Complex64::new(1.0, 0.0);
        let zero = Complex64::new(0.0, 0.0);
        UnitaryFactory::default()
            .from_eigenpairs(vec![
                Eigenpair::new(phase_a, array![one, zero]),
                Eigenpair::new(phase_b, array![zero, one]),
            ])
            .unwrap()
    }

    #[test]
    fn test_zero_state_reads_first_eigenphase() {
        let runner = PhaseEstimation::new(QpeConfig::default()).unwrap();
        let outcome = runner.run(&diagonal(0.625, 0.125), SystemState::Zero).unwrap();
        assert!((outcome.distribution.probability(5) - 1.0).abs() < 1e-10);
        assert_eq!(outcome.histogram.most_likely().map(|(v, _)| v), Some(0.625));
        assert_eq!(outcome.true_phases, vec![0.625, 0.125]);
    }

    #[test]
    fn test_eigenstate_out_of_range() {
        let runner = PhaseEstimation::new(QpeConfig::default()).unwrap();
        assert!(matches!(
            runner.run(&diagonal(0.0, 0.5), SystemState::Eigenstate(2)),
            Err(QpeError::InvalidState(_))
        ));
    }

    #[test]
    fn test_zero_amplitudes_rejected() {
        let runner = PhaseEstimation::new(QpeConfig::default()).unwrap();
        let zero = Complex64::new(0.0, 0.0);
        assert!(matches!(
            runner.run(&diagonal(0.0, 0.5), SystemState::Amplitudes([zero, zero])),
            Err(QpeError::InvalidState(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = QpeConfig {
            estimation_wires: 0,
            ..QpeConfig::default()
        };
        assert!(matches!(PhaseEstimation::new(config), Err(QpeError::Config(_))));
    }
}
