//! Circuit command implementation.

use anyhow::{Context, Result};
use serde_json::json;

use qpe_core::{QpeCircuitBuilder, QpeConfig, UnitaryFactory};

/// Execute the circuit command.
pub fn execute(config: QpeConfig, phases: &[f64]) -> Result<()> {
    let [phase_a, phase_b] = phases else {
        anyhow::bail!("Expected exactly two phases, got {}", phases.len());
    };

    let mut rng = config.rng();
    let unitary = UnitaryFactory::new(config.unitarity_tolerance)
        .build(*phase_a, *phase_b, &mut rng)
        .context("Failed to construct unitary")?;
    let qpe = QpeCircuitBuilder::new(unitary.matrix(), config.estimation_wires).build()?;

    let report = json!({
        "name": qpe.circuit.name(),
        "num_qubits": qpe.circuit.num_qubits(),
        "depth": qpe.circuit.depth(),
        "system": qpe.system,
        "estimation": qpe.estimation,
        "instructions": qpe.circuit.instructions(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
