//! Estimate command implementation.
//!
//! Builds a random unitary with the requested eigenphases and reads them
//! back through the phase-estimation circuit.

use anyhow::{Context, Result};
use console::style;
use serde_json::json;
use tracing::info;

use qpe_core::{PhaseEstimation, QpeConfig, UnitaryFactory};

use super::common::{OutputFormat, describe_state, parse_state, print_distribution};

/// Execute the estimate command.
pub fn execute(config: QpeConfig, phases: &[f64], state: &str, format: OutputFormat) -> Result<()> {
    let [phase_a, phase_b] = phases else {
        anyhow::bail!("Expected exactly two phases, got {}", phases.len());
    };

    let mut rng = config.rng();
    let unitary = UnitaryFactory::new(config.unitarity_tolerance)
        .build(*phase_a, *phase_b, &mut rng)
        .context("Failed to construct unitary")?;
    let system_state = parse_state(state, &mut rng)?;
    info!(deviation = unitary.unitarity_deviation(), "unitary ready");

    let m = config.estimation_wires;
    let runner = PhaseEstimation::new(config)?;
    let outcome = runner.run(&unitary, system_state.clone())?;

    match format {
        OutputFormat::Json => {
            let report = json!({
                "phases": [phase_a, phase_b],
                "estimation_wires": m,
                "state": describe_state(&system_state),
                "true_phases": outcome.true_phases,
                "distribution": outcome.distribution,
                "histogram": outcome.histogram,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => {
            println!(
                "{} Estimating phases {} with {} wires, system in {}",
                style("→").cyan().bold(),
                style(format!("[{phase_a}, {phase_b}]")).green(),
                style(m).yellow(),
                describe_state(&system_state)
            );
            println!(
                "  Circuit: {} qubits, {} gates, depth {}",
                outcome.circuit.num_qubits(),
                outcome.circuit.len(),
                outcome.circuit.depth()
            );
            print_distribution(&outcome.distribution, &outcome.true_phases);
            if let Some((phase, weight)) = outcome.histogram.most_likely() {
                println!(
                    "  Most likely: φ = {} ({:.2}%)",
                    style(format!("{phase:.6}")).cyan().bold(),
                    weight * 100.0
                );
            }
        }
    }

    Ok(())
}
