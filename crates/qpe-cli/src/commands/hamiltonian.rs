//! Hamiltonian command implementation.
//!
//! Evolves a single-qubit Hamiltonian for time T, runs phase estimation on
//! each eigenvector of exp(iHT) and converts the readout back to eigenvalues.

use std::f64::consts::PI;

use anyhow::{Context, Result};
use console::style;
use rand::Rng;
use serde_json::json;
use tracing::{info, warn};

use qpe_core::{
    Hamiltonian, PhaseEstimation, PhaseExtractor, PhaseUnitary, QpeConfig, SystemState,
    eigenvalue_from_phase,
};

use super::common::{OutputFormat, print_distribution};

/// Pick the Hamiltonian from exactly one of `--pauli` or `--random`.
fn select_hamiltonian<R: Rng + ?Sized>(
    pauli: Option<&[f64]>,
    random: bool,
    rng: &mut R,
) -> Result<Hamiltonian> {
    match (pauli, random) {
        (Some(&[c_i, c_x, c_y, c_z]), false) => Ok(Hamiltonian::from_pauli(c_i, c_x, c_y, c_z)),
        (Some(other), false) => {
            anyhow::bail!("Expected four Pauli coefficients, got {}", other.len())
        }
        (None, true) => Ok(Hamiltonian::random(2, 1.0, rng)),
        (Some(_), true) => anyhow::bail!("--pauli and --random are mutually exclusive"),
        (None, false) => anyhow::bail!("Either --pauli or --random is required"),
    }
}

/// Execute the hamiltonian command.
pub fn execute(
    config: QpeConfig,
    pauli: Option<&[f64]>,
    random: bool,
    duration: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    let mut rng = config.rng();
    let h = select_hamiltonian(pauli, random, &mut rng)?;

    let eigenvalues = h.eigenvalues().context("Eigendecomposition failed")?;
    let radius = eigenvalues.iter().fold(0.0_f64, |m, l| m.max(l.abs()));
    let duration = match duration {
        Some(t) => t,
        None if radius > 0.0 => 0.9 * PI / radius,
        None => 1.0,
    };
    if radius * duration >= PI {
        warn!(
            "|λT| = {:.3} ≥ π: eigenvalues read back from phases may be off by a multiple of 2π/T",
            radius * duration
        );
    }

    let extractor = PhaseExtractor::new(config.wrap_policy);
    let true_phases = extractor.from_hamiltonian(&eigenvalues, duration)?;
    let unitary = PhaseUnitary::from_hamiltonian(&h, duration, config.unitarity_tolerance)?;
    info!(duration, ?eigenvalues, "evolution ready");

    let m = config.estimation_wires;
    let runner = PhaseEstimation::new(config)?;

    let mut rows = Vec::with_capacity(eigenvalues.len());
    for (i, (&lambda, &phase)) in eigenvalues.iter().zip(&true_phases).enumerate() {
        let outcome = runner.run(&unitary, SystemState::Eigenstate(i))?;
        let (estimate, weight) = outcome
            .histogram
            .most_likely()
            .context("Empty readout distribution")?;
        let recovered = eigenvalue_from_phase(estimate, duration)?;
        rows.push((lambda, phase, estimate, weight, recovered, outcome));
    }

    match format {
        OutputFormat::Json => {
            let eigenstates: Vec<_> = rows
                .iter()
                .map(|(lambda, phase, estimate, weight, recovered, outcome)| {
                    json!({
                        "eigenvalue": lambda,
                        "true_phase": phase,
                        "estimated_phase": estimate,
                        "probability": weight,
                        "estimated_eigenvalue": recovered,
                        "distribution": outcome.distribution,
                    })
                })
                .collect();
            let report = json!({
                "hamiltonian": h.matrix().iter().map(|z| [z.re, z.im]).collect::<Vec<_>>(),
                "duration": duration,
                "estimation_wires": m,
                "wrap_policy": extractor.wrap_policy(),
                "eigenstates": eigenstates,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => {
            println!(
                "{} Hamiltonian eigenvalues {:?}, T = {}, {} wires",
                style("→").cyan().bold(),
                eigenvalues,
                style(format!("{duration:.6}")).yellow(),
                m
            );
            for (i, row) in rows.iter().enumerate() {
                let (lambda, phase, estimate, weight, recovered, outcome) = row;
                println!(
                    "\n  Eigenstate {}: λ = {:.6}, φ = {:.6}",
                    style(i).bold(),
                    lambda,
                    phase
                );
                print_distribution(&outcome.distribution, std::slice::from_ref(phase));
                println!(
                    "  Estimated φ = {} ({:.2}%), λ ≈ {} (error {:.2e})",
                    style(format!("{estimate:.6}")).cyan().bold(),
                    weight * 100.0,
                    style(format!("{recovered:.6}")).green(),
                    (recovered - lambda).abs()
                );
            }
        }
    }

    Ok(())
}
