//! Shared helpers for CLI commands.

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use console::style;
use num_complex::Complex64;
use rand::Rng;

use qpe_core::{ProbabilityDistribution, QpeConfig, SystemState};

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("Unknown output format: '{other}'. Available: table, json"),
        }
    }
}

/// Load configuration and apply command-line overrides.
pub fn load_config(
    path: Option<&Path>,
    wires: Option<u32>,
    seed: Option<u64>,
) -> Result<QpeConfig> {
    let mut config = QpeConfig::load(path).with_context(|| match path {
        Some(p) => format!("Failed to load configuration from {}", p.display()),
        None => "Failed to load configuration".to_string(),
    })?;
    if let Some(m) = wires {
        config.estimation_wires = m;
    }
    if seed.is_some() {
        config.seed = seed;
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Parse a `--state` value. `superposition` draws random amplitudes.
pub fn parse_state<R: Rng + ?Sized>(state: &str, rng: &mut R) -> Result<SystemState> {
    match state.to_lowercase().as_str() {
        "zero" | "0" => Ok(SystemState::Zero),
        "eigen0" => Ok(SystemState::Eigenstate(0)),
        "eigen1" => Ok(SystemState::Eigenstate(1)),
        "superposition" | "random" => {
            let v = qpe_linalg::random_unit_vector(2, rng)?;
            Ok(SystemState::Amplitudes([v[0], v[1]]))
        }
        other => anyhow::bail!(
            "Unknown state: '{other}'. Available: eigen0, eigen1, zero, superposition"
        ),
    }
}

/// Short human-readable form of a system state.
pub fn describe_state(state: &SystemState) -> String {
    match state {
        SystemState::Zero => "|0⟩".to_string(),
        SystemState::Eigenstate(i) => format!("eigenvector {i}"),
        SystemState::Amplitudes([a, b]) => {
            format!("{}|0⟩ + {}|1⟩", fmt_complex(*a), fmt_complex(*b))
        }
    }
}

fn fmt_complex(z: Complex64) -> String {
    format!("({:.3}{:+.3}i)", z.re, z.im)
}

/// Print the readout distribution as a bar chart, heaviest first.
pub fn print_distribution(dist: &ProbabilityDistribution, true_phases: &[f64]) {
    let n = dist.len() as f64;
    let mut sorted: Vec<(usize, f64)> = dist.iter().collect();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    println!(
        "\n{} Readout ({} estimation wires):",
        style("✓").green().bold(),
        dist.num_bits()
    );

    let shown: Vec<_> = sorted.iter().filter(|(_, p)| *p >= 1e-4).take(16).collect();
    for (index, prob) in &shown {
        let bar: String = "█".repeat((prob * 50.0).round() as usize);
        println!(
            "  {}: φ ≈ {:<8.5} ({:>6.2}%) {}",
            style(dist.bitstring(*index)).cyan(),
            *index as f64 / n,
            prob * 100.0,
            style(bar).green()
        );
    }

    let hidden = dist.len() - shown.len();
    if hidden > 0 {
        println!("  ... and {hidden} more outcomes below 0.01%");
    }

    if !true_phases.is_empty() {
        let grid: Vec<String> = true_phases
            .iter()
            .map(|p| format!("{p:.6} (×2^m = {:.3})", p * n))
            .collect();
        println!("\n  True phases: {}", style(grid.join(", ")).yellow());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::io::Write;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("csv".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_parse_state() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(parse_state("zero", &mut rng).unwrap(), SystemState::Zero);
        assert_eq!(parse_state("Eigen1", &mut rng).unwrap(), SystemState::Eigenstate(1));
        match parse_state("superposition", &mut rng).unwrap() {
            SystemState::Amplitudes([a, b]) => {
                assert!((a.norm_sqr() + b.norm_sqr() - 1.0).abs() < 1e-12);
            }
            other => panic!("unexpected state {other:?}"),
        }
        assert!(parse_state("eigen7", &mut rng).is_err());
    }

    #[test]
    fn test_load_config_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"estimation_wires: 4\nseed: 9\n").unwrap();

        let config = load_config(Some(file.path()), None, None).unwrap();
        assert_eq!(config.estimation_wires, 4);
        assert_eq!(config.seed, Some(9));

        let config = load_config(Some(file.path()), Some(6), Some(1)).unwrap();
        assert_eq!(config.estimation_wires, 6);
        assert_eq!(config.seed, Some(1));

        assert!(load_config(None, Some(0), None).is_err());
    }

    #[test]
    fn test_describe_state() {
        assert_eq!(describe_state(&SystemState::Eigenstate(1)), "eigenvector 1");
        let s = describe_state(&SystemState::Amplitudes([
            Complex64::new(0.6, 0.0),
            Complex64::new(0.0, -0.8),
        ]));
        assert_eq!(s, "(0.600+0.000i)|0⟩ + (0.000-0.800i)|1⟩");
    }
}
