//! QPE Command-Line Interface
//!
//! Runs quantum phase estimation experiments on the local statevector
//! simulator and prints the readout distribution.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::{self, OutputFormat};
use commands::{circuit, estimate, hamiltonian, version};

/// QPE - quantum phase estimation on a statevector simulator
#[derive(Parser)]
#[command(name = "qpe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML configuration file (QPE_* environment variables take precedence)
    #[arg(short, long, global = true, env = "QPE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the eigenphases of a random unitary with prescribed spectrum
    Estimate {
        /// The two eigenphases, in [0, 1)
        #[arg(long, num_args = 2, value_names = ["A", "B"], default_values_t = [0.25, 0.875])]
        phases: Vec<f64>,

        /// Number of estimation wires (overrides the configuration)
        #[arg(short, long)]
        wires: Option<u32>,

        /// RNG seed (overrides the configuration)
        #[arg(long)]
        seed: Option<u64>,

        /// Initial system state (eigen0, eigen1, zero, superposition)
        #[arg(long, default_value = "eigen0")]
        state: String,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Estimate the eigenvalues of a single-qubit Hamiltonian
    Hamiltonian {
        /// Pauli coefficients of c_I·I + c_X·X + c_Y·Y + c_Z·Z
        #[arg(
            long,
            num_args = 4,
            value_names = ["I", "X", "Y", "Z"],
            allow_negative_numbers = true,
            required_unless_present = "random",
            conflicts_with = "random"
        )]
        pauli: Option<Vec<f64>>,

        /// Draw a random Hermitian instead
        #[arg(long)]
        random: bool,

        /// Evolution time T (defaults to 0.9·π / max|λ|)
        #[arg(short, long)]
        duration: Option<f64>,

        /// Number of estimation wires (overrides the configuration)
        #[arg(short, long)]
        wires: Option<u32>,

        /// RNG seed (overrides the configuration)
        #[arg(long)]
        seed: Option<u64>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Print the phase-estimation gate sequence as JSON
    Circuit {
        /// Number of estimation wires (overrides the configuration)
        #[arg(short, long)]
        wires: Option<u32>,

        /// The two eigenphases, in [0, 1)
        #[arg(long, num_args = 2, value_names = ["A", "B"], default_values_t = [0.25, 0.875])]
        phases: Vec<f64>,

        /// RNG seed (overrides the configuration)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show version information
    Version,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Estimate {
            phases,
            wires,
            seed,
            state,
            format,
        } => {
            let config = common::load_config(config_path, wires, seed)?;
            let format: OutputFormat = format.parse()?;
            estimate::execute(config, &phases, &state, format)
        }

        Commands::Hamiltonian {
            pauli,
            random,
            duration,
            wires,
            seed,
            format,
        } => {
            let config = common::load_config(config_path, wires, seed)?;
            let format: OutputFormat = format.parse()?;
            hamiltonian::execute(config, pauli.as_deref(), random, duration, format)
        }

        Commands::Circuit {
            wires,
            phases,
            seed,
        } => {
            let config = common::load_config(config_path, wires, seed)?;
            circuit::execute(config, &phases)
        }

        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = dispatch(cli) {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_defaults() {
        let cli = Cli::try_parse_from(["qpe", "estimate"]).unwrap();
        match cli.command {
            Commands::Estimate {
                phases,
                wires,
                state,
                format,
                ..
            } => {
                assert_eq!(phases, vec![0.25, 0.875]);
                assert_eq!(wires, None);
                assert_eq!(state, "eigen0");
                assert_eq!(format, "table");
            }
            _ => panic!("expected estimate"),
        }
    }

    #[test]
    fn test_estimate_requires_two_phases() {
        assert!(Cli::try_parse_from(["qpe", "estimate", "--phases", "0.1"]).is_err());
        let cli =
            Cli::try_parse_from(["qpe", "-vv", "estimate", "--phases", "0.1", "0.2", "-w", "5"])
                .unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_hamiltonian_source_is_exclusive() {
        assert!(Cli::try_parse_from(["qpe", "hamiltonian"]).is_err());
        assert!(
            Cli::try_parse_from(["qpe", "hamiltonian", "--random", "--pauli", "0", "1", "0", "0"])
                .is_err()
        );
        let cli = Cli::try_parse_from([
            "qpe", "hamiltonian", "--pauli", "0", "-0.5", "0", "1", "--duration", "1.5",
        ])
        .unwrap();
        match cli.command {
            Commands::Hamiltonian {
                pauli, duration, ..
            } => {
                assert_eq!(pauli, Some(vec![0.0, -0.5, 0.0, 1.0]));
                assert_eq!(duration, Some(1.5));
            }
            _ => panic!("expected hamiltonian"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["qpe", "circuit", "--config", "qpe.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("qpe.yaml")));
    }
}
