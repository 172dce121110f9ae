//! Experiment configuration.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with QPE_ prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use qpe_adapter_sim::{NormalizationPolicy, SimulatorConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::phase::WrapPolicy;

/// Widest register the simulator is allowed to allocate.
const MAX_QUBITS_CEILING: u32 = 30;

/// Settings for a phase-estimation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QpeConfig {
    /// Number of estimation wires m (resolution 2^-m).
    #[serde(default = "default_estimation_wires")]
    pub estimation_wires: u32,

    /// RNG seed; entropy is used when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Accepted ‖U†U − I‖_F for constructed unitaries.
    #[serde(default = "default_unitarity_tolerance")]
    pub unitarity_tolerance: f64,

    /// Accepted |‖ψ‖ − 1| after each gate.
    #[serde(default = "default_normalization_tolerance")]
    pub normalization_tolerance: f64,

    /// What to do on normalization drift.
    #[serde(default)]
    pub normalization_policy: NormalizationPolicy,

    /// How Hamiltonian phases are wrapped into [0, 1).
    #[serde(default)]
    pub wrap_policy: WrapPolicy,

    /// Widest circuit the simulator accepts.
    #[serde(default = "default_max_qubits")]
    pub max_qubits: u32,
}

fn default_estimation_wires() -> u32 {
    3
}

fn default_unitarity_tolerance() -> f64 {
    1e-8
}

fn default_normalization_tolerance() -> f64 {
    1e-9
}

fn default_max_qubits() -> u32 {
    20
}

impl Default for QpeConfig {
    fn default() -> Self {
        Self {
            estimation_wires: default_estimation_wires(),
            seed: None,
            unitarity_tolerance: default_unitarity_tolerance(),
            normalization_tolerance: default_normalization_tolerance(),
            normalization_policy: NormalizationPolicy::default(),
            wrap_policy: WrapPolicy::default(),
            max_qubits: default_max_qubits(),
        }
    }
}

impl QpeConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: QpeConfig = serde_yaml_ng::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().merge_env()
    }

    /// Load with precedence: environment over file over defaults.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.merge_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply the `QPE_*` variables that are set; absent ones leave fields
    /// unchanged. A set but unparsable variable is an error.
    pub fn merge_env(self) -> Result<Self, ConfigError> {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    fn merge_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(v) = var("QPE_ESTIMATION_WIRES") {
            self.estimation_wires = parse_var("QPE_ESTIMATION_WIRES", &v)?;
        }
        if let Some(v) = var("QPE_SEED") {
            self.seed = Some(parse_var("QPE_SEED", &v)?);
        }
        if let Some(v) = var("QPE_UNITARITY_TOLERANCE") {
            self.unitarity_tolerance = parse_var("QPE_UNITARITY_TOLERANCE", &v)?;
        }
        if let Some(v) = var("QPE_NORMALIZATION_TOLERANCE") {
            self.normalization_tolerance = parse_var("QPE_NORMALIZATION_TOLERANCE", &v)?;
        }
        if let Some(v) = var("QPE_NORMALIZATION_POLICY") {
            self.normalization_policy = parse_var("QPE_NORMALIZATION_POLICY", &v)?;
        }
        if let Some(v) = var("QPE_WRAP_POLICY") {
            self.wrap_policy = parse_var("QPE_WRAP_POLICY", &v)?;
        }
        if let Some(v) = var("QPE_MAX_QUBITS") {
            self.max_qubits = parse_var("QPE_MAX_QUBITS", &v)?;
        }
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_qubits < 2 || self.max_qubits > MAX_QUBITS_CEILING {
            return Err(ConfigError::ValidationError(format!(
                "max_qubits must be between 2 and {MAX_QUBITS_CEILING}, got {}",
                self.max_qubits
            )));
        }

        if self.estimation_wires == 0 || self.estimation_wires >= self.max_qubits {
            return Err(ConfigError::ValidationError(format!(
                "estimation_wires must be between 1 and {} (max_qubits - 1), got {}",
                self.max_qubits - 1,
                self.estimation_wires
            )));
        }

        for (name, value) in [
            ("unitarity_tolerance", self.unitarity_tolerance),
            ("normalization_tolerance", self.normalization_tolerance),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }

        Ok(())
    }

    /// Settings for the statevector executor.
    pub fn simulator_config(&self) -> SimulatorConfig {
        SimulatorConfig {
            max_qubits: self.max_qubits,
            normalization_tolerance: self.normalization_tolerance,
            normalization_policy: self.normalization_policy,
        }
    }

    /// RNG seeded from `seed`, or from OS entropy when unset.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::ParseError(format!("{key}: cannot parse '{value}'")))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
