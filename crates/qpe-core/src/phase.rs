//! Phase extraction: bitstrings to phases, eigenvalues to phases and back.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;
use tracing::debug;

use crate::distribution::ProbabilityDistribution;
use crate::error::{QpeError, QpeResult};

/// How a raw phase λT/2π is brought into [0, 1).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WrapPolicy {
    /// Full modulo 1. Valid for any λT.
    #[default]
    Modulo,
    /// Add 1 once to negative phases. Only valid for |λT| < 2π; results
    /// outside [0, 1) are reported as [`QpeError::PhaseWrapBoundary`].
    SingleStep,
}

impl WrapPolicy {
    /// Wrap `raw` into [0, 1).
    pub fn wrap(self, raw: f64) -> QpeResult<f64> {
        if !raw.is_finite() {
            return Err(QpeError::NonFinite(raw));
        }
        match self {
            WrapPolicy::Modulo => {
                let wrapped = raw.rem_euclid(1.0);
                // rem_euclid rounds tiny negative inputs up to exactly 1.0
                Ok(if wrapped >= 1.0 { 0.0 } else { wrapped })
            }
            WrapPolicy::SingleStep => {
                let wrapped = if raw < 0.0 {
                    // tiny negative inputs round up to exactly 1.0
                    let shifted = raw + 1.0;
                    if shifted >= 1.0 { 0.0 } else { shifted }
                } else {
                    raw
                };
                if (0.0..1.0).contains(&wrapped) {
                    Ok(wrapped)
                } else {
                    Err(QpeError::PhaseWrapBoundary { raw, wrapped })
                }
            }
        }
    }
}

impl fmt::Display for WrapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WrapPolicy::Modulo => write!(f, "modulo"),
            WrapPolicy::SingleStep => write!(f, "single-step"),
        }
    }
}

impl std::str::FromStr for WrapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "modulo" => Ok(Self::Modulo),
            "single-step" => Ok(Self::SingleStep),
            other => Err(format!("unknown wrap policy '{other}'")),
        }
    }
}

/// Phase grid i/2^m with the probability of each bitstring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseHistogram {
    /// Phase values i/2^m, ascending.
    pub values: Vec<f64>,
    /// Probability mass at each value.
    pub weights: Vec<f64>,
}

impl PhaseHistogram {
    /// Number of bins.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when there are no bins.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The heaviest bin as `(phase, weight)`.
    pub fn most_likely(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .zip(self.weights.iter().copied())
            .fold(None, |best, (v, w)| match best {
                Some((_, bw)) if bw >= w => best,
                _ => Some((v, w)),
            })
    }

    /// Iterate over `(phase, weight)`.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values.iter().copied().zip(self.weights.iter().copied())
    }
}

/// Converts estimation-register readouts and Hamiltonian spectra to phases.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseExtractor {
    wrap: WrapPolicy,
}

impl PhaseExtractor {
    /// Create an extractor with the given wrap policy.
    pub fn new(wrap: WrapPolicy) -> Self {
        Self { wrap }
    }

    /// Active wrap policy.
    pub fn wrap_policy(&self) -> WrapPolicy {
        self.wrap
    }

    /// Map bitstring i to phase i/2^m, weighted by its probability.
    ///
    /// Phases that are not multiples of 2^-m spread over neighboring bins;
    /// that is the expected shape, not an error.
    pub fn from_distribution(&self, distribution: &ProbabilityDistribution) -> PhaseHistogram {
        let scale = distribution.len() as f64;
        let (values, weights) = distribution
            .iter()
            .map(|(i, p)| (i as f64 / scale, p))
            .unzip();
        PhaseHistogram { values, weights }
    }

    /// Phases λT/2π of exp(iHT), wrapped into [0, 1).
    pub fn from_hamiltonian(&self, eigenvalues: &[f64], duration: f64) -> QpeResult<Vec<f64>> {
        check_duration(duration)?;
        let phases = eigenvalues
            .iter()
            .map(|&lambda| {
                if !lambda.is_finite() {
                    return Err(QpeError::NonFinite(lambda));
                }
                self.wrap.wrap(lambda * duration / TAU)
            })
            .collect::<QpeResult<Vec<_>>>()?;
        debug!(?phases, duration, wrap = %self.wrap, "mapped eigenvalues to phases");
        Ok(phases)
    }
}

/// Invert the phase mapping: λ = 2π·φ/T, reading φ ≥ 0.5 as φ − 1.
///
/// Recovers λ exactly when |λT| < π.
pub fn eigenvalue_from_phase(phase: f64, duration: f64) -> QpeResult<f64> {
    check_duration(duration)?;
    if !phase.is_finite() {
        return Err(QpeError::NonFinite(phase));
    }
    let centered = if phase >= 0.5 { phase - 1.0 } else { phase };
    Ok(TAU * centered / duration)
}

fn check_duration(duration: f64) -> QpeResult<()> {
    if duration.is_finite() && duration > 0.0 {
        Ok(())
    } else {
        Err(QpeError::InvalidDuration(duration))
    }
}
