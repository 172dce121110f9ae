//! Probability distributions over estimation-register bitstrings.

use serde::{Deserialize, Serialize};

use crate::error::{QpeError, QpeResult};

/// Accepted |Σp − 1|.
const MASS_TOLERANCE: f64 = 1e-6;

/// Entries down to this negative value are treated as rounding noise.
const NEGATIVE_NOISE: f64 = -1e-12;

/// Outcome probabilities of an m-bit register, indexed big-endian.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDistribution")]
pub struct ProbabilityDistribution {
    num_bits: u32,
    probabilities: Vec<f64>,
}

/// Unvalidated wire form; deserialization goes through [`ProbabilityDistribution::new`].
#[derive(Deserialize)]
struct RawDistribution {
    num_bits: u32,
    probabilities: Vec<f64>,
}

impl TryFrom<RawDistribution> for ProbabilityDistribution {
    type Error = QpeError;

    fn try_from(raw: RawDistribution) -> QpeResult<Self> {
        Self::new(raw.num_bits, raw.probabilities)
    }
}

impl ProbabilityDistribution {
    /// Validate and wrap raw probabilities.
    ///
    /// Requires `2^num_bits` finite entries that are nonnegative (tiny
    /// negative rounding noise is clamped to zero) and sum to one within
    /// `1e-6`.
    pub fn new(num_bits: u32, mut probabilities: Vec<f64>) -> QpeResult<Self> {
        let expected = 1usize
            .checked_shl(num_bits)
            .ok_or_else(|| QpeError::InvalidDistribution(format!("{num_bits} bits is too wide")))?;
        if probabilities.len() != expected {
            return Err(QpeError::InvalidDistribution(format!(
                "expected {expected} entries for {num_bits} bits, got {}",
                probabilities.len()
            )));
        }
        for (i, p) in probabilities.iter_mut().enumerate() {
            if !p.is_finite() || *p < NEGATIVE_NOISE {
                return Err(QpeError::InvalidDistribution(format!(
                    "entry {i} is {p}"
                )));
            }
            *p = p.max(0.0);
        }
        let total: f64 = probabilities.iter().sum();
        if (total - 1.0).abs() > MASS_TOLERANCE {
            return Err(QpeError::InvalidDistribution(format!(
                "total mass is {total}"
            )));
        }
        Ok(Self {
            num_bits,
            probabilities,
        })
    }

    /// Infer the width from the number of entries.
    pub fn from_probabilities(probabilities: Vec<f64>) -> QpeResult<Self> {
        let len = probabilities.len();
        if !len.is_power_of_two() {
            return Err(QpeError::InvalidDistribution(format!(
                "{len} entries is not a power of two"
            )));
        }
        Self::new(len.trailing_zeros(), probabilities)
    }

    /// Register width m.
    pub fn num_bits(&self) -> u32 {
        self.num_bits
    }

    /// Number of outcomes, 2^m.
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// Always false: a distribution has at least one outcome.
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// All probabilities, indexed by outcome.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Probability of outcome `index` (zero when out of range).
    pub fn probability(&self, index: usize) -> f64 {
        self.probabilities.get(index).copied().unwrap_or(0.0)
    }

    /// Most probable outcome; the lowest index wins ties.
    pub fn argmax(&self) -> usize {
        self.probabilities
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |(best, best_p), (i, &p)| {
                if p > best_p { (i, p) } else { (best, best_p) }
            })
            .0
    }

    /// Big-endian bitstring of `index`, zero-padded to m characters.
    pub fn bitstring(&self, index: usize) -> String {
        format!("{:0width$b}", index, width = self.num_bits as usize)
    }

    /// Outcomes with probability at least `threshold`, most probable first.
    pub fn peaks(&self, threshold: f64) -> Vec<(usize, f64)> {
        let mut peaks: Vec<(usize, f64)> = self
            .probabilities
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, p)| p >= threshold)
            .collect();
        peaks.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        peaks
    }

    /// Σp.
    pub fn total_mass(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    /// Iterate over `(index, probability)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.probabilities.iter().copied().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let dist = ProbabilityDistribution::new(2, vec![0.1, 0.6, 0.0, 0.3]).unwrap();
        assert_eq!(dist.num_bits(), 2);
        assert_eq!(dist.len(), 4);
        assert_eq!(dist.argmax(), 1);
        assert_eq!(dist.bitstring(1), "01");
        assert_eq!(dist.bitstring(2), "10");
        assert_eq!(dist.probability(9), 0.0);
        assert!((dist.total_mass() - 1.0).abs() < 1e-12);
        assert_eq!(dist.peaks(0.25), vec![(1, 0.6), (3, 0.3)]);
    }

    #[test]
    fn test_clamps_rounding_noise() {
        let dist = ProbabilityDistribution::new(1, vec![1.0, -1e-15]).unwrap();
        assert_eq!(dist.probability(1), 0.0);
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(ProbabilityDistribution::new(2, vec![0.5, 0.5]).is_err());
        assert!(ProbabilityDistribution::new(1, vec![0.7, 0.7]).is_err());
        assert!(ProbabilityDistribution::new(1, vec![1.5, -0.5]).is_err());
        assert!(ProbabilityDistribution::new(1, vec![f64::NAN, 1.0]).is_err());
        assert!(ProbabilityDistribution::from_probabilities(vec![0.5, 0.25, 0.25]).is_err());
    }

    #[test]
    fn test_argmax_tie_prefers_lowest_index() {
        let dist = ProbabilityDistribution::from_probabilities(vec![0.25; 4]).unwrap();
        assert_eq!(dist.argmax(), 0);
    }

    #[test]
    fn test_serializes_to_json() {
        let dist = ProbabilityDistribution::new(1, vec![0.25, 0.75]).unwrap();
        let json = serde_json::to_string(&dist).unwrap();
        assert_eq!(json, r#"{"num_bits":1,"probabilities":[0.25,0.75]}"#);
    }

    #[test]
    fn test_deserialization_validates() {
        let dist: ProbabilityDistribution =
            serde_json::from_str(r#"{"num_bits":1,"probabilities":[0.25,0.75]}"#).unwrap();
        assert_eq!(dist.probability(1), 0.75);

        let bad = [
            r#"{"num_bits":3,"probabilities":[-5.0]}"#,
            r#"{"num_bits":1,"probabilities":[0.7,0.7]}"#,
            r#"{"num_bits":1,"probabilities":[1.5,-0.5]}"#,
        ];
        for json in bad {
            assert!(serde_json::from_str::<ProbabilityDistribution>(json).is_err(), "{json}");
        }
    }
}
