//! Deterministic synthetic recordings per named condition.
//!
//! The simulator stands in for real acquisition: it manufactures matrices
//! whose shape and statistics differ by condition, so the classifier and the
//! anomaly detector have something to chew on in demos, benchmarks and
//! tests.
//!
//! Every sample is reproducible. The RNG for a sample is seeded from the
//! SHA-256 hash of `(global_seed || condition || index)`, so the same
//! inputs always give the same matrix on every machine.

use crate::error::Result;
use crate::matrix::Matrix;
use crate::memory::LabeledPattern;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

/// Largest per-sample phase offset, in radians.
const PHASE_JITTER: f64 = 0.3;

/// Shape of a condition's signal:
/// `baseline + amplitude * sin(frequency * t + phase) + noise * u`,
/// with `u` uniform in [-1, 1] and the result clipped to [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConditionProfile {
    pub baseline: f64,
    pub amplitude: f64,
    pub frequency: f64,
    pub noise: f64,
}

impl ConditionProfile {
    /// Built-in profile for a known condition name.
    pub fn known(condition: &str) -> Option<Self> {
        let profile = match condition {
            "schizophrenia" => Self {
                baseline: 0.3,
                amplitude: 0.25,
                frequency: 0.9,
                noise: 0.08,
            },
            "bipolar" => Self {
                baseline: 0.7,
                amplitude: 0.15,
                frequency: 0.3,
                noise: 0.05,
            },
            "control" => Self {
                baseline: 0.5,
                amplitude: 0.05,
                frequency: 0.1,
                noise: 0.02,
            },
            _ => return None,
        };
        Some(profile)
    }

    /// Profile for any condition: the built-in one if known, otherwise one
    /// derived from the hash of the name.
    pub fn for_condition(condition: &str, global_seed: u64) -> Self {
        if let Some(profile) = Self::known(condition) {
            return profile;
        }

        let hash = digest(global_seed, condition.as_bytes());
        let unit = |b: u8| b as f64 / 255.0;
        Self {
            baseline: 0.2 + 0.6 * unit(hash[0]),
            amplitude: 0.05 + 0.2 * unit(hash[1]),
            frequency: 0.1 + unit(hash[2]),
            noise: 0.01 + 0.07 * unit(hash[3]),
        }
    }
}

/// Generator of reproducible synthetic matrices.
#[derive(Clone, Debug, Default)]
pub struct Simulator {
    global_seed: u64,
}

impl Simulator {
    /// Create a simulator with the default seed (0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a simulator with a specific global seed.
    pub fn with_seed(global_seed: u64) -> Self {
        Self { global_seed }
    }

    pub fn global_seed(&self) -> u64 {
        self.global_seed
    }

    /// The first sample for `condition`.
    pub fn generate(&self, condition: &str, rows: usize, channels: usize) -> Matrix {
        self.sample(condition, rows, channels, 0)
    }

    /// The `index`-th sample for `condition`.
    ///
    /// Every sample of a condition shares its phase up to a small jitter;
    /// different indices differ in jitter and noise. The same index always
    /// gives the same matrix.
    pub fn sample(&self, condition: &str, rows: usize, channels: usize, index: u64) -> Matrix {
        let profile = ConditionProfile::for_condition(condition, self.global_seed);
        let mut rng = self.rng_for(condition, index);

        let base_phase = digest(self.global_seed, condition.as_bytes())[4] as f64 / 255.0
            * std::f64::consts::TAU;
        let phase = base_phase + rng.gen_range(-PHASE_JITTER..=PHASE_JITTER);
        let data = (0..rows)
            .map(|t| {
                (0..channels)
                    .map(|c| {
                        let angle = profile.frequency * t as f64 + phase + 0.5 * c as f64;
                        let u: f64 = rng.gen_range(-1.0..=1.0);
                        let v = profile.baseline + profile.amplitude * angle.sin() + profile.noise * u;
                        v.clamp(0.0, 1.0)
                    })
                    .collect()
            })
            .collect();

        Matrix::from_rows(data)
    }

    /// `per_condition` labeled samples for each condition, grouped by
    /// condition in the order given.
    pub fn training_set(
        &self,
        conditions: &[&str],
        per_condition: usize,
        rows: usize,
        channels: usize,
    ) -> Result<Vec<LabeledPattern>> {
        let mut patterns = Vec::with_capacity(conditions.len() * per_condition);
        for &condition in conditions {
            for i in 0..per_condition {
                let matrix = self.sample(condition, rows, channels, i as u64);
                patterns.push(LabeledPattern::new(matrix, condition)?);
            }
        }
        Ok(patterns)
    }

    fn rng_for(&self, condition: &str, index: u64) -> ChaCha8Rng {
        let mut key = condition.as_bytes().to_vec();
        key.extend_from_slice(&index.to_le_bytes());
        let hash = digest(self.global_seed, &key);

        let mut seed = [0u8; 8];
        seed.copy_from_slice(&hash[..8]);
        ChaCha8Rng::seed_from_u64(u64::from_le_bytes(seed))
    }
}

fn digest(global_seed: u64, bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(bytes);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}
