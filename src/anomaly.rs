//! Z-score anomaly detection with per-label thresholds.
//!
//! Two baselines are supported:
//!
//! - **Self-referential**: column statistics come from the input matrix
//!   itself. The anomaly score is the sum of the flagged |z| values divided
//!   by the number of elements.
//! - **Reference**: column statistics come from a registered
//!   [`ReferenceAccumulator`]. The anomaly score is the mean Euclidean
//!   distance from each input row to the reference's column-mean row.
//!
//! In both modes every element whose |z| exceeds the cutoff (2.0 by
//! default) is reported in [`AnomalyResult::flagged`].

use crate::accumulator::ReferenceAccumulator;
use crate::config::{check_threshold, Config};
use crate::error::Result;
use crate::features::FeatureExtractor;
use crate::matrix::Matrix;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Where the column statistics came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Baseline {
    SelfReferential,
    Reference,
}

/// A single outlier value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlaggedValue {
    pub row: usize,
    pub column: usize,
    pub value: f64,
    /// |value - column mean| / column std-dev
    pub z_score: f64,
}

/// Outcome of [`AnomalyDetector::detect`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnomalyResult {
    /// Non-negative aggregate score
    pub anomaly_score: f64,
    /// `anomaly_score > threshold`
    pub is_anomalous: bool,
    /// `min(1, anomaly_score * 2)`
    pub confidence: f64,
    /// Threshold that was applied
    pub threshold: f64,
    pub baseline: Baseline,
    /// Values beyond the z cutoff, in row-major order
    pub flagged: Vec<FlaggedValue>,
}

/// Z-score outlier flagging and thresholded anomaly scoring.
#[derive(Clone, Debug)]
pub struct AnomalyDetector {
    z_cutoff: f64,
    default_threshold: f64,
    thresholds: BTreeMap<String, f64>,
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl AnomalyDetector {
    /// Create a detector from the cutoff and thresholds in `config`.
    pub fn new(config: &Config) -> Self {
        Self {
            z_cutoff: config.z_cutoff,
            default_threshold: config.default_threshold,
            thresholds: config.thresholds.clone(),
        }
    }

    pub fn z_cutoff(&self) -> f64 {
        self.z_cutoff
    }

    /// Threshold for `label`, falling back to the default for unknown or
    /// missing labels.
    pub fn threshold(&self, label: Option<&str>) -> f64 {
        label
            .and_then(|l| self.thresholds.get(l))
            .copied()
            .unwrap_or(self.default_threshold)
    }

    /// All per-label thresholds.
    pub fn thresholds(&self) -> &BTreeMap<String, f64> {
        &self.thresholds
    }

    /// Set the threshold for `label`.
    ///
    /// # Errors
    /// [`NeuroError::InvalidInput`](crate::NeuroError::InvalidInput) for a
    /// negative or non-finite value.
    pub fn update_threshold(&mut self, label: &str, value: f64) -> Result<()> {
        check_threshold(label, value)?;
        let previous = self.thresholds.insert(label.to_string(), value);
        debug!(label, value, previous = ?previous, "anomaly threshold updated");
        Ok(())
    }

    /// Score `matrix`, against `reference` when given and non-empty,
    /// otherwise against its own column statistics.
    pub fn detect(
        &self,
        matrix: &Matrix,
        label: Option<&str>,
        reference: Option<&ReferenceAccumulator>,
    ) -> AnomalyResult {
        let threshold = self.threshold(label);

        let (baseline, anomaly_score, flagged) = match reference.filter(|r| !r.is_empty()) {
            Some(reference) => {
                let means = reference.column_means();
                let stds = reference.column_std_devs();
                let flagged = self.flag(matrix, &means, &stds);
                let score = Self::mean_row_distance(matrix, &means);
                (Baseline::Reference, score, flagged)
            }
            None => {
                let means = FeatureExtractor::column_means(matrix);
                let stds = FeatureExtractor::column_std_devs(matrix);
                let flagged = self.flag(matrix, &means, &stds);
                let total = matrix.len();
                let score = if total == 0 {
                    0.0
                } else {
                    flagged.iter().map(|f| f.z_score).sum::<f64>() / total as f64
                };
                (Baseline::SelfReferential, score, flagged)
            }
        };

        let result = AnomalyResult {
            anomaly_score,
            is_anomalous: anomaly_score > threshold,
            confidence: (anomaly_score * 2.0).min(1.0),
            threshold,
            baseline,
            flagged,
        };

        debug!(
            label = label.unwrap_or("unknown"),
            baseline = ?result.baseline,
            score = result.anomaly_score,
            flagged = result.flagged.len(),
            anomalous = result.is_anomalous,
            "anomaly detection"
        );
        result
    }

    /// Per-element z-scores against the given column statistics.
    ///
    /// Columns beyond the statistics (ragged input, or a reference narrower
    /// than the input) use mean 0 and std-dev 1.
    pub fn z_scores(matrix: &Matrix, means: &[f64], stds: &[f64]) -> Matrix {
        let rows = matrix
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(j, &v)| {
                        let mean = means.get(j).copied().unwrap_or(0.0);
                        let std = match stds.get(j).copied() {
                            Some(s) if s != 0.0 => s,
                            _ => 1.0,
                        };
                        (v - mean).abs() / std
                    })
                    .collect()
            })
            .collect();
        Matrix::from_rows(rows)
    }

    fn flag(&self, matrix: &Matrix, means: &[f64], stds: &[f64]) -> Vec<FlaggedValue> {
        let z = Self::z_scores(matrix, means, stds);
        let mut flagged = Vec::new();
        for (i, (row, z_row)) in matrix.rows().iter().zip(z.rows().iter()).enumerate() {
            for (j, (&value, &z_score)) in row.iter().zip(z_row.iter()).enumerate() {
                if z_score > self.z_cutoff {
                    flagged.push(FlaggedValue {
                        row: i,
                        column: j,
                        value,
                        z_score,
                    });
                }
            }
        }
        flagged
    }

    /// Mean over input rows of the distance to `profile`, zero-padding the
    /// shorter of the two.
    fn mean_row_distance(matrix: &Matrix, profile: &[f64]) -> f64 {
        if matrix.is_empty() {
            return 0.0;
        }

        let total: f64 = matrix
            .rows()
            .iter()
            .map(|row| {
                let width = row.len().max(profile.len());
                (0..width)
                    .map(|j| {
                        let a = row.get(j).copied().unwrap_or(0.0);
                        let b = profile.get(j).copied().unwrap_or(0.0);
                        (a - b) * (a - b)
                    })
                    .sum::<f64>()
                    .sqrt()
            })
            .sum();

        total / matrix.n_rows() as f64
    }
}
