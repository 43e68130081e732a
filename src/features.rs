//! Feature extraction: descriptive statistics over a matrix.
//!
//! Every statistic is computed over the flattened, row-major values of the
//! matrix. An empty matrix (or one whose rows are all empty) produces a
//! [`FeatureVector`] with `count == 0` and every scalar at 0.0.

use crate::matrix::Matrix;
use serde::{Deserialize, Serialize};

/// Scalar statistics derived from a matrix.
///
/// Always computed fresh by [`FeatureExtractor::extract`]; never mutated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Arithmetic mean of all values
    pub mean: f64,
    /// Population variance (divides by `count`)
    pub variance: f64,
    /// Square root of the variance
    pub std_dev: f64,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
    /// Number of values
    pub count: usize,
    /// Mean absolute difference between consecutive values.
    ///
    /// `None` when fewer than two values are present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_change: Option<f64>,
}

impl FeatureVector {
    /// Spread between the largest and smallest value.
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Statistics over matrices.
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Extract the feature vector of a matrix.
    pub fn extract(matrix: &Matrix) -> FeatureVector {
        Self::extract_values(&matrix.flatten())
    }

    /// Extract features from an already flattened sequence.
    pub fn extract_values(values: &[f64]) -> FeatureVector {
        if values.is_empty() {
            return FeatureVector::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let avg_change = (values.len() >= 2).then(|| {
            let total: f64 = values.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
            total / (values.len() - 1) as f64
        });

        FeatureVector {
            mean,
            variance,
            std_dev: variance.sqrt(),
            min,
            max,
            count: values.len(),
            avg_change,
        }
    }

    /// Per-column means over rows.
    ///
    /// The result has the width of the longest row. For ragged input each
    /// column is averaged over the rows that actually have that column.
    pub fn column_means(matrix: &Matrix) -> Vec<f64> {
        let (sums, counts) = Self::column_sums(matrix);
        sums.iter()
            .zip(counts.iter())
            .map(|(&s, &c)| if c == 0 { 0.0 } else { s / c as f64 })
            .collect()
    }

    /// Per-column population standard deviations over rows.
    pub fn column_std_devs(matrix: &Matrix) -> Vec<f64> {
        let means = Self::column_means(matrix);
        let mut sq = vec![0.0; means.len()];
        let mut counts = vec![0usize; means.len()];

        for row in matrix.rows() {
            for (j, &v) in row.iter().enumerate() {
                let d = v - means[j];
                sq[j] += d * d;
                counts[j] += 1;
            }
        }

        sq.iter()
            .zip(counts.iter())
            .map(|(&s, &c)| if c == 0 { 0.0 } else { (s / c as f64).sqrt() })
            .collect()
    }

    fn column_sums(matrix: &Matrix) -> (Vec<f64>, Vec<usize>) {
        let width = matrix.max_width();
        let mut sums = vec![0.0; width];
        let mut counts = vec![0usize; width];

        for row in matrix.rows() {
            for (j, &v) in row.iter().enumerate() {
                sums[j] += v;
                counts[j] += 1;
            }
        }

        (sums, counts)
    }
}
