//! Similarity metrics for matrix comparison.
//!
//! Each metric has its own shape rules:
//!
//! - [`Metric::Euclidean`] zero-pads the smaller operand, so ragged or
//!   differently sized matrices still compare.
//! - [`Metric::RowNormalized`] requires identical shapes and scores 0.0
//!   otherwise.
//! - [`Metric::CosineColumnMeans`] compares per-column mean vectors and
//!   scores 0.0 when their lengths differ.

use crate::features::FeatureExtractor;
use crate::matrix::Matrix;
use serde::{Deserialize, Serialize};

/// Distance that maps to zero Euclidean confidence.
pub const DEFAULT_DISTANCE_SCALE: f64 = 10.0;

/// Available similarity metrics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Euclidean distance over flattened values (converted to confidence)
    #[default]
    Euclidean,
    /// Mean of `1 - |a - b|` per element, for inputs already in [0, 1]
    RowNormalized,
    /// Cosine similarity of the per-column mean vectors
    CosineColumnMeans,
}

impl Metric {
    /// Whether a lower raw score means a closer match.
    pub fn is_distance(self) -> bool {
        matches!(self, Metric::Euclidean)
    }
}

/// Similarity computation for matrices.
pub struct Similarity;

impl Similarity {
    /// Compute similarity using the specified metric and the default
    /// Euclidean scale.
    pub fn compute(a: &Matrix, b: &Matrix, metric: Metric) -> f64 {
        Self::compute_scaled(a, b, metric, DEFAULT_DISTANCE_SCALE)
    }

    /// Compute similarity, converting Euclidean distance with `scale`.
    ///
    /// Higher is always more similar.
    pub fn compute_scaled(a: &Matrix, b: &Matrix, metric: Metric, scale: f64) -> f64 {
        match metric {
            Metric::Euclidean => Self::euclidean(a, b, scale),
            Metric::RowNormalized => Self::row_normalized(a, b),
            Metric::CosineColumnMeans => Self::cosine_column_means(a, b),
        }
    }

    /// Euclidean distance converted to a bounded confidence.
    ///
    /// Returns `max(0, 1 - distance / scale)`: 1.0 for identical matrices,
    /// 0.0 at or beyond `scale`.
    pub fn euclidean(a: &Matrix, b: &Matrix, scale: f64) -> f64 {
        let distance = Self::euclidean_distance(a, b);
        (1.0 - distance / scale).max(0.0)
    }

    /// Raw Euclidean distance over flattened values.
    ///
    /// Both matrices are zero-padded to the larger row count, and each row
    /// pair to the longer of the two rows.
    pub fn euclidean_distance(a: &Matrix, b: &Matrix) -> f64 {
        let n_rows = a.n_rows().max(b.n_rows());

        let sum_sq: f64 = (0..n_rows)
            .map(|i| {
                let width = Self::row_len(a, i).max(Self::row_len(b, i));
                (0..width)
                    .map(|j| {
                        let diff = a.get_or_zero(i, j) - b.get_or_zero(i, j);
                        diff * diff
                    })
                    .sum::<f64>()
            })
            .sum();

        sum_sq.sqrt()
    }

    /// Per-row normalized similarity: mean of `1 - |a - b|`.
    ///
    /// Averaged over the elements of each row, then over rows. Returns 0.0
    /// when the row counts or any row lengths differ. Inputs outside [0, 1]
    /// can push the result outside [0, 1]; callers normalize first.
    pub fn row_normalized(a: &Matrix, b: &Matrix) -> f64 {
        if a.n_rows() != b.n_rows() || a.is_empty() {
            return 0.0;
        }
        if a.rows()
            .iter()
            .zip(b.rows().iter())
            .any(|(ra, rb)| ra.len() != rb.len())
        {
            return 0.0;
        }

        let total: f64 = a
            .rows()
            .iter()
            .zip(b.rows().iter())
            .map(|(ra, rb)| {
                if ra.is_empty() {
                    return 0.0;
                }
                let row_sum: f64 = ra
                    .iter()
                    .zip(rb.iter())
                    .map(|(&x, &y)| 1.0 - (x - y).abs())
                    .sum();
                row_sum / ra.len() as f64
            })
            .sum();

        total / a.n_rows() as f64
    }

    /// Cosine similarity of the per-column mean vectors.
    ///
    /// Returns 0.0 if either vector has zero magnitude or their lengths
    /// differ.
    pub fn cosine_column_means(a: &Matrix, b: &Matrix) -> f64 {
        let ma = FeatureExtractor::column_means(a);
        let mb = FeatureExtractor::column_means(b);
        Self::cosine(&ma, &mb)
    }

    /// Cosine similarity: dot(a, b) / (||a|| * ||b||)
    ///
    /// Returns a value in [-1, 1].
    pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
        if a.len() != b.len() {
            return 0.0;
        }

        let dot: f64 = a.iter().zip(b.iter()).map(|(&x, &y)| x * y).sum();
        let norm_a = a.iter().map(|&x| x * x).sum::<f64>().sqrt();
        let norm_b = b.iter().map(|&x| x * x).sum::<f64>().sqrt();

        if norm_a < 1e-10 || norm_b < 1e-10 {
            return 0.0;
        }

        dot / (norm_a * norm_b)
    }

    fn row_len(m: &Matrix, i: usize) -> usize {
        m.rows().get(i).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: Vec<Vec<f64>>) -> Matrix {
        Matrix::from_rows(rows)
    }

    #[test]
    fn test_euclidean_identity_and_symmetry() {
        let a = m(vec![vec![0.1, 0.2, 0.3], vec![1.0, -2.0, 4.0]]);
        let b = m(vec![vec![0.5, 0.0, 0.3], vec![2.0, 2.0, 1.0]]);

        assert_eq!(Similarity::euclidean_distance(&a, &a), 0.0);
        let ab = Similarity::euclidean_distance(&a, &b);
        let ba = Similarity::euclidean_distance(&b, &a);
        assert!((ab - ba).abs() < 1e-12);
        assert!(ab > 0.0);
    }

    #[test]
    fn test_euclidean_zero_pads_ragged() {
        let a = m(vec![vec![3.0]]);
        let b = m(vec![vec![0.0, 4.0]]);
        // a is padded to [3, 0]; diff (3, -4)
        assert!((Similarity::euclidean_distance(&a, &b) - 5.0).abs() < 1e-12);

        let extra_row = m(vec![vec![0.0, 4.0], vec![0.0, 0.0, 12.0]]);
        // b padded with a zero row; diff in row 1 is 12
        let d = Similarity::euclidean_distance(&b, &extra_row);
        assert!((d - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_euclidean_confidence() {
        let a = m(vec![vec![3.0]]);
        let b = m(vec![vec![0.0, 4.0]]);
        // distance 5, scale 10
        assert!((Similarity::euclidean(&a, &b, 10.0) - 0.5).abs() < 1e-12);
        // Clamped at zero beyond the scale
        assert_eq!(Similarity::euclidean(&a, &b, 2.0), 0.0);
        assert!((Similarity::euclidean(&a, &a, 10.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_row_normalized() {
        let a = m(vec![vec![0.0, 1.0], vec![0.5, 0.5]]);
        let b = m(vec![vec![0.0, 0.5], vec![0.5, 0.5]]);
        // row 0: (1 + 0.5) / 2 = 0.75; row 1: 1.0; mean 0.875
        assert!((Similarity::row_normalized(&a, &b) - 0.875).abs() < 1e-12);
        assert!((Similarity::row_normalized(&a, &a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_row_normalized_shape_mismatch_is_zero() {
        let a = m(vec![vec![0.0, 1.0]]);
        let fewer_cols = m(vec![vec![0.0]]);
        let more_rows = m(vec![vec![0.0, 1.0], vec![0.0, 1.0]]);
        assert_eq!(Similarity::row_normalized(&a, &fewer_cols), 0.0);
        assert_eq!(Similarity::row_normalized(&a, &more_rows), 0.0);
    }

    #[test]
    fn test_row_normalized_out_of_range_inputs() {
        // Documented limitation: no clipping.
        let a = m(vec![vec![0.0]]);
        let b = m(vec![vec![3.0]]);
        assert!((Similarity::row_normalized(&a, &b) - (-2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_self_similarity() {
        let a = m(vec![vec![0.1, 0.3, 0.2], vec![0.4, 0.6, 0.9]]);
        assert!((Similarity::cosine_column_means(&a, &a) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_cosine_degenerate_cases() {
        let zeros = m(vec![vec![0.0, 0.0]]);
        let a = m(vec![vec![1.0, 2.0]]);
        let wider = m(vec![vec![1.0, 2.0, 3.0]]);
        assert_eq!(Similarity::cosine_column_means(&zeros, &a), 0.0);
        assert_eq!(Similarity::cosine_column_means(&a, &wider), 0.0);
    }

    #[test]
    fn test_cosine_opposite() {
        let sim = Similarity::cosine(&[1.0, -1.0], &[-1.0, 1.0]);
        assert!((sim - (-1.0)).abs() < 1e-10);
    }

    #[test]
    fn test_compute_dispatches() {
        let a = m(vec![vec![0.2, 0.4]]);
        let b = m(vec![vec![0.3, 0.1]]);
        for metric in [Metric::Euclidean, Metric::RowNormalized, Metric::CosineColumnMeans] {
            let via_compute = Similarity::compute(&a, &b, metric);
            let direct = match metric {
                Metric::Euclidean => Similarity::euclidean(&a, &b, DEFAULT_DISTANCE_SCALE),
                Metric::RowNormalized => Similarity::row_normalized(&a, &b),
                Metric::CosineColumnMeans => Similarity::cosine_column_means(&a, &b),
            };
            assert!((direct - via_compute).abs() < 1e-12);
        }
    }

    #[test]
    fn test_metric_serde_names() {
        let json = serde_json::to_string(&Metric::CosineColumnMeans).unwrap();
        assert_eq!(json, "\"cosine_column_means\"");
        let back: Metric = serde_json::from_str("\"row_normalized\"").unwrap();
        assert_eq!(back, Metric::RowNormalized);
    }
}
