//! Normalization strategies over matrices.
//!
//! - [`Normalizer::normalize`]: global min-max rescale into [0, 1]
//! - [`Normalizer::standardize`]: per-column z-score
//! - [`Normalizer::smooth`]: per-column trailing moving average
//!
//! All three are pure: they return a new matrix and never touch the input.

use crate::error::{NeuroError, Result};
use crate::features::FeatureExtractor;
use crate::matrix::Matrix;

/// Matrix rescaling operations.
pub struct Normalizer;

impl Normalizer {
    /// Min-max rescale using the global minimum and maximum.
    ///
    /// A constant matrix has range 0, which is treated as 1 so every value
    /// maps to 0.0. Ragged rows keep their shape.
    pub fn normalize(matrix: &Matrix) -> Matrix {
        if matrix.len() == 0 {
            return matrix.clone();
        }

        let min = matrix.values().fold(f64::INFINITY, f64::min);
        let max = matrix.values().fold(f64::NEG_INFINITY, f64::max);
        let range = if max - min == 0.0 { 1.0 } else { max - min };

        matrix.map(|v| (v - min) / range)
    }

    /// Per-column z-score: `(value - column mean) / column std-dev`.
    ///
    /// Columns with zero spread divide by 1 instead.
    ///
    /// # Errors
    /// [`NeuroError::DimensionMismatch`] if the rows differ in length.
    pub fn standardize(matrix: &Matrix) -> Result<Matrix> {
        matrix.require_rectangular()?;
        if matrix.is_empty() {
            return Ok(matrix.clone());
        }

        let means = FeatureExtractor::column_means(matrix);
        let stds: Vec<f64> = FeatureExtractor::column_std_devs(matrix)
            .into_iter()
            .map(|s| if s == 0.0 { 1.0 } else { s })
            .collect();

        let rows = matrix
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(j, &v)| (v - means[j]) / stds[j])
                    .collect()
            })
            .collect();

        Ok(Matrix::from_rows(rows))
    }

    /// Trailing simple moving average down each column.
    ///
    /// Row `i` of the output is the mean of rows `i + 1 - window ..= i` of
    /// the input (fewer rows at the start of the series).
    ///
    /// # Errors
    /// [`NeuroError::InvalidInput`] for `window == 0`,
    /// [`NeuroError::DimensionMismatch`] for ragged input.
    pub fn smooth(matrix: &Matrix, window: usize) -> Result<Matrix> {
        if window == 0 {
            return Err(NeuroError::InvalidInput(
                "moving average window must be at least 1".into(),
            ));
        }
        let width = matrix.require_rectangular()?;

        let mut running = vec![0.0; width];
        let mut out = Vec::with_capacity(matrix.n_rows());

        for (i, row) in matrix.rows().iter().enumerate() {
            for (acc, &v) in running.iter_mut().zip(row.iter()) {
                *acc += v;
            }
            if i >= window {
                for (acc, &old) in running.iter_mut().zip(matrix[i - window].iter()) {
                    *acc -= old;
                }
            }
            let n = (i + 1).min(window) as f64;
            out.push(running.iter().map(|&s| s / n).collect());
        }

        Ok(Matrix::from_rows(out))
    }
}
