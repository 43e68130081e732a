//! Reference accumulation: append-only baselines per label.
//!
//! A [`ReferenceAccumulator`] keeps every row it has been given (the
//! concatenated reference matrix) together with running per-column sums, so
//! the column-mean profile of the baseline is available without rescanning
//! the rows.
//!
//! Accumulating preserves frequency: a recording added twice weighs twice as
//! much in the column means.

use crate::features::FeatureExtractor;
use crate::matrix::Matrix;
use serde::{Deserialize, Serialize};

/// Concatenated rows plus running column sums.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceAccumulator {
    /// Every accumulated row, in arrival order
    rows: Matrix,
    /// Running sum per column
    sums: Vec<f64>,
    /// Rows contributing to each column
    counts: Vec<usize>,
}

impl ReferenceAccumulator {
    /// Create a new empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accumulated rows.
    pub fn count(&self) -> usize {
        self.rows.n_rows()
    }

    /// Width of the widest accumulated row.
    pub fn width(&self) -> usize {
        self.sums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append every row of `matrix`.
    pub fn add(&mut self, matrix: &Matrix) {
        for row in matrix.rows() {
            self.add_row(row);
        }
    }

    /// Append a single row.
    pub fn add_row(&mut self, row: &[f64]) {
        if row.len() > self.sums.len() {
            self.sums.resize(row.len(), 0.0);
            self.counts.resize(row.len(), 0);
        }
        for (j, &v) in row.iter().enumerate() {
            self.sums[j] += v;
            self.counts[j] += 1;
        }
        self.rows.push_row(row.to_vec());
    }

    /// Per-column means of everything accumulated so far.
    pub fn column_means(&self) -> Vec<f64> {
        self.sums
            .iter()
            .zip(self.counts.iter())
            .map(|(&s, &c)| if c == 0 { 0.0 } else { s / c as f64 })
            .collect()
    }

    /// Per-column population standard deviations of the accumulated rows.
    pub fn column_std_devs(&self) -> Vec<f64> {
        FeatureExtractor::column_std_devs(&self.rows)
    }

    /// The concatenated reference matrix.
    pub fn matrix(&self) -> &Matrix {
        &self.rows
    }

    /// Merge another accumulator into this one.
    pub fn merge(&mut self, other: &ReferenceAccumulator) {
        self.add(&other.rows);
    }

    /// Clear the accumulator to start fresh.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
