//! Matrix type for neurosig.
//!
//! A matrix is an ordered sequence of rows, each row one multi-channel
//! sample. Rows should all have the same width, but the type itself does
//! not enforce it: operations that need a rectangular shape call
//! [`Matrix::require_rectangular`].

use crate::error::{NeuroError, Result};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Rows of `f64` readings, one row per time step.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Matrix {
    rows: Vec<Vec<f64>>,
}

impl Matrix {
    /// Create an empty (zero-row) matrix.
    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    /// Create a matrix from raw rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    /// A `rows` x `columns` matrix filled with `value`.
    pub fn filled(rows: usize, columns: usize, value: f64) -> Self {
        Self {
            rows: vec![vec![value; columns]; rows],
        }
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// True when the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total number of values across all rows.
    pub fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Width of the longest row (0 for an empty matrix).
    pub fn max_width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Width shared by every row, or `None` if empty or ragged.
    pub fn width(&self) -> Option<usize> {
        let first = self.rows.first()?.len();
        self.rows
            .iter()
            .all(|row| row.len() == first)
            .then_some(first)
    }

    /// True when every row has the same length. An empty matrix counts.
    pub fn is_rectangular(&self) -> bool {
        self.is_empty() || self.width().is_some()
    }

    /// Check that every row has the width of the first and return it.
    ///
    /// Returns `Ok(0)` for an empty matrix.
    pub fn require_rectangular(&self) -> Result<usize> {
        let Some(first) = self.rows.first() else {
            return Ok(0);
        };
        let expected = first.len();
        match self.rows.iter().find(|row| row.len() != expected) {
            Some(row) => Err(NeuroError::DimensionMismatch {
                expected,
                got: row.len(),
            }),
            None => Ok(expected),
        }
    }

    /// Get the rows as a slice.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Consume the matrix and return its rows.
    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.rows
    }

    /// Iterate over all values in row-major order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().flat_map(|row| row.iter().copied())
    }

    /// Flatten to a single row-major vector.
    pub fn flatten(&self) -> Vec<f64> {
        self.values().collect()
    }

    /// Append the rows of `other` below this matrix.
    pub fn extend_rows(&mut self, other: &Matrix) {
        self.rows.extend(other.rows.iter().cloned());
    }

    /// Append a single row.
    pub fn push_row(&mut self, row: Vec<f64>) {
        self.rows.push(row);
    }

    /// Apply `f` to every value, preserving shape.
    pub fn map(&self, mut f: impl FnMut(f64) -> f64) -> Matrix {
        Matrix {
            rows: self
                .rows
                .iter()
                .map(|row| row.iter().map(|&v| f(v)).collect())
                .collect(),
        }
    }

    /// Value at `(row, column)`, or 0.0 when outside the matrix.
    ///
    /// Used by ragged-tolerant metrics that zero-pad the smaller operand.
    pub fn get_or_zero(&self, row: usize, column: usize) -> f64 {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .copied()
            .unwrap_or(0.0)
    }
}

impl From<Vec<Vec<f64>>> for Matrix {
    fn from(rows: Vec<Vec<f64>>) -> Self {
        Self::from_rows(rows)
    }
}

impl Index<usize> for Matrix {
    type Output = [f64];

    fn index(&self, index: usize) -> &Self::Output {
        &self.rows[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_queries() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        assert_eq!(m.n_rows(), 3);
        assert_eq!(m.len(), 6);
        assert_eq!(m.width(), Some(2));
        assert!(m.is_rectangular());
        assert_eq!(&m[1], &[3.0, 4.0]);
    }

    #[test]
    fn test_ragged_detection() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]);
        assert_eq!(m.width(), None);
        assert_eq!(m.max_width(), 2);
        assert!(!m.is_rectangular());
        match m.require_rectangular() {
            Err(NeuroError::DimensionMismatch { expected, got }) => {
                assert_eq!(expected, 2);
                assert_eq!(got, 1);
            }
            other => panic!("expected DimensionMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_is_rectangular() {
        let m = Matrix::empty();
        assert!(m.is_rectangular());
        assert_eq!(m.require_rectangular().unwrap(), 0);
        assert_eq!(m.max_width(), 0);
    }

    #[test]
    fn test_get_or_zero_pads() {
        let m = Matrix::from_rows(vec![vec![1.0]]);
        assert_eq!(m.get_or_zero(0, 0), 1.0);
        assert_eq!(m.get_or_zero(0, 3), 0.0);
        assert_eq!(m.get_or_zero(5, 0), 0.0);
    }

    #[test]
    fn test_serializes_as_nested_array() {
        let m = Matrix::from_rows(vec![vec![0.5, 1.0]]);
        assert_eq!(serde_json::to_string(&m).unwrap(), "[[0.5,1.0]]");
        let back: Matrix = serde_json::from_str("[[0.5,1.0]]").unwrap();
        assert_eq!(back, m);
    }
}
