//! PatternStore: labeled training examples plus per-label references.
//!
//! The store keeps two collections that never feed each other:
//!
//! - an ordered sequence of [`LabeledPattern`]s, replaced wholesale by
//!   [`PatternStore::train`] and scanned by the classifier;
//! - a map of label → [`ReferenceAccumulator`], grown row by row through
//!   [`PatternStore::add_reference`] and used as an anomaly baseline.
//!
//! Views such as [`PatternStore::labels`] and [`PatternStore::prototype`]
//! are derived from the current patterns on every call; nothing derived is
//! cached.
//!
//! # Example
//!
//! ```rust
//! use neurosig::memory::{LabeledPattern, PatternStore};
//! use neurosig::{Matrix, Validation};
//!
//! let mut store = PatternStore::new(Validation::Strict);
//! store.train(vec![
//!     LabeledPattern::new(Matrix::from_rows(vec![vec![0.1, 0.2, 0.3]]), "schizophrenia").unwrap(),
//!     LabeledPattern::new(Matrix::from_rows(vec![vec![0.9, 0.8, 0.7]]), "bipolar").unwrap(),
//! ]).unwrap();
//!
//! assert_eq!(store.labels(), vec!["schizophrenia", "bipolar"]);
//! assert_eq!(store.dimension(), Some(3));
//! ```

use crate::accumulator::ReferenceAccumulator;
use crate::config::Validation;
use crate::error::{NeuroError, Result};
use crate::matrix::Matrix;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

// =============================================================================
// LabeledPattern
// =============================================================================

/// A training example: a matrix and the class it belongs to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabeledPattern {
    #[serde(alias = "pattern")]
    pub matrix: Matrix,
    pub label: String,
}

impl LabeledPattern {
    /// Pair a matrix with a label.
    ///
    /// # Errors
    /// [`NeuroError::InvalidInput`] if `label` is empty.
    pub fn new(matrix: Matrix, label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        check_label(&label)?;
        Ok(Self { matrix, label })
    }
}

fn check_label(label: &str) -> Result<()> {
    if label.is_empty() {
        return Err(NeuroError::InvalidInput("label must not be empty".into()));
    }
    Ok(())
}

// =============================================================================
// PatternStore
// =============================================================================

/// Ordered training patterns and per-label reference baselines.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PatternStore {
    validation: Validation,
    patterns: Vec<LabeledPattern>,
    /// Row width recorded by the last successful `train`
    dimension: Option<usize>,
    references: BTreeMap<String, ReferenceAccumulator>,
}

impl PatternStore {
    /// Create an empty store with the given shape policy.
    pub fn new(validation: Validation) -> Self {
        Self {
            validation,
            ..Self::default()
        }
    }

    /// Replace every stored pattern with `patterns`.
    ///
    /// Under [`Validation::Strict`] the set must be non-empty, every matrix
    /// non-empty and rectangular, and all of them the same width. Under
    /// [`Validation::Lenient`] an empty set simply empties the store.
    /// On error the previous contents are kept. References are untouched.
    pub fn train(&mut self, patterns: Vec<LabeledPattern>) -> Result<()> {
        for p in &patterns {
            check_label(&p.label)?;
        }

        let dimension = match self.validation {
            Validation::Strict => Some(Self::strict_dimension(&patterns)?),
            Validation::Lenient => patterns
                .first()
                .and_then(|p| p.matrix.rows().first())
                .map(Vec::len),
        };

        debug!(
            patterns = patterns.len(),
            dimension = ?dimension,
            "pattern store retrained"
        );

        self.patterns = patterns;
        self.dimension = dimension;
        Ok(())
    }

    fn strict_dimension(patterns: &[LabeledPattern]) -> Result<usize> {
        if patterns.is_empty() {
            return Err(NeuroError::EmptyInput("training set has no patterns".into()));
        }

        let mut expected = None;
        for p in patterns {
            if p.matrix.len() == 0 {
                return Err(NeuroError::EmptyInput(format!(
                    "training pattern for '{}' has no values",
                    p.label
                )));
            }
            let width = p.matrix.require_rectangular()?;
            let expected = *expected.get_or_insert(width);
            if width != expected {
                return Err(NeuroError::DimensionMismatch {
                    expected,
                    got: width,
                });
            }
        }

        Ok(expected.unwrap_or(0))
    }

    /// Append the rows of `matrix` to the reference baseline for `label`.
    ///
    /// Creates the baseline if it does not exist yet. Training patterns are
    /// not affected.
    pub fn add_reference(&mut self, label: &str, matrix: &Matrix) -> Result<()> {
        check_label(label)?;
        let reference = self.references.entry(label.to_string()).or_default();
        reference.add(matrix);
        debug!(
            label,
            added = matrix.n_rows(),
            total = reference.count(),
            "reference extended"
        );
        Ok(())
    }

    /// Stored training patterns, in insertion order.
    pub fn patterns(&self) -> &[LabeledPattern] {
        &self.patterns
    }

    /// Distinct training labels in first-seen order.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for p in &self.patterns {
            if !labels.contains(&p.label.as_str()) {
                labels.push(&p.label);
            }
        }
        labels
    }

    /// Elementwise average of every training pattern carrying `label`.
    ///
    /// Each cell is averaged over the patterns that have it, so ragged
    /// patterns do not drag values toward zero. `None` if no pattern has the
    /// label.
    pub fn prototype(&self, label: &str) -> Option<Matrix> {
        let members: Vec<&Matrix> = self
            .patterns
            .iter()
            .filter(|p| p.label == label)
            .map(|p| &p.matrix)
            .collect();
        if members.is_empty() {
            return None;
        }

        let n_rows = members.iter().map(|m| m.n_rows()).max().unwrap_or(0);
        let rows = (0..n_rows)
            .map(|i| {
                let width = members
                    .iter()
                    .filter_map(|m| m.rows().get(i))
                    .map(Vec::len)
                    .max()
                    .unwrap_or(0);
                (0..width)
                    .map(|j| {
                        let cells: Vec<f64> = members
                            .iter()
                            .filter_map(|m| m.rows().get(i).and_then(|r| r.get(j)))
                            .copied()
                            .collect();
                        cells.iter().sum::<f64>() / cells.len() as f64
                    })
                    .collect()
            })
            .collect();

        Some(Matrix::from_rows(rows))
    }

    /// Reference baseline for `label`, if one has been registered.
    pub fn reference(&self, label: &str) -> Option<&ReferenceAccumulator> {
        self.references.get(label)
    }

    /// Labels that have a reference baseline, sorted.
    pub fn reference_labels(&self) -> Vec<&str> {
        self.references.keys().map(String::as_str).collect()
    }

    /// Drop a reference baseline. Returns `true` if it existed.
    pub fn remove_reference(&mut self, label: &str) -> bool {
        self.references.remove(label).is_some()
    }

    /// Drop every reference baseline.
    pub fn clear_references(&mut self) {
        self.references.clear();
    }

    /// Row width recorded at training time.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn validation(&self) -> Validation {
        self.validation
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Persist to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

// =============================================================================
// Tests
// =============================================================================
