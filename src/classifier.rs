//! Nearest-pattern classification.
//!
//! A [`Classifier`] owns a [`PatternStore`] and scores a query matrix
//! against every stored pattern with the configured [`Metric`]. The best
//! score wins; ties go to the pattern that was stored first.
//!
//! # Example
//!
//! ```rust
//! use neurosig::{Classifier, Config, LabeledPattern, Matrix};
//!
//! let mut classifier = Classifier::new(Config::default());
//! classifier.train(vec![
//!     LabeledPattern::new(Matrix::from_rows(vec![vec![0.1, 0.2, 0.3]]), "schizophrenia").unwrap(),
//!     LabeledPattern::new(Matrix::from_rows(vec![vec![0.9, 0.8, 0.7]]), "bipolar").unwrap(),
//! ]).unwrap();
//!
//! let result = classifier.classify(&Matrix::from_rows(vec![vec![0.1, 0.2, 0.3]])).unwrap();
//! assert_eq!(result.label, "schizophrenia");
//! assert_eq!(result.confidence, 1.0);
//! ```

use crate::config::{Config, Validation};
use crate::error::{NeuroError, Result};
use crate::features::{FeatureExtractor, FeatureVector};
use crate::matrix::Matrix;
use crate::memory::{LabeledPattern, PatternStore};
use crate::similarity::{Metric, Similarity};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, trace};

/// One stored pattern's score against a query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub label: String,
    /// Similarity clamped to [0, 1]
    pub confidence: f64,
}

/// Outcome of [`Classifier::classify`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Label of the best-scoring pattern
    pub label: String,
    /// Confidence of the best-scoring pattern, in [0, 1]
    pub confidence: f64,
    /// Every pattern at or above the match threshold, best first
    pub matches: Vec<Match>,
}

/// How well the stored patterns classify themselves.
///
/// Every stored pattern is classified against a store that contains it, so
/// this measures fit to the training set. It says nothing about accuracy on
/// unseen data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingFit {
    /// Patterns whose predicted label equals their own
    pub correct: usize,
    /// Patterns evaluated
    pub total: usize,
    /// `correct / total`
    pub fraction: f64,
}

impl TrainingFit {
    /// The fraction as a percentage in [0, 100].
    pub fn percentage(&self) -> f64 {
        self.fraction * 100.0
    }
}

/// Internal score: `rank` orders candidates (higher is better), while
/// `confidence` is what gets reported.
#[derive(Clone, Copy, Debug)]
struct Score {
    rank: f64,
    confidence: f64,
}

/// Nearest-pattern classifier over a privately owned [`PatternStore`].
#[derive(Clone, Debug)]
pub struct Classifier {
    config: Config,
    store: PatternStore,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Classifier {
    /// Create a classifier with an empty store.
    pub fn new(config: Config) -> Self {
        let store = PatternStore::new(config.validation);
        Self { config, store }
    }

    /// Shorthand for a default configuration with a specific metric.
    pub fn with_metric(metric: Metric) -> Self {
        Self::new(Config::default().with_metric(metric))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn metric(&self) -> Metric {
        self.config.metric
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &PatternStore {
        &self.store
    }

    /// Replace the stored patterns. See [`PatternStore::train`].
    pub fn train(&mut self, patterns: Vec<LabeledPattern>) -> Result<()> {
        self.store.train(patterns)
    }

    /// Extend the reference baseline for `label`.
    /// See [`PatternStore::add_reference`].
    pub fn add_reference(&mut self, label: &str, matrix: &Matrix) -> Result<()> {
        self.store.add_reference(label, matrix)
    }

    /// Feature vector of a matrix.
    pub fn extract(&self, matrix: &Matrix) -> FeatureVector {
        FeatureExtractor::extract(matrix)
    }

    /// Classify `matrix` against every stored pattern.
    ///
    /// # Errors
    /// - [`NeuroError::NotTrained`] if the store is empty.
    /// - Under [`Validation::Strict`]: [`NeuroError::EmptyInput`] for a
    ///   query without values, [`NeuroError::DimensionMismatch`] for ragged
    ///   rows or a width different from the training width.
    pub fn classify(&self, matrix: &Matrix) -> Result<ClassificationResult> {
        self.check_query(matrix)?;

        let scores = self.score_all(matrix);
        let (best_index, best) = scores
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, Score)>, (i, &s)| match best {
                Some((_, b)) if s.rank <= b.rank => best,
                _ => Some((i, s)),
            })
            .ok_or(NeuroError::NotTrained)?;

        let label = self.store.patterns()[best_index].label.clone();
        let matches = self.collect_matches(&scores);

        debug!(
            label = %label,
            confidence = best.confidence,
            candidates = scores.len(),
            above_threshold = matches.len(),
            "classified"
        );

        Ok(ClassificationResult {
            label,
            confidence: best.confidence,
            matches,
        })
    }

    /// Every stored pattern whose confidence reaches the match threshold,
    /// best first. Equal confidences keep insertion order.
    pub fn ranked_matches(&self, matrix: &Matrix) -> Result<Vec<Match>> {
        self.check_query(matrix)?;
        Ok(self.collect_matches(&self.score_all(matrix)))
    }

    /// Training-set fit: classify every stored pattern against the store
    /// (itself included) and count how many get their own label back.
    pub fn accuracy(&self) -> Result<TrainingFit> {
        if self.store.is_empty() {
            return Err(NeuroError::NotTrained);
        }

        let mut correct = 0;
        for pattern in self.store.patterns() {
            if self.classify(&pattern.matrix)?.label == pattern.label {
                correct += 1;
            }
        }

        let total = self.store.len();
        let fit = TrainingFit {
            correct,
            total,
            fraction: correct as f64 / total as f64,
        };
        debug!(correct, total, "training fit computed");
        Ok(fit)
    }

    fn check_query(&self, matrix: &Matrix) -> Result<()> {
        if self.store.is_empty() {
            return Err(NeuroError::NotTrained);
        }
        if self.config.validation == Validation::Lenient {
            return Ok(());
        }

        if matrix.len() == 0 {
            return Err(NeuroError::EmptyInput("query matrix has no values".into()));
        }
        let width = matrix.require_rectangular()?;
        match self.store.dimension() {
            Some(expected) if expected != width => Err(NeuroError::DimensionMismatch {
                expected,
                got: width,
            }),
            _ => Ok(()),
        }
    }

    fn score_all(&self, query: &Matrix) -> Vec<Score> {
        if tracing::enabled!(tracing::Level::TRACE) {
            let features = FeatureExtractor::extract(query);
            trace!(?features, "query features");
        }

        self.store
            .patterns()
            .iter()
            .map(|p| self.score(query, &p.matrix))
            .collect()
    }

    fn score(&self, query: &Matrix, pattern: &Matrix) -> Score {
        match self.config.metric {
            Metric::Euclidean => {
                let distance = Similarity::euclidean_distance(query, pattern);
                Score {
                    rank: -distance,
                    confidence: (1.0 - distance / self.config.distance_scale).max(0.0),
                }
            }
            metric => {
                let sim = Similarity::compute(query, pattern, metric);
                Score {
                    rank: sim,
                    confidence: sim.clamp(0.0, 1.0),
                }
            }
        }
    }

    fn collect_matches(&self, scores: &[Score]) -> Vec<Match> {
        let mut matches: Vec<(f64, Match)> = self
            .store
            .patterns()
            .iter()
            .zip(scores.iter())
            .filter(|(_, s)| s.confidence >= self.config.match_threshold)
            .map(|(p, s)| {
                (
                    s.rank,
                    Match {
                        label: p.label.clone(),
                        confidence: s.confidence,
                    },
                )
            })
            .collect();

        // Stable sort: ties stay in insertion order.
        matches.sort_by(|a, b| {
            b.1.confidence
                .partial_cmp(&a.1.confidence)
                .unwrap_or(Ordering::Equal)
                .then(b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal))
        });
        matches.into_iter().map(|(_, m)| m).collect()
    }
}
