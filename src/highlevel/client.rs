//! Convenience wrapper that owns a [`Classifier`] and an
//! [`AnomalyDetector`] and wires reference lookup between them.
//!
//! For full control, use [`Classifier`], [`AnomalyDetector`] and the
//! statistics types directly.

use crate::anomaly::{AnomalyDetector, AnomalyResult};
use crate::classifier::{ClassificationResult, Classifier, Match, TrainingFit};
use crate::config::Config;
use crate::error::Result;
use crate::features::{FeatureExtractor, FeatureVector};
use crate::matrix::Matrix;
use crate::memory::{LabeledPattern, PatternStore};
use crate::normalize::Normalizer;
use crate::similarity::{Metric, Similarity};

/// Convenience wrapper over the statistics, classification and anomaly
/// layers.
///
/// `Analyzer` owns exactly one [`PatternStore`] (inside its classifier).
/// [`Analyzer::detect_anomalies`] looks up the reference baseline for the
/// requested label in that store before handing off to the detector.
///
/// # Example
///
/// ```rust
/// use neurosig::highlevel::Analyzer;
/// use neurosig::{LabeledPattern, Matrix};
///
/// let mut analyzer = Analyzer::default();
/// analyzer.train(vec![
///     LabeledPattern::new(Matrix::from_rows(vec![vec![0.1, 0.2, 0.3]]), "schizophrenia").unwrap(),
///     LabeledPattern::new(Matrix::from_rows(vec![vec![0.9, 0.8, 0.7]]), "bipolar").unwrap(),
/// ]).unwrap();
///
/// let result = analyzer.classify(&Matrix::from_rows(vec![vec![0.85, 0.8, 0.75]])).unwrap();
/// assert_eq!(result.label, "bipolar");
///
/// let anomalies = analyzer.detect_anomalies(&Matrix::filled(4, 3, 0.5), Some("control"));
/// assert!(!anomalies.is_anomalous);
/// ```
#[derive(Clone, Debug)]
pub struct Analyzer {
    classifier: Classifier,
    detector: AnomalyDetector,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Analyzer {
    /// Create an analyzer from a validated configuration.
    pub fn new(config: Config) -> Self {
        let detector = AnomalyDetector::new(&config);
        Self {
            classifier: Classifier::new(config),
            detector,
        }
    }

    /// Validate `config` first, then build.
    pub fn try_new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn metric(&self) -> Metric {
        self.classifier.metric()
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn detector(&self) -> &AnomalyDetector {
        &self.detector
    }

    pub fn store(&self) -> &PatternStore {
        self.classifier.store()
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Descriptive statistics of a matrix.
    pub fn extract(&self, matrix: &Matrix) -> FeatureVector {
        FeatureExtractor::extract(matrix)
    }

    /// Global min-max rescale into [0, 1].
    pub fn normalize(&self, matrix: &Matrix) -> Matrix {
        Normalizer::normalize(matrix)
    }

    /// Per-column z-score.
    pub fn standardize(&self, matrix: &Matrix) -> Result<Matrix> {
        Normalizer::standardize(matrix)
    }

    /// Per-column trailing moving average.
    pub fn smooth(&self, matrix: &Matrix, window: usize) -> Result<Matrix> {
        Normalizer::smooth(matrix, window)
    }

    /// Similarity under the configured metric and distance scale.
    pub fn similarity(&self, a: &Matrix, b: &Matrix) -> f64 {
        let config = self.classifier.config();
        Similarity::compute_scaled(a, b, config.metric, config.distance_scale)
    }

    // =========================================================================
    // Patterns
    // =========================================================================

    /// Replace the stored training patterns.
    pub fn train(&mut self, patterns: Vec<LabeledPattern>) -> Result<()> {
        self.classifier.train(patterns)
    }

    /// Extend the reference baseline for `label`.
    pub fn add_reference(&mut self, label: &str, matrix: &Matrix) -> Result<()> {
        self.classifier.add_reference(label, matrix)
    }

    // =========================================================================
    // Classification
    // =========================================================================

    pub fn classify(&self, matrix: &Matrix) -> Result<ClassificationResult> {
        self.classifier.classify(matrix)
    }

    pub fn ranked_matches(&self, matrix: &Matrix) -> Result<Vec<Match>> {
        self.classifier.ranked_matches(matrix)
    }

    /// Training-set fit. See [`Classifier::accuracy`].
    pub fn accuracy(&self) -> Result<TrainingFit> {
        self.classifier.accuracy()
    }

    // =========================================================================
    // Anomalies
    // =========================================================================

    /// Detect anomalies, using the reference baseline registered for
    /// `label` when there is one and the matrix's own statistics otherwise.
    pub fn detect_anomalies(&self, matrix: &Matrix, label: Option<&str>) -> AnomalyResult {
        let reference = label.and_then(|l| self.store().reference(l));
        self.detector.detect(matrix, label, reference)
    }

    /// Change the anomaly threshold for `label`.
    pub fn update_threshold(&mut self, label: &str, value: f64) -> Result<()> {
        self.detector.update_threshold(label, value)
    }
}
