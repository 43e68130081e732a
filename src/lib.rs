//! # neurosig: pattern matching for small multi-channel time series
//!
//! neurosig takes short multi-channel recordings (a [`Matrix`] of rows, one
//! row per time step) and does three things with them:
//!
//! - summarizes them ([`FeatureExtractor`]) and flags outlier samples
//!   ([`AnomalyDetector`]);
//! - stores labeled example patterns ([`memory::PatternStore`]);
//! - classifies new recordings against the stored examples
//!   ([`Classifier`]) with a caller-selected [`Metric`].
//!
//! It is a nearest-match toy, not a diagnostic tool: labels such as
//! "schizophrenia" or "bipolar" are just class names.
//!
//! ## Quick Start
//!
//! ```rust
//! use neurosig::{Classifier, Config, LabeledPattern, Matrix, Metric};
//!
//! let mut classifier = Classifier::new(Config::default().with_metric(Metric::Euclidean));
//! classifier.train(vec![
//!     LabeledPattern::new(Matrix::from_rows(vec![vec![0.1, 0.2, 0.3]]), "schizophrenia")?,
//!     LabeledPattern::new(Matrix::from_rows(vec![vec![0.9, 0.8, 0.7]]), "bipolar")?,
//! ])?;
//!
//! let result = classifier.classify(&Matrix::from_rows(vec![vec![0.9, 0.8, 0.7]]))?;
//! assert_eq!(result.label, "bipolar");
//! # Ok::<(), neurosig::NeuroError>(())
//! ```
//!
//! ## Layers
//!
//! - Statistics: [`Matrix`], [`FeatureExtractor`], [`Normalizer`],
//!   [`Similarity`], [`ReferenceAccumulator`]
//! - Memory: [`memory::PatternStore`], [`memory::LabeledPattern`]
//! - Decisions: [`Classifier`], [`AnomalyDetector`]
//! - Convenience: [`highlevel::Analyzer`], [`simulate::Simulator`],
//!   [`Config`]

pub mod accumulator;
pub mod anomaly;
pub mod classifier;
pub mod config;
pub mod error;
pub mod features;
pub mod highlevel;
pub mod matrix;
pub mod memory;
pub mod normalize;
pub mod similarity;
pub mod simulate;

// Re-exports for convenience
pub use accumulator::ReferenceAccumulator;
pub use anomaly::{AnomalyDetector, AnomalyResult, Baseline, FlaggedValue};
pub use classifier::{ClassificationResult, Classifier, Match, TrainingFit};
pub use config::{Config, Validation};
pub use error::{NeuroError, Result};
pub use features::{FeatureExtractor, FeatureVector};
pub use highlevel::Analyzer;
pub use matrix::Matrix;
pub use memory::{LabeledPattern, PatternStore};
pub use normalize::Normalizer;
pub use similarity::{Metric, Similarity};
pub use simulate::Simulator;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_conditions_are_separable() {
        let sim = Simulator::with_seed(7);
        let conditions = ["schizophrenia", "bipolar", "control"];

        let mut classifier = Classifier::default();
        classifier
            .train(sim.training_set(&conditions, 4, 24, 4).unwrap())
            .unwrap();

        // Indices past the training range are unseen samples
        for condition in conditions {
            let probe = sim.sample(condition, 24, 4, 100);
            let result = classifier.classify(&probe).unwrap();
            assert_eq!(result.label, condition);
        }
    }

    #[test]
    fn test_pipeline_normalize_then_classify() {
        let mut classifier = Classifier::with_metric(Metric::RowNormalized);
        let raw_a = Matrix::from_rows(vec![vec![10.0, 20.0], vec![30.0, 40.0]]);
        let raw_b = Matrix::from_rows(vec![vec![40.0, 30.0], vec![20.0, 10.0]]);
        classifier
            .train(vec![
                LabeledPattern::new(Normalizer::normalize(&raw_a), "rising").unwrap(),
                LabeledPattern::new(Normalizer::normalize(&raw_b), "falling").unwrap(),
            ])
            .unwrap();

        let probe = Normalizer::normalize(&Matrix::from_rows(vec![
            vec![1.0, 2.5],
            vec![3.0, 4.0],
        ]));
        assert_eq!(classifier.classify(&probe).unwrap().label, "rising");
    }
}
