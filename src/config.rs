//! Tunables for classification and anomaly detection.
//!
//! A [`Config`] can be built in code or loaded from JSON. Every field has a
//! default, so a JSON file only needs the keys it overrides:
//!
//! ```json
//! {
//!   "metric": "cosine_column_means",
//!   "validation": "lenient",
//!   "thresholds": { "schizophrenia": 0.8 }
//! }
//! ```

use crate::error::{NeuroError, Result};
use crate::similarity::{Metric, DEFAULT_DISTANCE_SCALE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Minimum confidence for a stored pattern to appear in ranked matches.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.7;

/// |z| above which a value is flagged as an outlier.
pub const DEFAULT_Z_CUTOFF: f64 = 2.0;

/// Anomaly threshold for labels without an explicit entry.
pub const DEFAULT_ANOMALY_THRESHOLD: f64 = 0.5;

/// Shape checking policy.
///
/// One policy applies to a whole classifier; mixing them across a
/// deployment makes results depend on which path a matrix took.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validation {
    /// Reject empty training sets, empty queries and ragged or
    /// mismatched row widths.
    #[default]
    Strict,
    /// Accept them and let the metric decide (Euclidean zero-pads).
    Lenient,
}

/// Classifier and detector settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub metric: Metric,
    pub validation: Validation,
    /// Euclidean distance at which confidence reaches 0
    pub distance_scale: f64,
    /// Minimum confidence for ranked matches
    pub match_threshold: f64,
    /// Outlier cutoff in standard deviations
    pub z_cutoff: f64,
    /// Anomaly threshold for labels missing from `thresholds`
    pub default_threshold: f64,
    /// Per-label anomaly thresholds
    pub thresholds: BTreeMap<String, f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            metric: Metric::default(),
            validation: Validation::default(),
            distance_scale: DEFAULT_DISTANCE_SCALE,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            z_cutoff: DEFAULT_Z_CUTOFF,
            default_threshold: DEFAULT_ANOMALY_THRESHOLD,
            thresholds: default_thresholds(),
        }
    }
}

/// Built-in per-label anomaly thresholds.
pub fn default_thresholds() -> BTreeMap<String, f64> {
    [("schizophrenia", 0.7), ("bipolar", 0.65), ("control", 0.5)]
        .into_iter()
        .map(|(label, t)| (label.to_string(), t))
        .collect()
}

impl Config {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Builder-style metric override.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Builder-style validation override.
    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    /// Check that every numeric setting is usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.distance_scale.is_finite() && self.distance_scale > 0.0) {
            return Err(NeuroError::InvalidInput(format!(
                "distance_scale must be positive, got {}",
                self.distance_scale
            )));
        }
        if !(self.z_cutoff.is_finite() && self.z_cutoff >= 0.0) {
            return Err(NeuroError::InvalidInput(format!(
                "z_cutoff must be non-negative, got {}",
                self.z_cutoff
            )));
        }
        if !self.match_threshold.is_finite() {
            return Err(NeuroError::InvalidInput(
                "match_threshold must be finite".into(),
            ));
        }
        check_threshold("default", self.default_threshold)?;
        for (label, &t) in &self.thresholds {
            check_threshold(label, t)?;
        }
        Ok(())
    }
}

pub(crate) fn check_threshold(label: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(NeuroError::InvalidInput(format!(
            "anomaly threshold for '{}' must be a non-negative number, got {}",
            label, value
        )))
    }
}
