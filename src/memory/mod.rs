//! Memory layer: labeled training patterns and reference baselines.
//!
//! - [`LabeledPattern`]: a matrix paired with its class label.
//! - [`PatternStore`]: the ordered pattern sequence the classifier scans,
//!   plus per-label [`ReferenceAccumulator`](crate::accumulator::ReferenceAccumulator)
//!   baselines the anomaly detector compares against.

pub mod store;

pub use store::{LabeledPattern, PatternStore};
