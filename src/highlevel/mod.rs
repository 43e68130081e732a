//! High-level convenience API.
//!
//! This layer provides [`Analyzer`], an ergonomic wrapper that owns a
//! [`Classifier`](crate::Classifier) and an
//! [`AnomalyDetector`](crate::AnomalyDetector) and delegates to them.
//!
//! For library code that only needs one piece, use the component types
//! directly.

pub mod client;

pub use client::Analyzer;
