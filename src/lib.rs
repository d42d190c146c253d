//! copse: ensemble classification helpers for tabular labeled data.
//!
//! This crate builds sets of base classifiers (optionally with bootstrap
//! resampling), fuses their predictions (voting, sum rule, OLS regression
//! fusion), partitions data for unbiased evaluation (stratified k-fold), and
//! scores the results (confusion matrices, ROC/AUC, and a family of
//! ensemble-diversity measures).
//!
//! Individual base learners are delegated to pluggable engines behind the
//! [`models::Model`] trait; the built-in engine ships small reference
//! learners, and heavier engines can be enabled with feature flags to avoid
//! pulling their dependencies unless explicitly requested.
pub mod config;
pub mod data;
pub mod ensemble;
pub mod error;
pub mod evaluation;
pub mod logging;
pub mod math;
pub mod models;

pub use error::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
