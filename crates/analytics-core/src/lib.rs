//! Shared types for the employee analytics pipeline.
//!
//! Holds the error type, record and table models, statistics helpers,
//! analysis thresholds, report formatting and command-line settings.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod stats;
pub mod thresholds;
