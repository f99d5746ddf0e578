//! Data layer for the employee analytics pipeline.
//!
//! Loads the employee CSV, cleans and repairs it, aggregates per-department
//! statistics, ranks employees, derives cohorts and chart tables, and writes
//! the run's output files.

pub mod aggregator;
pub mod analysis;
pub mod charts;
pub mod cleaner;
pub mod ranker;
pub mod reader;
pub mod reporter;
pub mod writer;

pub use analytics_core as core;
