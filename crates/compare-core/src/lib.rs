//! Core types for the benchmark comparison tool.
//!
//! Holds the application and metric models, the metric-name classifier,
//! the latency/throughput statistics, number formatting, settings and the
//! shared error type.

pub mod classifier;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod stats;

pub use error::{CompareError, Result};
