//! Data ingestion layer for the benchmark comparison tool.
//!
//! Responsible for loading k6 NDJSON result files, parsing Prometheus
//! snapshots, aggregating classified metric points per application and
//! running the top-level analysis pipeline.

pub mod aggregator;
pub mod analysis;
pub mod prometheus;
pub mod reader;

pub use compare_core as core;
