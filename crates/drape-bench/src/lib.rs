//! # drape-bench
//!
//! Benchmark suite for the Drape garment simulator.
//!
//! Provides procedural benchmark scenarios, a TOML run configuration,
//! metric collection, and CSV export for regression tracking.

pub mod config;
pub mod metrics;
pub mod runner;
pub mod scenarios;

pub use config::RunConfig;
pub use metrics::BenchmarkMetrics;
pub use runner::BenchmarkRunner;
pub use scenarios::{Scenario, ScenarioKind};
