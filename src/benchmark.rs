//! Benchmark module - Latency tracking for the control loop

pub mod metrics;

pub use metrics::{MetricsReport, TimingMetrics};
