//! Visualization module - PNG charts of a simulation run

pub mod dashboard;

pub use dashboard::{render_run_chart, series_points};
