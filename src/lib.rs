pub mod actuator;
pub mod benchmark;
pub mod config;
pub mod ipc;
pub mod plant;
pub mod simulation;
pub mod threaded_impl;
pub mod visualization;

pub use actuator::{ActuatorStatus, PIDController, Tunings};
pub use benchmark::{MetricsReport, TimingMetrics};
pub use config::{load_config, ConfigError, SimulationConfig};
pub use plant::ThermalPlant;
pub use simulation::{Simulation, SimulationRun, StabilityReport, StepRecord};
pub use threaded_impl::{run_threaded, SimulationError};
