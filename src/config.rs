//! Configuration loading for the heating simulation

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::actuator::{PIDController, Tunings};
use crate::plant::ThermalPlant;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// CONTROLLER SECTION
// ============================================================================

/// Gains, nominal step and output limits. Values are passed to the controller
/// untouched; use `inf` / `-inf` for unbounded limits.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub dt: f64,
    pub output_min: f64,
    pub output_max: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            kp: 5.0,
            ki: 0.1,
            kd: 1.0,
            dt: 1.0,
            output_min: 0.0,
            output_max: 100.0,
        }
    }
}

impl ControllerConfig {
    pub fn build(&self) -> PIDController {
        PIDController::new(self.kp, self.ki, self.kd, self.dt, self.output_min, self.output_max)
    }
}

// ============================================================================
// PLANT SECTION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlantConfig {
    pub initial_temperature: f64,
    pub ambient_temperature: f64,
    pub cooling_factor: f64,
    pub heating_factor: f64,
    pub noise_amplitude: f64,
    pub seed: u64,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 25.0,
            ambient_temperature: 22.0,
            cooling_factor: 0.1,
            heating_factor: 0.2,
            noise_amplitude: 0.0,
            seed: 42,
        }
    }
}

impl PlantConfig {
    pub fn build(&self) -> ThermalPlant {
        let mut plant = ThermalPlant::new(self.initial_temperature, self.ambient_temperature)
            .with_sensor_noise(self.noise_amplitude, self.seed);
        plant.cooling_factor = self.cooling_factor;
        plant.heating_factor = self.heating_factor;
        plant
    }
}

// ============================================================================
// RUN SECTION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub target_temperature: f64,
    pub steps: usize,
    pub report_interval: usize,
    /// Share of the run treated as transient before stability is measured.
    pub stabilization_fraction: f64,
    /// Feed `step * dt` as the timestamp instead of relying on the nominal step.
    pub use_timestamps: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            target_temperature: 30.0,
            steps: 100,
            report_interval: 10,
            stabilization_fraction: 0.7,
            use_timestamps: false,
        }
    }
}

/// Gain change applied right before the compute of `at_step`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RetuneConfig {
    pub at_step: usize,
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl RetuneConfig {
    pub fn tunings(&self) -> Tunings {
        Tunings::new(self.kp, self.ki, self.kd)
    }
}

// ============================================================================
// SIMULATION CONFIG
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub controller: ControllerConfig,
    pub plant: PlantConfig,
    pub run: RunConfig,
    pub retune: Vec<RetuneConfig>,
}

impl SimulationConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the run parameters. Controller values are deliberately left alone.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.run.steps == 0 {
            return Err(ConfigError::Invalid("run.steps must be at least 1".to_string()));
        }
        if self.run.report_interval == 0 {
            return Err(ConfigError::Invalid(
                "run.report_interval must be at least 1".to_string(),
            ));
        }
        let fraction = self.run.stabilization_fraction;
        if !(0.0..1.0).contains(&fraction) {
            return Err(ConfigError::Invalid(format!(
                "run.stabilization_fraction must be in [0, 1), got {}",
                fraction
            )));
        }
        Ok(())
    }

    /// Retune entry scheduled for `step`, if any. The last entry wins on duplicates.
    pub fn retune_at(&self, step: usize) -> Option<Tunings> {
        self.retune
            .iter()
            .rev()
            .find(|r| r.at_step == step)
            .map(RetuneConfig::tunings)
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<SimulationConfig, ConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    SimulationConfig::from_toml_str(&contents)
}
