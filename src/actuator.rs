//! Actuator module - PID control of the heater drive

pub mod controller;

pub use controller::PIDController;

use serde::{Deserialize, Serialize};

// ============================================================================
// TUNINGS - Gain triple applied through set_tunings
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tunings {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl Tunings {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }

    pub fn apply_to(&self, pid: &mut PIDController) {
        pid.set_tunings(self.kp, self.ki, self.kd);
    }
}

// ============================================================================
// ACTUATOR STATUS - Classification of a controller output
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActuatorStatus {
    /// First call after construction or reset; the output is a fixed zero.
    Priming,
    Normal,
    Saturated,
    NonFinite,
}

impl ActuatorStatus {
    pub fn classify(output: f64, limits: (f64, f64)) -> Self {
        let (min, max) = limits;
        if !output.is_finite() {
            ActuatorStatus::NonFinite
        } else if output == min || output == max {
            ActuatorStatus::Saturated
        } else {
            ActuatorStatus::Normal
        }
    }
}

impl std::fmt::Display for ActuatorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActuatorStatus::Priming => write!(f, "Priming"),
            ActuatorStatus::Normal => write!(f, "Normal"),
            ActuatorStatus::Saturated => write!(f, "Saturated"),
            ActuatorStatus::NonFinite => write!(f, "NonFinite"),
        }
    }
}
