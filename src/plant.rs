//! Plant module - First-order thermal model of the heated system

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::actuator::controller::clamp_propagating;

pub const HEATER_POWER_MIN: f64 = 0.0;
pub const HEATER_POWER_MAX: f64 = 100.0;

// ============================================================================
// THERMAL PLANT - Simulated heating system
// ============================================================================

/// Heated body that loses heat towards ambient and gains it from the heater.
///
/// Each [`update`](ThermalPlant::update) applies
/// `current += heating_factor * heater_power - cooling_factor * (current - ambient)`.
#[derive(Debug, Clone)]
pub struct ThermalPlant {
    current_temperature: f64,
    ambient_temperature: f64,
    heater_power: f64,
    pub cooling_factor: f64,
    pub heating_factor: f64,
    noise_amplitude: f64,
    rng: StdRng,
}

impl Default for ThermalPlant {
    fn default() -> Self {
        Self::new(25.0, 22.0)
    }
}

impl ThermalPlant {
    pub fn new(initial_temperature: f64, ambient_temperature: f64) -> Self {
        Self {
            current_temperature: initial_temperature,
            ambient_temperature,
            heater_power: 0.0,
            cooling_factor: 0.1,
            heating_factor: 0.2,
            noise_amplitude: 0.0,
            rng: StdRng::seed_from_u64(42),
        }
    }

    /// Adds uniform sensor noise in `[-amplitude, amplitude)` to every [`measure`](Self::measure).
    pub fn with_sensor_noise(mut self, amplitude: f64, seed: u64) -> Self {
        self.noise_amplitude = amplitude.abs();
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Advances the model by one tick and returns the new temperature.
    pub fn update(&mut self) -> f64 {
        let heat_loss = self.cooling_factor * (self.current_temperature - self.ambient_temperature);
        let heat_gain = self.heating_factor * self.heater_power;
        self.current_temperature += heat_gain - heat_loss;
        self.current_temperature
    }

    /// Stores the drive for the next tick, limited to 0..=100 %.
    pub fn set_heater_power(&mut self, power: f64) {
        self.heater_power = clamp_propagating(power, HEATER_POWER_MIN, HEATER_POWER_MAX);
    }

    /// Reads the temperature as the sensor sees it.
    pub fn measure(&mut self) -> f64 {
        if self.noise_amplitude > 0.0 {
            let noise = self.rng.gen_range(-self.noise_amplitude..self.noise_amplitude);
            self.current_temperature + noise
        } else {
            self.current_temperature
        }
    }

    pub fn current_temperature(&self) -> f64 {
        self.current_temperature
    }

    pub fn ambient_temperature(&self) -> f64 {
        self.ambient_temperature
    }

    pub fn heater_power(&self) -> f64 {
        self.heater_power
    }

    pub fn inject_disturbance(&mut self, temperature_delta: f64) {
        self.current_temperature += temperature_delta;
    }
}
