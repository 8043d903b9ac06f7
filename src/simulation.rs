//! Simulation module - Closed-loop heating run and stability summary

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::actuator::{ActuatorStatus, PIDController};
use crate::benchmark::metrics::TimingMetrics;
use crate::config::SimulationConfig;
use crate::ipc::channels::{Command, Measurement};
use crate::ipc::shared_resource::DiagnosticLog;
use crate::plant::ThermalPlant;

pub(crate) const DIAGNOSTIC_CAPACITY: usize = 256;

// ============================================================================
// STEP RECORD
// ============================================================================

/// One tick of the loop. `temperature` is the reading the controller saw,
/// taken before the plant advanced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepRecord {
    pub step: usize,
    pub target: f64,
    pub temperature: f64,
    pub heater_power: f64,
    pub status: ActuatorStatus,
}

// ============================================================================
// STABILITY REPORT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityReport {
    /// First step included in the averages.
    pub from_step: usize,
    pub mean_error: f64,
    pub mean_abs_error: f64,
}

impl StabilityReport {
    /// Averages `target - temperature` over the records from
    /// `floor(len * stabilization_fraction)` onward. `None` when that window is empty.
    pub fn from_records(records: &[StepRecord], stabilization_fraction: f64) -> Option<Self> {
        let from = (records.len() as f64 * stabilization_fraction).floor() as usize;
        let window = records.get(from..)?;
        if window.is_empty() {
            return None;
        }

        let (sum, sum_abs) = window.iter().fold((0.0, 0.0), |(sum, sum_abs), r| {
            let error = r.target - r.temperature;
            (sum + error, sum_abs + error.abs())
        });
        let n = window.len() as f64;

        Some(Self {
            from_step: window[0].step,
            mean_error: sum / n,
            mean_abs_error: sum_abs / n,
        })
    }
}

// ============================================================================
// SIMULATION RUN - Result of a full run
// ============================================================================

#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub records: Vec<StepRecord>,
    pub final_temperature: f64,
    pub stability: Option<StabilityReport>,
    pub diagnostics: Vec<String>,
}

impl SimulationRun {
    pub fn final_heater_power(&self) -> Option<f64> {
        self.records.last().map(|r| r.heater_power)
    }

    pub fn count_status(&self, status: ActuatorStatus) -> usize {
        self.records.iter().filter(|r| r.status == status).count()
    }
}

// ============================================================================
// SHARED STEP LOGIC
// ============================================================================

/// Timestamp fed to the controller for `step`, when the run uses timestamps.
pub fn timestamp_for(config: &SimulationConfig, step: usize) -> Option<f64> {
    config
        .run
        .use_timestamps
        .then(|| step as f64 * config.controller.dt)
}

/// Runs the controller on one measurement. Used by both the sequential and
/// the threaded loop so they stay bit-identical.
pub fn control_step(
    pid: &mut PIDController,
    measurement: &Measurement,
    metrics: &TimingMetrics,
    diagnostics: &DiagnosticLog,
) -> Command {
    let first_run = pid.is_first_run();
    let start = Instant::now();
    let output = pid.compute(measurement.setpoint, measurement.temperature, measurement.timestamp);
    metrics.record_compute(start.elapsed());

    let status = if first_run {
        ActuatorStatus::Priming
    } else {
        ActuatorStatus::classify(output, pid.output_limits())
    };
    if status == ActuatorStatus::NonFinite {
        warn!(step = measurement.step, output, "controller produced a non-finite output");
        diagnostics.write(format!(
            "[CONTROLLER] step {}: non-finite output {}",
            measurement.step, output
        ));
    }

    Command {
        step: measurement.step,
        heater_power: output,
        status,
    }
}

/// Applies a command and advances the plant by one tick.
pub fn plant_step(plant: &mut ThermalPlant, command: &Command, metrics: &TimingMetrics) -> f64 {
    let start = Instant::now();
    plant.set_heater_power(command.heater_power);
    let temperature = plant.update();
    metrics.record_plant(start.elapsed());
    temperature
}

pub(crate) fn log_retune(diagnostics: &DiagnosticLog, step: usize, kp: f64, ki: f64, kd: f64) {
    info!(step, kp, ki, kd, "retuning controller");
    diagnostics.write(format!(
        "[HARNESS] step {}: retuned to kp={} ki={} kd={}",
        step, kp, ki, kd
    ));
}

// ============================================================================
// SEQUENTIAL SIMULATION
// ============================================================================

pub struct Simulation {
    config: SimulationConfig,
    controller: PIDController,
    plant: ThermalPlant,
    metrics: TimingMetrics,
    diagnostics: DiagnosticLog,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Self {
        let controller = config.controller.build();
        let plant = config.plant.build();
        Self::with_parts(config, controller, plant)
    }

    /// Uses an externally prepared controller and plant instead of building them
    /// from the config sections.
    pub fn with_parts(config: SimulationConfig, controller: PIDController, plant: ThermalPlant) -> Self {
        Self {
            config,
            controller,
            plant,
            metrics: TimingMetrics::new(),
            diagnostics: DiagnosticLog::new(DIAGNOSTIC_CAPACITY),
        }
    }

    pub fn run(&mut self) -> SimulationRun {
        let run = &self.config.run;
        let target = run.target_temperature;
        info!(steps = run.steps, target, "starting sequential simulation");

        let mut records = Vec::with_capacity(run.steps);
        for step in 0..run.steps {
            if let Some(tunings) = self.config.retune_at(step) {
                tunings.apply_to(&mut self.controller);
                log_retune(&self.diagnostics, step, tunings.kp, tunings.ki, tunings.kd);
            }

            let measurement = Measurement {
                step,
                setpoint: target,
                temperature: self.plant.measure(),
                timestamp: timestamp_for(&self.config, step),
            };
            let command = control_step(&mut self.controller, &measurement, &self.metrics, &self.diagnostics);
            let next = plant_step(&mut self.plant, &command, &self.metrics);

            debug!(
                step,
                temperature = measurement.temperature,
                heater_power = command.heater_power,
                next,
                "control step"
            );

            records.push(StepRecord {
                step,
                target,
                temperature: measurement.temperature,
                heater_power: command.heater_power,
                status: command.status,
            });
        }

        let final_temperature = self.plant.current_temperature();
        info!(final_temperature, "sequential simulation finished");

        SimulationRun {
            stability: StabilityReport::from_records(&records, self.config.run.stabilization_fraction),
            records,
            final_temperature,
            diagnostics: self.diagnostics.read_all(),
        }
    }

    pub fn metrics(&self) -> &TimingMetrics {
        &self.metrics
    }
}
