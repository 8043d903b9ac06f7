//! Threaded implementation - plant and controller on separate threads in lock-step

pub mod controller_thread;
pub mod plant_thread;

use thiserror::Error;
use tracing::info;

use crate::actuator::Tunings;
use crate::benchmark::metrics::TimingMetrics;
use crate::config::SimulationConfig;
use crate::ipc::channels::ControlChannels;
use crate::ipc::shared_resource::{DiagnosticLog, TuningBuffer};
use crate::simulation::{SimulationRun, StabilityReport, DIAGNOSTIC_CAPACITY};

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("{0} channel closed before the run finished")]
    ChannelClosed(&'static str),

    #[error("{0} thread panicked")]
    ThreadPanicked(&'static str),
}

/// Runs the configured simulation with the controller owned by its own thread.
///
/// Every measurement is answered before the next one is taken, so the records
/// match a sequential [`Simulation`](crate::simulation::Simulation) run exactly.
pub fn run_threaded(config: &SimulationConfig, metrics: TimingMetrics) -> Result<SimulationRun, SimulationError> {
    let controller = config.controller.build();
    let plant = config.plant.build();
    let tunings = TuningBuffer::new(Tunings::new(controller.kp(), controller.ki(), controller.kd()));
    let (initial_version, _) = tunings.get();
    let diagnostics = DiagnosticLog::new(DIAGNOSTIC_CAPACITY);

    info!(steps = config.run.steps, "starting threaded simulation");

    // Each thread keeps only its own ends so a finished plant disconnects the controller
    let ControlChannels {
        measurement_tx,
        measurement_rx,
        command_tx,
        command_rx,
    } = ControlChannels::new(1);

    let controller_handle = controller_thread::spawn_controller_thread(
        controller,
        measurement_rx,
        command_tx,
        tunings.clone(),
        initial_version,
        metrics.clone(),
        diagnostics.clone(),
    );
    let plant_handle = plant_thread::spawn_plant_thread(
        config.clone(),
        plant,
        measurement_tx,
        command_rx,
        tunings,
        metrics,
        diagnostics.clone(),
    );

    let plant_result = plant_handle
        .join()
        .map_err(|_| SimulationError::ThreadPanicked("plant"))?;
    controller_handle
        .join()
        .map_err(|_| SimulationError::ThreadPanicked("controller"))?;
    let outcome = plant_result?;

    info!(final_temperature = outcome.final_temperature, "threaded simulation finished");

    Ok(SimulationRun {
        stability: StabilityReport::from_records(&outcome.records, config.run.stabilization_fraction),
        records: outcome.records,
        final_temperature: outcome.final_temperature,
        diagnostics: diagnostics.read_all(),
    })
}
