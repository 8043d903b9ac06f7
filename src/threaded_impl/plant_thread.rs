use crossbeam::channel::{Receiver, Sender};
use std::thread;
use std::time::Instant;
use tracing::debug;

use super::SimulationError;
use crate::benchmark::metrics::TimingMetrics;
use crate::config::SimulationConfig;
use crate::ipc::channels::{Command, Measurement};
use crate::ipc::shared_resource::{DiagnosticLog, TuningBuffer};
use crate::plant::ThermalPlant;
use crate::simulation::{log_retune, plant_step, timestamp_for, StepRecord};

pub struct PlantOutcome {
    pub records: Vec<StepRecord>,
    pub final_temperature: f64,
}

pub fn spawn_plant_thread(
    config: SimulationConfig,
    mut plant: ThermalPlant,
    measurement_tx: Sender<Measurement>,
    command_rx: Receiver<Command>,
    tunings: TuningBuffer,
    metrics: TimingMetrics,
    diagnostics: DiagnosticLog,
) -> thread::JoinHandle<Result<PlantOutcome, SimulationError>> {
    thread::spawn(move || {
        let target = config.run.target_temperature;
        let mut records = Vec::with_capacity(config.run.steps);

        for step in 0..config.run.steps {
            // Published before the measurement goes out, so the controller sees it this step
            if let Some(new_tunings) = config.retune_at(step) {
                tunings.publish(new_tunings);
                log_retune(&diagnostics, step, new_tunings.kp, new_tunings.ki, new_tunings.kd);
            }

            let measurement = Measurement {
                step,
                setpoint: target,
                temperature: plant.measure(),
                timestamp: timestamp_for(&config, step),
            };

            let sent = Instant::now();
            measurement_tx
                .send(measurement)
                .map_err(|_| SimulationError::ChannelClosed("measurement"))?;
            let command = command_rx
                .recv()
                .map_err(|_| SimulationError::ChannelClosed("command"))?;
            metrics.record_round_trip(sent.elapsed());

            let next = plant_step(&mut plant, &command, &metrics);
            debug!(step, heater_power = command.heater_power, next, "plant advanced");

            records.push(StepRecord {
                step,
                target,
                temperature: measurement.temperature,
                heater_power: command.heater_power,
                status: command.status,
            });
        }

        Ok(PlantOutcome {
            records,
            final_temperature: plant.current_temperature(),
        })
    })
}
