use crossbeam::channel::{Receiver, Sender};
use std::thread;
use tracing::debug;

use crate::actuator::controller::PIDController;
use crate::benchmark::metrics::TimingMetrics;
use crate::ipc::channels::{Command, Measurement};
use crate::ipc::shared_resource::{DiagnosticLog, TuningBuffer};
use crate::simulation::control_step;

/// Owns the controller until the plant side hangs up.
///
/// `seen_version` must be read from `tunings` before the plant thread starts,
/// otherwise a retune published for the very first step can be taken as already applied.
pub fn spawn_controller_thread(
    mut pid: PIDController,
    measurement_rx: Receiver<Measurement>,
    command_tx: Sender<Command>,
    tunings: TuningBuffer,
    mut seen_version: u64,
    metrics: TimingMetrics,
    diagnostics: DiagnosticLog,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {

        while let Ok(measurement) = measurement_rx.recv() {
            if let Some((version, new_tunings)) = tunings.newer_than(seen_version) {
                seen_version = version;
                new_tunings.apply_to(&mut pid);
            }

            let command = control_step(&mut pid, &measurement, &metrics, &diagnostics);
            if command_tx.send(command).is_err() {
                break;
            }
        }

        debug!("controller thread shutting down");
    })
}
