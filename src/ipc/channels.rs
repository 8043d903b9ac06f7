use crossbeam::channel::{bounded, Receiver, Sender};

use crate::actuator::ActuatorStatus;

/// Reading handed from the plant thread to the controller thread.
#[derive(Clone, Copy, Debug)]
pub struct Measurement {
    pub step: usize,
    pub setpoint: f64,
    pub temperature: f64,
    pub timestamp: Option<f64>,
}

/// Controller answer for one measurement.
#[derive(Clone, Copy, Debug)]
pub struct Command {
    pub step: usize,
    pub heater_power: f64,
    pub status: ActuatorStatus,
}

#[derive(Clone)]
pub struct ControlChannels {
    // Plant -> Controller
    pub measurement_tx: Sender<Measurement>,
    pub measurement_rx: Receiver<Measurement>,

    // Controller -> Plant
    pub command_tx: Sender<Command>,
    pub command_rx: Receiver<Command>,
}

impl ControlChannels {
    pub fn new(buffer_size: usize) -> Self {
        let (measurement_tx, measurement_rx) = bounded(buffer_size);
        let (command_tx, command_rx) = bounded(buffer_size);

        Self {
            measurement_tx,
            measurement_rx,
            command_tx,
            command_rx,
        }
    }
}
