//! IPC module - Channels and shared state between plant and controller threads

pub mod channels;
pub mod shared_resource;

pub use channels::{Command, ControlChannels, Measurement};
pub use shared_resource::{DiagnosticLog, TuningBuffer};
