use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::sync::Arc;

use crate::actuator::Tunings;

// Bounded log of harness events; oldest entries are dropped first
#[derive(Clone)]
pub struct DiagnosticLog {
    entries: Arc<RwLock<VecDeque<String>>>,
    max_size: usize,
}

impl DiagnosticLog {
    pub fn new(max_size: usize) -> Self {
        let max_size = max_size.max(1);
        Self {
            entries: Arc::new(RwLock::new(VecDeque::with_capacity(max_size))),
            max_size,
        }
    }

    pub fn write(&self, message: String) {
        let mut log = self.entries.write();
        log.push_back(message);
        if log.len() > self.max_size {
            log.pop_front();
        }
    }

    pub fn read_all(&self) -> Vec<String> {
        self.entries.read().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

struct VersionedTunings {
    version: u64,
    tunings: Tunings,
}

/// Gains published by the harness and picked up by the thread owning the controller.
///
/// Readers remember the last version they applied so an unchanged buffer costs
/// nothing but the lock.
#[derive(Clone)]
pub struct TuningBuffer {
    data: Arc<Mutex<VersionedTunings>>,
}

impl TuningBuffer {
    pub fn new(initial: Tunings) -> Self {
        Self {
            data: Arc::new(Mutex::new(VersionedTunings {
                version: 0,
                tunings: initial,
            })),
        }
    }

    pub fn publish(&self, tunings: Tunings) {
        let mut data = self.data.lock();
        data.tunings = tunings;
        data.version += 1;
    }

    pub fn get(&self) -> (u64, Tunings) {
        let data = self.data.lock();
        (data.version, data.tunings)
    }

    /// Returns the tunings if they were published after `seen_version`.
    pub fn newer_than(&self, seen_version: u64) -> Option<(u64, Tunings)> {
        let data = self.data.lock();
        (data.version > seen_version).then_some((data.version, data.tunings))
    }
}
