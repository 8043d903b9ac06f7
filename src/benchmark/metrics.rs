use hdrhistogram::Histogram;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

fn new_histogram() -> Arc<Mutex<Histogram<u64>>> {
    // 3 significant figures is always within hdrhistogram's supported range
    Arc::new(Mutex::new(
        Histogram::new(3).expect("3 significant figures is a valid precision"),
    ))
}

#[derive(Clone)]
pub struct TimingMetrics {
    compute_hist: Arc<Mutex<Histogram<u64>>>,
    plant_hist: Arc<Mutex<Histogram<u64>>>,
    round_trip_hist: Arc<Mutex<Histogram<u64>>>,
}

impl Default for TimingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingMetrics {
    pub fn new() -> Self {
        Self {
            compute_hist: new_histogram(),
            plant_hist: new_histogram(),
            round_trip_hist: new_histogram(),
        }
    }

    /// Time spent inside `PIDController::compute`.
    pub fn record_compute(&self, duration: Duration) {
        self.compute_hist.lock().record(duration.as_nanos() as u64).ok();
    }

    /// Time spent applying the command and advancing the plant.
    pub fn record_plant(&self, duration: Duration) {
        self.plant_hist.lock().record(duration.as_nanos() as u64).ok();
    }

    /// Measurement sent to command received, threaded mode only.
    pub fn record_round_trip(&self, duration: Duration) {
        self.round_trip_hist.lock().record(duration.as_nanos() as u64).ok();
    }

    pub fn report(&self) -> MetricsReport {
        let compute = self.compute_hist.lock();
        let plant = self.plant_hist.lock();
        let round_trip = self.round_trip_hist.lock();

        MetricsReport {
            compute_samples: compute.len(),
            compute_p50: Duration::from_nanos(compute.value_at_quantile(0.5)),
            compute_p99: Duration::from_nanos(compute.value_at_quantile(0.99)),
            plant_p50: Duration::from_nanos(plant.value_at_quantile(0.5)),
            plant_p99: Duration::from_nanos(plant.value_at_quantile(0.99)),
            round_trip_samples: round_trip.len(),
            round_trip_p50: Duration::from_nanos(round_trip.value_at_quantile(0.5)),
            round_trip_p99: Duration::from_nanos(round_trip.value_at_quantile(0.99)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub compute_samples: u64,
    pub compute_p50: Duration,
    pub compute_p99: Duration,
    pub plant_p50: Duration,
    pub plant_p99: Duration,
    pub round_trip_samples: u64,
    pub round_trip_p50: Duration,
    pub round_trip_p99: Duration,
}
