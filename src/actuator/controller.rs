use tracing::trace;

/// Clamp that propagates NaN from any operand instead of swallowing it.
///
/// `f64::max`/`f64::min` return the non-NaN side and `f64::clamp` panics on NaN
/// or inverted bounds, neither of which matches the controller's contract.
pub(crate) fn clamp_propagating(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() || min.is_nan() || max.is_nan() {
        return f64::NAN;
    }
    let lower = if value < min { min } else { value };
    if lower > max {
        max
    } else {
        lower
    }
}

#[derive(Debug, Clone)]
pub struct PIDController {
    // Gains
    kp: f64, // Proportional
    ki: f64, // Integral
    kd: f64, // Derivative

    // Nominal time step, used when no timestamp is supplied
    dt: f64,

    // Output limits
    output_min: f64,
    output_max: f64,

    // State
    previous_error: f64,
    integral: f64,
    last_time: Option<f64>,
    is_first_run: bool,
}

impl Default for PIDController {
    fn default() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.1, f64::NEG_INFINITY, f64::INFINITY)
    }
}

impl PIDController {
    pub fn new(kp: f64, ki: f64, kd: f64, dt: f64, output_min: f64, output_max: f64) -> Self {
        Self {
            kp,
            ki,
            kd,
            dt,
            output_min,
            output_max,
            previous_error: 0.0,
            integral: 0.0,
            last_time: None,
            is_first_run: true,
        }
    }

    /// Computes the control output for one step.
    ///
    /// The first call after construction or [`reset`](Self::reset) only seeds the
    /// error history and returns `0.0`. `current_time` switches the step length from
    /// the nominal `dt` to the difference between consecutive timestamps; the first
    /// timestamp seen still uses `dt`.
    ///
    /// A zero step length is not guarded: the derivative becomes infinite or NaN.
    /// Infinite outputs end up on a limit, NaN outputs are returned as-is.
    pub fn compute(&mut self, setpoint: f64, process_variable: f64, current_time: Option<f64>) -> f64 {
        let error = setpoint - process_variable;

        let mut time_step = self.dt;
        if let Some(now) = current_time {
            if let Some(last) = self.last_time {
                time_step = now - last;
            }
            self.last_time = Some(now);
        }

        if self.is_first_run {
            self.previous_error = error;
            self.is_first_run = false;
            return 0.0;
        }

        self.integral += error * time_step;
        let derivative = (error - self.previous_error) / time_step;

        let output = self.kp * error + self.ki * self.integral + self.kd * derivative;
        let output = clamp_propagating(output, self.output_min, self.output_max);

        self.previous_error = error;
        output
    }

    /// Clears the error history. Gains, limits and `dt` are kept.
    pub fn reset(&mut self) {
        self.previous_error = 0.0;
        self.integral = 0.0;
        self.last_time = None;
        self.is_first_run = true;
    }

    pub fn set_tunings(&mut self, kp: f64, ki: f64, kd: f64) {
        trace!(kp, ki, kd, "pid tunings updated");
        self.kp = kp;
        self.ki = ki;
        self.kd = kd;
    }

    /// Sets the output limits and pulls the integral back into `[min / ki, max / ki]`.
    ///
    /// With `ki == 0` those bounds are infinite or NaN; a NaN bound turns the
    /// integral into NaN and every later output with it.
    pub fn set_output_limits(&mut self, min: f64, max: f64) {
        trace!(min, max, "pid output limits updated");
        self.output_min = min;
        self.output_max = max;
        self.integral = clamp_propagating(self.integral, min / self.ki, max / self.ki);
    }

    pub fn set_delta_time(&mut self, dt: f64) {
        trace!(dt, "pid delta time updated");
        self.dt = dt;
    }

    pub fn kp(&self) -> f64 {
        self.kp
    }

    pub fn ki(&self) -> f64 {
        self.ki
    }

    pub fn kd(&self) -> f64 {
        self.kd
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn output_limits(&self) -> (f64, f64) {
        (self.output_min, self.output_max)
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    pub fn previous_error(&self) -> f64 {
        self.previous_error
    }

    pub fn last_time(&self) -> Option<f64> {
        self.last_time
    }

    pub fn is_first_run(&self) -> bool {
        self.is_first_run
    }
}
