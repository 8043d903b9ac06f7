//! Numeric degeneracies that the controller passes through instead of guarding

use pid_heating_control::{ActuatorStatus, PIDController, Simulation, SimulationConfig, ThermalPlant};

#[test]
fn zero_ki_output_limits_poison_integral() {
    let mut pid = PIDController::default();

    // 0 / 0 lower bound
    pid.set_output_limits(0.0, 100.0);
    assert!(pid.integral().is_nan());

    // The first call still short-circuits to zero
    assert_eq!(pid.compute(30.0, 25.0, None), 0.0);
    assert!(pid.compute(30.0, 26.0, None).is_nan());
    assert!(pid.compute(30.0, 29.0, None).is_nan());
}

#[test]
fn zero_ki_output_limits_with_infinite_bounds_keep_integral() {
    let mut pid = PIDController::default();

    // -10 / 0 and 10 / 0 are infinite bounds, which leave a finite integral alone
    pid.set_output_limits(-10.0, 10.0);
    assert_eq!(pid.integral(), 0.0);

    pid.compute(30.0, 25.0, None);
    assert_eq!(pid.compute(30.0, 26.0, None), 4.0);
}

#[test]
fn reset_clears_poisoned_integral() {
    let mut pid = PIDController::default();
    pid.set_output_limits(0.0, 100.0);
    assert!(pid.integral().is_nan());

    pid.reset();
    pid.compute(30.0, 25.0, None);

    assert_eq!(pid.compute(30.0, 26.0, None), 4.0);
}

#[test]
fn repeated_timestamp_saturates_or_returns_nan() {
    let mut pid = PIDController::new(1.0, 0.0, 1.0, 0.1, -100.0, 100.0);
    pid.compute(5.0, 0.0, Some(1.0));

    // Error changed over a zero step: -inf derivative lands on the lower limit
    assert_eq!(pid.compute(5.0, 2.0, Some(1.0)), -100.0);

    // Error unchanged over a zero step: 0 / 0 passes through the clamp
    assert!(pid.compute(5.0, 2.0, Some(1.0)).is_nan());
}

#[test]
fn zero_delta_time_divides_by_zero() {
    let mut pid = PIDController::new(1.0, 0.0, 1.0, 0.1, f64::NEG_INFINITY, f64::INFINITY);
    pid.set_delta_time(0.0);
    pid.compute(5.0, 0.0, None);

    assert_eq!(pid.compute(5.0, 1.0, None), f64::NEG_INFINITY);
}

#[test]
fn inverted_limits_do_not_panic() {
    let mut pid = PIDController::new(1.0, 0.0, 0.0, 1.0, 10.0, -10.0);
    pid.compute(5.0, 0.0, None);

    // Lower bound applied first, then the upper bound wins
    assert_eq!(pid.compute(5.0, 0.0, None), -10.0);
}

#[test]
fn nan_heater_command_propagates_into_plant() {
    let mut plant = ThermalPlant::default();
    plant.set_heater_power(f64::NAN);

    assert!(plant.heater_power().is_nan());
    assert!(plant.update().is_nan());
}

#[test]
fn poisoned_controller_is_reported_by_harness() {
    let config = SimulationConfig::default();
    let mut controller = PIDController::new(5.0, 0.0, 1.0, 1.0, 0.0, 100.0);
    controller.set_output_limits(0.0, 100.0);
    let plant = config.plant.build();

    let run = Simulation::with_parts(config, controller, plant).run();

    assert_eq!(run.records[0].heater_power, 0.0);
    assert_eq!(run.count_status(ActuatorStatus::NonFinite), 99);
    assert!(run.final_temperature.is_nan());
    assert!(!run.diagnostics.is_empty());
}

#[test]
fn disturbance_shifts_temperature() {
    let mut plant = ThermalPlant::new(25.0, 22.0);
    let before = plant.measure();
    plant.inject_disturbance(5.0);
    let after = plant.measure();
    assert!((after - before - 5.0).abs() < 1e-12);
}
