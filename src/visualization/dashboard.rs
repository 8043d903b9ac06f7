use plotters::prelude::*;

use crate::plant::{HEATER_POWER_MAX, HEATER_POWER_MIN};
use crate::simulation::{SimulationRun, StepRecord};

/// `(step, value)` pairs for one chart series, skipping non-finite values.
pub fn series_points(run: &SimulationRun, value: impl Fn(&StepRecord) -> f64) -> Vec<(f64, f64)> {
    run.records
        .iter()
        .map(|r| (r.step as f64, value(r)))
        .filter(|(_, v)| v.is_finite())
        .collect()
}

/// Draws temperature against target on top and heater power below.
/// Non-finite samples are skipped.
pub fn render_run_chart(run: &SimulationRun, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (1000, 700)).into_drawing_area();
    root.fill(&WHITE)?;
    let (upper, lower) = root.split_vertically(450);

    let steps = run.records.len().max(1) as f64;
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for r in &run.records {
        for v in [r.temperature, r.target] {
            if v.is_finite() {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
    }
    if !lo.is_finite() || !hi.is_finite() {
        lo = 0.0;
        hi = 1.0;
    }
    let margin = ((hi - lo) * 0.1).max(0.5);

    let mut temp_chart = ChartBuilder::on(&upper)
        .caption("Temperature (°C)", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..steps, (lo - margin)..(hi + margin))?;
    temp_chart.configure_mesh().x_desc("Step").y_desc("°C").draw()?;

    temp_chart
        .draw_series(LineSeries::new(
            series_points(run, |r| r.temperature),
            &RED,
        ))?
        .label("temperature")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
    temp_chart
        .draw_series(LineSeries::new(
            series_points(run, |r| r.target),
            &BLUE,
        ))?
        .label("target")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    temp_chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    let mut power_chart = ChartBuilder::on(&lower)
        .caption("Heater power (%)", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..steps, HEATER_POWER_MIN..HEATER_POWER_MAX)?;
    power_chart.configure_mesh().x_desc("Step").y_desc("%").draw()?;
    power_chart.draw_series(LineSeries::new(
        series_points(run, |r| r.heater_power)
            .into_iter()
            .map(|(step, power)| (step, power.clamp(HEATER_POWER_MIN, HEATER_POWER_MAX))),
        &GREEN,
    ))?;

    root.present()?;
    Ok(())
}
