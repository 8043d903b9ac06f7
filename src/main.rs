use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use pid_heating_control::visualization::render_run_chart;
use pid_heating_control::{
    load_config, run_threaded, ActuatorStatus, MetricsReport, Simulation, SimulationConfig, SimulationRun,
    TimingMetrics,
};

/// Closed-loop PID heating simulation
#[derive(Parser, Debug)]
#[command(name = "pid-heating-control")]
#[command(about = "Drive a simulated heater to a target temperature with a PID controller")]
struct Args {
    /// TOML file with [controller], [plant], [run] and [[retune]] sections
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override run.steps
    #[arg(long)]
    steps: Option<usize>,

    /// Override run.target_temperature
    #[arg(long)]
    target: Option<f64>,

    /// Run plant and controller on separate threads
    #[arg(long)]
    threaded: bool,

    /// Write a PNG chart of the run to this path
    #[arg(long)]
    chart: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &args.config {
        Some(path) => load_config(path).with_context(|| format!("loading {}", path.display()))?,
        None => {
            info!("no config file given, using the built-in heating example");
            SimulationConfig::default()
        }
    };
    if let Some(steps) = args.steps {
        config.run.steps = steps;
    }
    if let Some(target) = args.target {
        config.run.target_temperature = target;
    }
    config.validate().context("invalid configuration after overrides")?;

    println!("===========================================");
    println!("PID Heating Control Simulation ({})", if args.threaded { "threaded" } else { "sequential" });
    println!("===========================================\n");

    let (run, report) = if args.threaded {
        let metrics = TimingMetrics::new();
        let run = run_threaded(&config, metrics.clone())?;
        (run, metrics.report())
    } else {
        let mut simulation = Simulation::new(config.clone());
        let run = simulation.run();
        (run, simulation.metrics().report())
    };

    print_run(&config, &run);
    print_metrics(&report);
    finish(&args, &run)
}

fn print_run(config: &SimulationConfig, run: &SimulationRun) {
    println!("Step\tTarget\tTemp\tPower");
    println!("----\t------\t----\t-----");
    for record in run.records.iter().filter(|r| r.step % config.run.report_interval == 0) {
        println!(
            "{}\t{:.2}\t{:.2}\t{:.2}",
            record.step, record.target, record.temperature, record.heater_power
        );
    }
    if let Some(last) = run.records.last() {
        println!(
            "{}\t{:.2}\t{:.2}\t{:.2}",
            last.step, last.target, run.final_temperature, last.heater_power
        );
    }

    println!("\n=== Run Summary ===");
    println!(
        "Final temperature: {:.2}°C (target: {}°C)",
        run.final_temperature, config.run.target_temperature
    );
    if let Some(power) = run.final_heater_power() {
        println!("Final heater power: {:.2}%", power);
    }
    println!(
        "Saturated steps: {}, non-finite steps: {}",
        run.count_status(ActuatorStatus::Saturated),
        run.count_status(ActuatorStatus::NonFinite)
    );

    match &run.stability {
        Some(stability) => {
            println!("\n=== Stability (from step {}) ===", stability.from_step);
            println!("Mean error: {:.4}°C", stability.mean_error);
            println!("Mean absolute error: {:.4}°C", stability.mean_abs_error);
        }
        None => println!("\nNo samples in the stability window"),
    }

    if !run.diagnostics.is_empty() {
        println!("\n=== Diagnostics ===");
        for entry in &run.diagnostics {
            println!("{}", entry);
        }
    }
}

fn print_metrics(report: &MetricsReport) {
    println!("\n=== Performance Metrics ===");
    println!(
        "Compute P50: {:?}, P99: {:?} ({} samples)",
        report.compute_p50, report.compute_p99, report.compute_samples
    );
    println!("Plant P50: {:?}, P99: {:?}", report.plant_p50, report.plant_p99);
    if report.round_trip_samples > 0 {
        println!(
            "Round trip P50: {:?}, P99: {:?}",
            report.round_trip_p50, report.round_trip_p99
        );
    }
}

fn finish(args: &Args, run: &SimulationRun) -> Result<()> {
    if let Some(path) = &args.chart {
        let path_str = path.to_string_lossy();
        render_run_chart(run, &path_str)
            .map_err(|e| anyhow::anyhow!("rendering chart to {}: {}", path_str, e))?;
        info!(path = %path_str, "chart written");
    }
    Ok(())
}
