use cf_core::units::constants::ZERO_CELSIUS_K;
use cf_sim::{ChamberScenario, SimError, Trajectory, TrajectorySample};
use cf_thermo::{IdealGasMixture, Species};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

#[derive(Parser)]
#[command(name = "cf-cli")]
#[command(about = "chamberflow CLI - combustion chamber start-up simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a chamber start-up
    Run {
        /// Scenario JSON file (defaults to the reference case)
        #[arg(long)]
        scenario: Option<PathBuf>,
        /// Override the simulated horizon in seconds
        #[arg(long)]
        horizon: Option<f64>,
        /// Relative tolerance of the step error test
        #[arg(long)]
        rtol: Option<f64>,
        /// Largest allowed step in seconds
        #[arg(long)]
        dt_max: Option<f64>,
        /// Write the trajectory as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Do not print one line per step
        #[arg(long)]
        quiet: bool,
    },
    /// Print the reference scenario as JSON
    Scenario {
        /// Output file (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Simulation error: {0}")]
    Sim(#[from] SimError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

type CliResult<T> = Result<T, CliError>;

/// One exported trajectory row.
#[derive(Serialize)]
struct ExportRow {
    t_s: f64,
    pressure_pa: f64,
    temperature_k: f64,
    mass_kg: f64,
    exhaust_velocity_m_s: Option<f64>,
    mass_fractions: BTreeMap<&'static str, f64>,
}

impl From<&TrajectorySample> for ExportRow {
    fn from(sample: &TrajectorySample) -> Self {
        let mass_fractions = Species::ALL
            .iter()
            .map(|s| (s.key(), sample.mass_fraction(*s)))
            .collect();
        Self {
            t_s: sample.t_s,
            pressure_pa: sample.state.pressure().value,
            temperature_k: sample.state.temperature().value,
            mass_kg: sample.mass_kg,
            exhaust_velocity_m_s: sample.exhaust_velocity_m_s,
            mass_fractions,
        }
    }
}

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            scenario,
            horizon,
            rtol,
            dt_max,
            output,
            quiet,
        } => cmd_run(
            scenario.as_deref(),
            horizon,
            rtol,
            dt_max,
            output.as_deref(),
            quiet,
        ),
        Commands::Scenario { output } => cmd_scenario(output.as_deref()),
    }
}

fn load_scenario(path: Option<&Path>) -> CliResult<ChamberScenario> {
    match path {
        Some(path) => {
            let file = File::open(path)?;
            Ok(serde_json::from_reader(io::BufReader::new(file))?)
        }
        None => Ok(ChamberScenario::default()),
    }
}

fn cmd_run(
    scenario_path: Option<&Path>,
    horizon: Option<f64>,
    rtol: Option<f64>,
    dt_max: Option<f64>,
    output: Option<&Path>,
    quiet: bool,
) -> CliResult<()> {
    let mut scenario = load_scenario(scenario_path)?;
    tracing::info!(scenario = ?scenario_path, "loaded scenario");
    if let Some(horizon) = horizon {
        scenario.horizon_s = horizon;
    }

    let mut opts = scenario.sim_options();
    if let Some(rtol) = rtol {
        opts.rtol = rtol;
    }
    if let Some(dt_max) = dt_max {
        opts.max_dt = dt_max;
    }

    println!("Running chamber start-up to t = {:.3} s", scenario.horizon_s);
    println!("  rtol = {:.1e}, dt_max = {:.1e} s", opts.rtol, opts.max_dt);

    let start = Instant::now();
    let network = scenario.build(Box::new(IdealGasMixture::default()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let trajectory = network.advance(&opts, |sample| {
        if !quiet {
            // A closed stdout must not abort the run.
            let _ = writeln!(out, "{}", sample.monitor_line());
        }
    })?;
    drop(out);

    let elapsed = start.elapsed().as_secs_f64();
    print_summary(&trajectory, elapsed);

    if let Some(path) = output {
        let rows: Vec<ExportRow> = trajectory.iter().map(ExportRow::from).collect();
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &rows)?;
        writer.flush()?;
        println!("✓ Exported {} samples to {}", rows.len(), path.display());
    }

    Ok(())
}

fn print_summary(trajectory: &Trajectory, elapsed_s: f64) {
    let last = trajectory.last();
    println!("✓ Simulation completed in {elapsed_s:.3}s");
    println!("  Steps:            {}", trajectory.len());
    println!(
        "  Peak pressure:    {:.3} MPa",
        trajectory.peak_pressure_pa() / 1e6
    );
    println!(
        "  Peak temperature: {:.1} °C",
        trajectory.peak_temperature_k() - ZERO_CELSIUS_K
    );
    println!(
        "  Final state:      {:.3} MPa, {:.1} °C, {:.3} g",
        last.state.pressure().value / 1e6,
        last.state.temperature().value - ZERO_CELSIUS_K,
        last.mass_kg * 1e3
    );
    match last.exhaust_velocity_m_s {
        Some(v) => println!("  Exhaust velocity: {v:.1} m/s"),
        None => println!("  Exhaust velocity: n/a"),
    }
}

fn cmd_scenario(output: Option<&Path>) -> CliResult<()> {
    let json = serde_json::to_string_pretty(&ChamberScenario::default())?;
    if let Some(path) = output {
        std::fs::write(path, json + "\n")?;
        println!("✓ Wrote reference scenario to {}", path.display());
    } else {
        println!("{json}");
    }
    Ok(())
}
