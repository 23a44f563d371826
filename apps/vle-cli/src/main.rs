mod error;

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use vle_core::{k, pa, to_celsius, to_kpa};
use vle_project::{compile_curve, load_scenario};
use vle_results::{
    RunStore, ensure_run, extract_chamber_series, extract_substance_series, list_chambers,
    list_substances, run_summary,
};
use vle_solver::ScheduleEvent;

use crate::error::{CliError, CliResult};

#[derive(Parser)]
#[command(name = "vle-cli")]
#[command(about = "Multi-chamber vapor-liquid equilibrium cool-down solver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate scenario file syntax and structure
    Validate {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
    },
    /// Run the scenario's temperature schedule
    Run {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
    },
    /// List cached runs for a scenario
    Runs {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
    },
    /// Show details of a cached run
    ShowRun {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
        /// Run ID to display
        run_id: String,
    },
    /// Export a chamber or substance series from a run as CSV
    ExportSeries {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
        /// Run ID
        run_id: String,
        /// Chamber name
        chamber: String,
        /// Variable name (e.g., pressure, volume, liquid_moles)
        variable: String,
        /// Substance name; exports a substance variable instead of a chamber one
        #[arg(long)]
        substance: Option<String>,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a substance's saturation curve over the scenario's temperature span
    Curve {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
        /// Chamber name
        chamber: String,
        /// Substance name
        substance: String,
        /// Number of sample points
        #[arg(long, default_value_t = 21)]
        points: usize,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Run {
            scenario_path,
            no_cache,
        } => cmd_run(&scenario_path, !no_cache),
        Commands::Runs { scenario_path } => cmd_runs(&scenario_path),
        Commands::ShowRun {
            scenario_path,
            run_id,
        } => cmd_show_run(&scenario_path, &run_id),
        Commands::ExportSeries {
            scenario_path,
            run_id,
            chamber,
            variable,
            substance,
            output,
        } => cmd_export_series(
            &scenario_path,
            &run_id,
            &chamber,
            &variable,
            substance.as_deref(),
            output.as_deref(),
        ),
        Commands::Curve {
            scenario_path,
            chamber,
            substance,
            points,
        } => cmd_curve(&scenario_path, &chamber, &substance, points),
    }
}

fn cmd_validate(scenario_path: &Path) -> CliResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    // Loading runs the full validation.
    let scenario = load_scenario(scenario_path)?;
    println!("✓ Scenario is valid");
    println!(
        "  {} chambers, {:.1} K -> {:.1} K",
        scenario.chambers.len(),
        scenario.initial_temperature_k,
        scenario.target_temperature_k
    );
    Ok(())
}

fn cmd_run(scenario_path: &Path, use_cache: bool) -> CliResult<()> {
    let scenario = load_scenario(scenario_path)?;
    println!("Running scenario: {}", scenario.name);

    let store = RunStore::for_scenario(scenario_path)?;
    let started = Instant::now();
    let mut last_emit = Instant::now();
    let run = ensure_run(
        &store,
        &scenario,
        use_cache,
        Some(&mut |event: &ScheduleEvent<'_>| {
            let last = event.step == event.total_steps;
            if last || last_emit.elapsed().as_millis() >= 100 {
                render_cli_progress(event, started.elapsed().as_secs_f64());
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    if run.loaded_from_cache {
        println!("✓ Loaded from cache: {}", run.manifest.run_id);
    } else {
        println!("✓ Run completed: {}", run.manifest.run_id);
        info!(elapsed_s = started.elapsed().as_secs_f64(), "run saved");
    }

    let summary = run_summary(&run.records)?;
    println!("  Records: {}", summary.record_count);
    println!(
        "  Temperature: {:.2} K -> {:.2} K",
        summary.temperature_range.0, summary.temperature_range.1
    );
    println!(
        "  Steps without phase equilibrium: {}",
        run.manifest.non_converged_steps
    );
    println!(
        "  Steps without pressure balance: {}",
        run.manifest.unbalanced_steps
    );

    if let Some(last) = run.records.last() {
        println!("\nFinal state:");
        for chamber in &last.snapshot.chambers {
            println!(
                "  {}: p={:.3} kPa  V={:.3} L  liquid={:.4} mol",
                chamber.name,
                to_kpa(pa(chamber.pressure_pa)),
                chamber.volume_l,
                chamber.liquid_moles
            );
        }
    }

    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &ScheduleEvent<'_>, elapsed_s: f64) {
    let width = 28usize;
    let fraction = event.fraction_complete();
    let filled = ((fraction * width as f64).round() as usize).min(width);
    let bar = format!(
        "{}{}",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled))
    );
    print!(
        "\r[{}] {:>6.2}%  T={:.2}°C  step={}/{}  iter={}  p_avg={:.2} kPa  elapsed={:.1}s",
        bar,
        fraction * 100.0,
        to_celsius(k(event.report.temperature_k)),
        event.step,
        event.total_steps,
        event.report.iterations,
        to_kpa(pa(event.solver.mean_pressure())),
        elapsed_s
    );
    let _ = io::stdout().flush();
}

fn cmd_runs(scenario_path: &Path) -> CliResult<()> {
    let scenario = load_scenario(scenario_path)?;
    let store = RunStore::for_scenario(scenario_path)?;
    let runs = store.list_runs(&scenario.name)?;

    if runs.is_empty() {
        println!("No cached runs found for scenario: {}", scenario.name);
    } else {
        println!("Cached runs for scenario '{}':", scenario.name);
        for manifest in runs {
            println!(
                "  {} ({}, solver {})",
                manifest.run_id, manifest.timestamp, manifest.solver_version
            );
        }
    }
    Ok(())
}

fn cmd_show_run(scenario_path: &Path, run_id: &str) -> CliResult<()> {
    println!("Loading run: {}", run_id);

    let store = RunStore::for_scenario(scenario_path)?;
    let (manifest, records) = store.load_run(run_id)?;
    let summary = run_summary(&records)?;

    println!("\nRun Summary:");
    println!("  Scenario: {}", manifest.scenario_name);
    println!("  Created: {}", manifest.timestamp);
    println!("  Records: {}", summary.record_count);
    println!(
        "  Temperature range: {:.2} - {:.2} K",
        summary.temperature_range.0, summary.temperature_range.1
    );
    println!("  Steps without phase equilibrium: {}", summary.non_converged_steps);

    println!("\nChambers:");
    for chamber in list_chambers(&records) {
        let substances = list_substances(&records, &chamber)?;
        println!("  {} [{}]", chamber, substances.join(", "));
    }

    Ok(())
}

fn cmd_export_series(
    scenario_path: &Path,
    run_id: &str,
    chamber: &str,
    variable: &str,
    substance: Option<&str>,
    output: Option<&Path>,
) -> CliResult<()> {
    let store = RunStore::for_scenario(scenario_path)?;
    let records = store.load_steps(run_id)?;

    let series = match substance {
        Some(substance) => extract_substance_series(&records, chamber, substance, variable)?,
        None => extract_chamber_series(&records, chamber, variable)?,
    };

    let mut csv = String::from("temperature_k,value\n");
    for (t, val) in &series {
        csv.push_str(&format!("{},{}\n", t, val));
    }

    write_csv(csv, series.len(), output)
}

fn cmd_curve(scenario_path: &Path, chamber: &str, substance: &str, points: usize) -> CliResult<()> {
    if points < 2 {
        return Err(CliError::InvalidArgument {
            what: "--points must be at least 2".to_string(),
        });
    }

    let scenario = load_scenario(scenario_path)?;
    let def = scenario
        .chamber(chamber)
        .and_then(|c| c.substance(substance))
        .ok_or_else(|| CliError::NotFound {
            what: format!("substance {substance} in chamber {chamber}"),
        })?;
    let curve = compile_curve(&def.vapor_pressure)?;

    let t_min = scenario
        .initial_temperature_k
        .min(scenario.target_temperature_k);
    let t_max = scenario
        .initial_temperature_k
        .max(scenario.target_temperature_k);

    let samples = curve.sample(t_min, t_max, points);
    let mut csv = String::from("temperature_k,saturation_pressure_pa\n");
    for (t, p) in &samples {
        csv.push_str(&format!("{},{}\n", t, p));
    }

    write_csv(csv, samples.len(), None)
}

fn write_csv(csv: String, rows: usize, output: Option<&Path>) -> CliResult<()> {
    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!("✓ Exported {} data points to {}", rows, path.display());
    } else {
        print!("{}", csv);
    }
    Ok(())
}
