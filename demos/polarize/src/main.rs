//! polarize — command-line runner for the polarsim opinion-dynamics model.
//!
//! Runs one simulation from defaults, a TOML config, and/or CLI overrides,
//! logs progress through `tracing` (`RUST_LOG`, default `info`), optionally
//! exports CSV and JSON, and prints a summary with the final opinion
//! histogram.

mod cli;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use polar_agent::Population;
use polar_core::SimulationConfig;
use polar_output::{CsvWriter, SimOutputObserver};
use polar_sim::{Engine, RunStatus, SimObserver};
use polar_stats::{SimulationResult, StepRecord};

use cli::Args;

const HISTOGRAM_BAR_WIDTH: usize = 40;

// ── Progress observer ─────────────────────────────────────────────────────────

/// Logs the population summary every `every` steps.
struct ProgressLogger {
    every: u64,
}

impl SimObserver for ProgressLogger {
    fn on_step_end(&mut self, record: &StepRecord, _population: &Population) {
        if self.every > 0 && (record.step.0 + 1) % self.every == 0 {
            tracing::info!(
                step = %record.step,
                mean = record.mean(),
                variance = record.variance(),
                "progress"
            );
        }
    }
}

// ── JSON report ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct RunReport<'a> {
    config:    &'a SimulationConfig,
    completed: bool,
    result:    &'a SimulationResult,
}

fn write_json(path: &Path, report: &RunReport<'_>) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

// ── Summary ───────────────────────────────────────────────────────────────────

fn print_summary(engine: &Engine, status: RunStatus, elapsed_secs: f64) {
    let result = &engine.result;
    let cfg = &engine.config;

    println!("=== polarize ===");
    println!(
        "Agents: {}  |  Steps: {}/{}  |  Seed: {}",
        cfg.population_size,
        result.len(),
        result.requested_steps,
        result.seed
    );
    println!(
        "E = {}  T = {}  R = {}",
        cfg.exposure_scale, cfg.tolerance_window, cfg.movement_coefficient
    );
    if let RunStatus::Cancelled { at } = status {
        println!("Run stopped before {at}");
    }
    println!("Simulation complete in {elapsed_secs:.3} s");
    println!();

    let (Some(first), Some(last)) = (result.records.first(), result.last()) else {
        println!("(no steps recorded)");
        return;
    };

    println!("{:<8} {:>10} {:>10} {:>10}", "", "mean", "stddev", "variance");
    for (label, r) in [("first", first), ("last", last)] {
        println!(
            "{:<8} {:>10.4} {:>10.4} {:>10.4}",
            label,
            r.mean(),
            r.stddev(),
            r.variance()
        );
    }
    println!();

    println!("Final opinion histogram ({})", last.step);
    let counts = last.histogram_counts();
    let edges = last.histogram_bin_edges();
    let peak = counts.iter().copied().max().unwrap_or(0).max(1);
    for (b, &count) in counts.iter().enumerate() {
        let bar = (count as usize * HISTOGRAM_BAR_WIDTH).div_ceil(peak as usize);
        println!(
            "[{:.2}, {:.2}{} {:>5} {}",
            edges[b],
            edges[b + 1],
            if b + 1 == counts.len() { ']' } else { ')' },
            count,
            "#".repeat(bar)
        );
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = args.resolve_config()?;

    let mut engine = Engine::setup(config).context("setting up simulation")?;
    let mut progress = ProgressLogger { every: args.progress_every };

    let t0 = Instant::now();
    let status = match &args.csv_dir {
        Some(dir) => {
            let writer = CsvWriter::new(dir)
                .with_context(|| format!("opening CSV output in {}", dir.display()))?;
            let mut obs = (SimOutputObserver::new(writer), progress);
            let status = engine.run(&mut obs);
            if let Some(e) = obs.0.take_error() {
                return Err(e).context("writing CSV output");
            }
            tracing::info!(dir = %dir.display(), "csv output written");
            status
        }
        None => engine.run(&mut progress),
    };
    let elapsed = t0.elapsed().as_secs_f64();

    if let Some(path) = &args.json {
        let report = RunReport {
            config:    &engine.config,
            completed: status == RunStatus::Completed,
            result:    &engine.result,
        };
        write_json(path, &report)?;
        tracing::info!(file = %path.display(), "json report written");
    }

    print_summary(&engine, status, elapsed);
    Ok(())
}
