//! Command-line arguments and config resolution.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use polar_core::{PartnerSelection, SimulationConfig, UpdateMode};

/// Command line arguments for the polarization runner.
///
/// Every parameter flag overrides the value from `--config` (or the built-in
/// default when no file is given).
#[derive(Parser, Debug)]
#[command(name = "polarize")]
#[command(about = "Agent-based opinion polarization simulation")]
pub struct Args {
    /// TOML file holding a simulation config; omitted fields take defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of agents
    #[arg(long)]
    pub agents: Option<usize>,

    /// Number of steps to simulate
    #[arg(long)]
    pub steps: Option<u64>,

    /// Random seed for reproducibility
    #[arg(long, conflicts_with = "random_seed")]
    pub seed: Option<u64>,

    /// Draw a fresh seed instead of using the configured one
    #[arg(long)]
    pub random_seed: bool,

    /// Exposure scale E: distance at which the interaction probability halves
    #[arg(long)]
    pub exposure: Option<f64>,

    /// Tolerance window T: attract at distance <= T, repel beyond
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Movement coefficient R: fraction of the gap moved per interaction
    #[arg(long)]
    pub movement: Option<f64>,

    /// Never pair an agent with itself
    #[arg(long)]
    pub exclude_self: bool,

    /// Update agents in place, in index order
    #[arg(long)]
    pub sequential: bool,

    /// Enable the self-interest stage with this probability
    #[arg(long, value_name = "P")]
    pub self_interest: Option<f64>,

    /// Enable the group-affinity stage with this probability
    #[arg(long, value_name = "P")]
    pub group_affinity: Option<f64>,

    /// Write step_summaries.csv and histograms.csv into this directory
    #[arg(long, value_name = "DIR")]
    pub csv_dir: Option<PathBuf>,

    /// Write the config and full recorded series as JSON
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Log a progress line every N steps (0 disables)
    #[arg(long, default_value_t = 1000)]
    pub progress_every: u64,
}

impl Args {
    /// Load `--config` (if any) and apply the CLI overrides on top.
    pub fn resolve_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                toml::from_str::<SimulationConfig>(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => SimulationConfig::default(),
        };

        if let Some(n) = self.agents    { config.population_size      = n; }
        if let Some(n) = self.steps     { config.num_steps            = n; }
        if let Some(e) = self.exposure  { config.exposure_scale       = e; }
        if let Some(t) = self.tolerance { config.tolerance_window     = t; }
        if let Some(r) = self.movement  { config.movement_coefficient = r; }

        if self.random_seed {
            config.seed = None;
        } else if let Some(s) = self.seed {
            config.seed = Some(s);
        }
        if self.exclude_self {
            config.partner_selection = PartnerSelection::ExcludeSelf;
        }
        if self.sequential {
            config.update_mode = UpdateMode::Sequential;
        }
        if self.self_interest.is_some() {
            config.stages.self_interest = self.self_interest;
        }
        if self.group_affinity.is_some() {
            config.stages.group_affinity = self.group_affinity;
        }

        Ok(config)
    }
}
