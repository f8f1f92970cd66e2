//! Run configuration.
//!
//! A [`SimulationConfig`] is immutable for the lifetime of a run.  It is
//! typically built in code or loaded from a TOML/JSON file by the
//! application crate (with the `serde` feature), then handed to the engine,
//! which calls [`SimulationConfig::validate`] before doing any work.

use crate::{ConfigError, ConfigResult};

/// Largest supported population: every agent index must fit in an
/// [`AgentId`][crate::AgentId].
pub const MAX_POPULATION: usize = u32::MAX as usize;

// ── PartnerSelection ─────────────────────────────────────────────────────────

/// Which agents are eligible as an interaction partner.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PartnerSelection {
    /// Uniform over the whole population, the agent itself included.  A
    /// self-pairing has distance 0 and therefore always "attracts" to the
    /// agent's own opinion, leaving it unchanged.
    #[default]
    IncludeSelf,
    /// Uniform over every agent except the one updating.
    ExcludeSelf,
}

// ── UpdateMode ───────────────────────────────────────────────────────────────

/// Which population state an agent reads its partner's opinion from.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UpdateMode {
    /// Every partner read sees the opinions as they were at the start of the
    /// step.  Results do not depend on update order, so this mode may run in
    /// parallel.
    #[default]
    Snapshot,
    /// Agents update in ascending index order against the live population;
    /// later agents observe earlier agents' new opinions.  Always
    /// single-threaded.
    Sequential,
}

// ── StageConfig ──────────────────────────────────────────────────────────────

/// Optional update stages applied after the pairwise rule.
///
/// Each field is the per-update probability that the stage fires; `None`
/// disables the stage entirely.  Both stages are off by default.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StageConfig {
    /// Pull back toward the agent's initial opinion.
    pub self_interest: Option<f64>,
    /// Attraction to the own group / repulsion from other groups,
    /// independent of opinion distance.
    pub group_affinity: Option<f64>,
}

impl StageConfig {
    /// `true` if at least one stage is enabled.
    pub fn any_enabled(&self) -> bool {
        self.self_interest.is_some() || self.group_affinity.is_some()
    }
}

// ── SimulationConfig ─────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationConfig {
    /// Number of agents.  Fixed for the run.
    pub population_size: usize,

    /// Number of steps to simulate; one record is produced per step.
    pub num_steps: u64,

    /// Master RNG seed.  The same seed always produces identical results;
    /// `None` draws a fresh seed from the OS at setup.
    pub seed: Option<u64>,

    /// E: interaction probability is `0.5^(distance / E)`, so E is the
    /// opinion distance at which an encounter succeeds half the time.
    pub exposure_scale: f64,

    /// T: encounters within this distance attract; farther ones repel.
    pub tolerance_window: f64,

    /// R: fraction of the opinion gap closed (or opened) per interaction.
    pub movement_coefficient: f64,

    pub partner_selection: PartnerSelection,

    pub update_mode: UpdateMode,

    pub stages: StageConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            population_size:      30,
            num_steps:            5_000,
            seed:                 Some(42),
            exposure_scale:       0.1,
            tolerance_window:     0.25,
            movement_coefficient: 0.25,
            partner_selection:    PartnerSelection::IncludeSelf,
            update_mode:          UpdateMode::Snapshot,
            stages:               StageConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Check every precondition the engine relies on.
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.population_size > MAX_POPULATION {
            return Err(ConfigError::PopulationTooLarge {
                population_size: self.population_size,
                max:             MAX_POPULATION,
            });
        }

        finite("exposure_scale", self.exposure_scale)?;
        finite("tolerance_window", self.tolerance_window)?;
        finite("movement_coefficient", self.movement_coefficient)?;

        if self.exposure_scale <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "exposure_scale",
                value: self.exposure_scale,
            });
        }
        if self.tolerance_window < 0.0 {
            return Err(ConfigError::Negative {
                field: "tolerance_window",
                value: self.tolerance_window,
            });
        }

        if let Some(p) = self.stages.self_interest {
            probability("stages.self_interest", p)?;
        }
        if let Some(p) = self.stages.group_affinity {
            probability("stages.group_affinity", p)?;
        }

        if self.partner_selection == PartnerSelection::ExcludeSelf && self.population_size < 2 {
            return Err(ConfigError::NoEligiblePartner {
                population_size: self.population_size,
            });
        }

        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

fn probability(field: &'static str, value: f64) -> ConfigResult<()> {
    finite(field, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { field, value })
    }
}
