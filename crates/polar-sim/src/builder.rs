//! Fluent builder for constructing an [`Engine`].

use polar_agent::{InteractionRule, PopulationBuilder, UpdateStage, stages_from_config};
use polar_core::rng::resolve_seed;
use polar_core::{AgentId, SimulationConfig, Step};
use polar_stats::{InteractionTally, SimulationResult};

use crate::{Engine, SimError, SimResult};

/// Fluent builder for [`Engine`].
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default                                    |
/// |--------------------------|--------------------------------------------|
/// | `.initial_opinions(v)`   | Normal(0.5, 0.2) draws, clamped to [0, 1]  |
/// | `.stage(s)`              | Only the stages enabled in `config.stages` |
///
/// # Example
///
/// ```rust,ignore
/// let mut engine = EngineBuilder::new(config)
///     .initial_opinions(vec![0.2, 0.8])
///     .build()?;
/// engine.run(&mut NoopObserver);
/// ```
pub struct EngineBuilder {
    config:   SimulationConfig,
    opinions: Option<Vec<f64>>,
    stages:   Vec<Box<dyn UpdateStage>>,
}

impl EngineBuilder {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config, opinions: None, stages: Vec::new() }
    }

    /// Start every agent at an explicit opinion (must be length
    /// `population_size`; values are clamped into [0, 1]).
    pub fn initial_opinions(mut self, opinions: Vec<f64>) -> Self {
        self.opinions = Some(opinions);
        self
    }

    /// Append a custom stage after the configured ones.
    pub fn stage(mut self, stage: Box<dyn UpdateStage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Validate inputs, resolve the seed, build the population, and return a
    /// ready-to-run [`Engine`].
    pub fn build(self) -> SimResult<Engine> {
        self.config.validate()?;
        let expected = self.config.population_size;

        if let Some(opinions) = &self.opinions {
            if opinions.len() != expected {
                return Err(SimError::PopulationMismatch {
                    expected,
                    got:  opinions.len(),
                    what: "initial opinions",
                });
            }
            if let Some((i, &value)) = opinions.iter().enumerate().find(|(_, v)| !v.is_finite()) {
                return Err(SimError::InvalidOpinion { agent: AgentId(i as u32), value });
            }
        }

        let seed = resolve_seed(self.config.seed);
        let assign_groups = self.config.stages.group_affinity.is_some();
        let builder = match self.opinions {
            Some(opinions) => PopulationBuilder::from_opinions(opinions, seed),
            None           => PopulationBuilder::new(expected, seed),
        };
        let (population, rngs) = builder.assign_groups(assign_groups).build();

        let mut stages = stages_from_config(&self.config.stages);
        stages.extend(self.stages);

        tracing::info!(
            seed,
            population = expected,
            steps = self.config.num_steps,
            exposure_scale = self.config.exposure_scale,
            tolerance_window = self.config.tolerance_window,
            movement_coefficient = self.config.movement_coefficient,
            mode = ?self.config.update_mode,
            stages = ?stages.iter().map(|s| s.name()).collect::<Vec<_>>(),
            "engine ready"
        );

        Ok(Engine {
            rule:         InteractionRule::from_config(&self.config),
            result:       SimulationResult::new(seed, self.config.num_steps),
            snapshot:     Vec::with_capacity(expected),
            current_step: Step::ZERO,
            pending:      InteractionTally::default(),
            config:       self.config,
            seed,
            population,
            rngs,
            stages,
        })
    }
}
