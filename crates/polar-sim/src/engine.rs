//! The `Engine` struct and its step loop.

use polar_agent::{Agent, AgentRngs, InteractionRule, Population, UpdateStage};
use polar_core::{AgentId, SimulationConfig, Step, UpdateMode};
use polar_stats::{InteractionTally, OpinionStats, SimulationResult, StepRecord};

use crate::{EngineBuilder, SimObserver, SimResult};

/// How a call to [`Engine::run`] ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunStatus {
    /// Every requested step was recorded.
    Completed,
    /// The observer stopped the run before `at` was simulated.
    Cancelled { at: Step },
}

/// The simulation engine.
///
/// `Engine` owns the population, the per-agent RNGs, and the recorded series,
/// and drives the two-part step:
///
/// 1. **Update** ([`step`](Self::step)): every agent calls
///    [`Agent::update_opinion`] exactly once.  In [`UpdateMode::Snapshot`]
///    all partner reads see the start-of-step opinions (and, with the
///    `parallel` feature, updates run on Rayon's pool).  In
///    [`UpdateMode::Sequential`] agents update in ascending `AgentId` order
///    against the live population.
/// 2. **Record** ([`record_step`](Self::record_step)): summarise the
///    opinions and append a [`StepRecord`].
///
/// Create via [`EngineBuilder`] or [`Engine::setup`].
pub struct Engine {
    /// The validated run configuration.
    pub config: SimulationConfig,

    /// The global seed actually in use (configured or drawn at setup).
    pub seed: u64,

    /// Index of the next step to simulate.
    pub current_step: Step,

    pub population: Population,

    /// Per-agent deterministic RNGs, separated for the split-borrow pattern.
    pub rngs: AgentRngs,

    pub rule: InteractionRule,

    /// Post-rule stages, applied in order on every update.
    pub stages: Vec<Box<dyn UpdateStage>>,

    /// Records appended so far.
    pub result: SimulationResult,

    /// Start-of-step copy of the population, reused across steps.
    pub(crate) snapshot: Vec<Agent>,

    /// Tally of the last `step()`, consumed by `record_step()`.
    pub(crate) pending: InteractionTally,
}

impl Engine {
    // ── Public API ────────────────────────────────────────────────────────

    /// Validate `config` and build the initial population.
    pub fn setup(config: SimulationConfig) -> SimResult<Self> {
        EngineBuilder::new(config).build()
    }

    /// Run from the current step to `config.num_steps`.
    ///
    /// Calls observer hooks at every step boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> RunStatus {
        let remaining = self.config.num_steps.saturating_sub(self.current_step.0);
        let status = self.run_steps(remaining, observer);

        match status {
            RunStatus::Completed => tracing::info!(
                seed = self.seed,
                steps = self.result.len(),
                "run complete"
            ),
            RunStatus::Cancelled { at } => tracing::warn!(
                seed = self.seed,
                recorded = self.result.len(),
                requested = self.config.num_steps,
                "run cancelled before {at}"
            ),
        }

        observer.on_sim_end(&self.result);
        status
    }

    /// Run exactly `n` steps from the current position (ignores
    /// `num_steps`).
    ///
    /// Useful for tests and incremental stepping.  Does not call
    /// `on_sim_end`.
    pub fn run_steps<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> RunStatus {
        for _ in 0..n {
            let now = self.current_step;
            if observer.should_stop(now) {
                return RunStatus::Cancelled { at: now };
            }
            observer.on_step_start(now);
            self.step();
            self.record_step();
            if let Some(record) = self.result.last() {
                observer.on_step_end(record, &self.population);
            }
        }
        RunStatus::Completed
    }

    /// Update every agent exactly once.
    ///
    /// Returns the pairwise-rule tally for this step.  Call
    /// [`record_step`](Self::record_step) afterwards to close the step.
    pub fn step(&mut self) -> InteractionTally {
        let tally = match self.config.update_mode {
            UpdateMode::Snapshot   => self.update_from_snapshot(),
            UpdateMode::Sequential => self.update_sequential(),
        };
        self.pending = tally;
        tally
    }

    /// Summarise the current opinions, append the record, and advance the
    /// step counter.
    pub fn record_step(&mut self) -> &StepRecord {
        let record = StepRecord {
            step:         self.current_step,
            stats:        OpinionStats::compute(&self.population.opinions()),
            interactions: std::mem::take(&mut self.pending),
        };
        tracing::trace!(
            step = %record.step,
            mean = record.mean(),
            variance = record.variance(),
            attracted = record.interactions.attracted,
            repelled = record.interactions.repelled
        );

        self.current_step = self.current_step.next();
        self.result.records.push(record);
        &self.result.records[self.result.records.len() - 1]
    }

    /// Consume the engine and return the recorded series.
    pub fn into_result(self) -> SimulationResult {
        self.result
    }

    // ── Update strategies ─────────────────────────────────────────────────

    fn update_from_snapshot(&mut self) -> InteractionTally {
        self.snapshot.clone_from(&self.population.agents);

        // Explicit field borrows so the borrow checker sees disjoint access.
        let snapshot = self.snapshot.as_slice();
        let rule     = &self.rule;
        let stages   = self.stages.as_slice();
        let agents   = &mut self.population.agents;
        let rngs     = &mut self.rngs.inner;

        #[cfg(not(feature = "parallel"))]
        {
            agents
                .iter_mut()
                .zip(rngs.iter_mut())
                .enumerate()
                .map(|(i, (agent, rng))| {
                    agent.update_opinion(AgentId(i as u32), snapshot, rule, stages, rng)
                })
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let outcomes: Vec<_> = agents
                .par_iter_mut()
                .zip(rngs.par_iter_mut())
                .enumerate()
                .map(|(i, (agent, rng))| {
                    agent.update_opinion(AgentId(i as u32), snapshot, rule, stages, rng)
                })
                .collect();
            outcomes.into_iter().collect()
        }
    }

    fn update_sequential(&mut self) -> InteractionTally {
        let mut tally = InteractionTally::default();
        for i in 0..self.population.len() {
            let id = AgentId(i as u32);
            // Update a copy so the live slice can be read as partner state;
            // a self-pairing therefore sees the pre-update opinion.
            let mut agent = self.population.agents[i];
            let outcome = agent.update_opinion(
                id,
                &self.population.agents,
                &self.rule,
                &self.stages,
                self.rngs.get_mut(id),
            );
            self.population.agents[i] = agent;
            tally.record(outcome);
        }
        tally
    }
}
