//! Population storage: `Population` (agent state) and `AgentRngs`
//! (per-agent RNG).
//!
//! # Why two structs?
//!
//! An update needs `&mut AgentRng` for the updating agent while reading the
//! rest of the population.  Keeping the RNGs in a separate `AgentRngs` lets
//! the engine hold `&mut AgentRngs` next to `&[Agent]` (or zip
//! `par_iter_mut()` over both) without fighting the borrow checker.

use polar_core::{AgentId, AgentRng, MAX_POPULATION, SimRng};

use crate::{Agent, Group, Opinion};

/// Mean of the initial opinion distribution.
pub const INITIAL_MEAN: f64 = 0.5;

/// Standard deviation of the initial opinion distribution.
pub const INITIAL_STD_DEV: f64 = 0.2;

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG state, indexed by `AgentId`.
pub struct AgentRngs {
    pub inner: Vec<AgentRng>,
}

impl AgentRngs {
    /// Allocate and seed `count` per-agent RNGs from `global_seed`.
    ///
    /// `count` must not exceed [`MAX_POPULATION`].
    pub(crate) fn new(count: usize, global_seed: u64) -> Self {
        debug_assert!(count <= MAX_POPULATION, "population of {count} overflows AgentId");
        let inner = (0..count as u32)
            .map(|i| AgentRng::new(global_seed, AgentId(i)))
            .collect();
        Self { inner }
    }

    /// Mutable reference to one agent's RNG.
    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> &mut AgentRng {
        &mut self.inner[agent.index()]
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── Population ────────────────────────────────────────────────────────────────

/// The fixed-size set of agents for one run.  `AgentId(i)` is `agents[i]`.
#[derive(Clone, Debug, Default)]
pub struct Population {
    pub agents: Vec<Agent>,
}

impl Population {
    #[inline]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.agents.len() as u32).map(AgentId)
    }

    #[inline]
    pub fn get(&self, agent: AgentId) -> Option<&Agent> {
        self.agents.get(agent.index())
    }

    /// Current opinions as plain floats, in `AgentId` order.
    pub fn opinions(&self) -> Vec<f64> {
        self.agents.iter().map(|a| a.opinion.value()).collect()
    }
}

// ── PopulationBuilder ─────────────────────────────────────────────────────────

/// Fluent builder for [`Population`] + [`AgentRngs`].
///
/// ```rust
/// use polar_agent::PopulationBuilder;
///
/// let (population, rngs) = PopulationBuilder::new(100, /*seed=*/ 42).build();
/// assert_eq!(population.len(), 100);
/// assert_eq!(rngs.len(), 100);
/// assert!(population.agents.iter().all(|a| (0.0..=1.0).contains(&a.opinion.value())));
/// ```
pub struct PopulationBuilder {
    count:         usize,
    seed:          u64,
    opinions:      Option<Vec<f64>>,
    assign_groups: bool,
}

impl PopulationBuilder {
    /// Builder for `count` agents with opinions drawn from
    /// Normal(0.5, 0.2), clamped into [0, 1].  `count` must not exceed
    /// [`MAX_POPULATION`]; `SimulationConfig::validate` enforces this for
    /// engine-built populations.
    pub fn new(count: usize, seed: u64) -> Self {
        Self { count, seed, opinions: None, assign_groups: false }
    }

    /// Builder whose agents start at exactly `opinions` (clamped).  The
    /// population size is `opinions.len()`.
    pub fn from_opinions(opinions: Vec<f64>, seed: u64) -> Self {
        Self { count: opinions.len(), seed, opinions: Some(opinions), assign_groups: false }
    }

    /// Assign each agent a group uniformly from `Left | Neutral | Right`.
    ///
    /// When not called every agent is `Neutral`.
    pub fn assign_groups(mut self, yes: bool) -> Self {
        self.assign_groups = yes;
        self
    }

    /// Construct the population and its RNGs.
    pub fn build(self) -> (Population, AgentRngs) {
        let mut setup_rng = SimRng::new(self.seed);

        let agents = (0..self.count)
            .map(|i| {
                let raw = match &self.opinions {
                    Some(v) => v[i],
                    None    => setup_rng.normal(INITIAL_MEAN, INITIAL_STD_DEV),
                };
                let group = if self.assign_groups {
                    Group::ALL[setup_rng.gen_range(0..Group::ALL.len())]
                } else {
                    Group::Neutral
                };
                Agent::new(Opinion::new(raw), group)
            })
            .collect();

        (Population { agents }, AgentRngs::new(self.count, self.seed))
    }
}
