//! Optional update stages composed after the pairwise rule.
//!
//! Each stage is gated by its own probability and runs against the same
//! partner the pairwise rule drew.  Stages are disabled unless a
//! [`StageConfig`] probability is set, so the base model is unchanged by
//! their existence.

use polar_core::{AgentRng, StageConfig};

use crate::{Agent, Group, InteractionRule};

/// A post-rule update step.
///
/// # Thread safety
///
/// With the `parallel` feature of `polar-sim` stages are shared across Rayon
/// workers, so implementations must be `Send + Sync` and hold no per-agent
/// state; per-agent data belongs on [`Agent`].
pub trait UpdateStage: Send + Sync + 'static {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Possibly adjust `agent` after its pairwise update.
    ///
    /// Returns `true` if the stage fired.
    fn apply(
        &self,
        agent:   &mut Agent,
        partner: &Agent,
        rule:    &InteractionRule,
        rng:     &mut AgentRng,
    ) -> bool;
}

/// Pull toward the agent's initial opinion with probability `probability`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SelfInterest {
    pub probability: f64,
}

impl UpdateStage for SelfInterest {
    fn name(&self) -> &'static str {
        "self_interest"
    }

    fn apply(
        &self,
        agent:    &mut Agent,
        _partner: &Agent,
        rule:     &InteractionRule,
        rng:      &mut AgentRng,
    ) -> bool {
        if rng.unit() > self.probability {
            return false;
        }
        agent.opinion = agent.opinion.toward(agent.initial_opinion, rule.movement_coefficient);
        true
    }
}

/// In-group attraction / out-group repulsion, independent of distance.
///
/// Only agents with a non-`Neutral` group take part; a `Neutral` partner
/// counts as out-group.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GroupAffinity {
    pub probability: f64,
}

impl UpdateStage for GroupAffinity {
    fn name(&self) -> &'static str {
        "group_affinity"
    }

    fn apply(
        &self,
        agent:   &mut Agent,
        partner: &Agent,
        rule:    &InteractionRule,
        rng:     &mut AgentRng,
    ) -> bool {
        if rng.unit() > self.probability || agent.group == Group::Neutral {
            return false;
        }
        let r = rule.movement_coefficient;
        agent.opinion = if agent.group == partner.group {
            agent.opinion.toward(partner.opinion, r)
        } else {
            agent.opinion.away_from(partner.opinion, r)
        };
        true
    }
}

/// Build the enabled stages in their fixed order: self-interest, then group
/// affinity.
pub fn stages_from_config(config: &StageConfig) -> Vec<Box<dyn UpdateStage>> {
    let mut stages: Vec<Box<dyn UpdateStage>> = Vec::new();
    if let Some(probability) = config.self_interest {
        stages.push(Box::new(SelfInterest { probability }));
    }
    if let Some(probability) = config.group_affinity {
        stages.push(Box::new(GroupAffinity { probability }));
    }
    stages
}
