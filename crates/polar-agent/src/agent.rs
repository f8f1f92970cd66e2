//! The `Agent` type and its per-step update.

use polar_core::{AgentId, AgentRng};

use crate::{Group, InteractionRule, Opinion, UpdateStage};

/// Outcome of the pairwise rule for one update.
///
/// Stage effects are not reflected here.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Interaction {
    /// The encounter was rejected (`u > interaction_probability`).
    Idle,
    /// Partner within the tolerance window; moved toward it.
    Attracted,
    /// Partner outside the tolerance window; moved away from it.
    Repelled,
}

/// One member of the population.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Agent {
    pub opinion: Opinion,
    /// Opinion at setup.  Read by the self-interest stage.
    pub initial_opinion: Opinion,
    pub group: Group,
}

impl Agent {
    pub fn new(opinion: Opinion, group: Group) -> Self {
        Self { opinion, initial_opinion: opinion, group }
    }

    /// Perform one update of this agent (`me`) against a partner drawn from
    /// `population`.
    ///
    /// `population` is the state partner opinions are read from: a
    /// start-of-step copy in snapshot mode, or the live population in
    /// sequential mode.  It is never written.
    pub fn update_opinion(
        &mut self,
        me:         AgentId,
        population: &[Agent],
        rule:       &InteractionRule,
        stages:     &[Box<dyn UpdateStage>],
        rng:        &mut AgentRng,
    ) -> Interaction {
        let partner = &population[rule.pick_partner(me, population.len(), rng).index()];
        let distance = self.opinion.distance(partner.opinion);

        let outcome = if rng.unit() > rule.interaction_probability(distance) {
            Interaction::Idle
        } else if rule.attracts(distance) {
            Interaction::Attracted
        } else {
            Interaction::Repelled
        };

        if outcome != Interaction::Idle {
            self.opinion = rule.respond(self.opinion, partner.opinion);
        }

        for stage in stages {
            stage.apply(self, partner, rule, rng);
        }

        outcome
    }
}
