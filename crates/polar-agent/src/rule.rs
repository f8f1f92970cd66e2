//! The pairwise interaction rule.

use polar_core::{AgentId, AgentRng, PartnerSelection, SimulationConfig};

use crate::Opinion;

/// Parameters of the pairwise rule, extracted from a validated
/// [`SimulationConfig`].
///
/// `InteractionRule` is `Copy` and holds no state, so one instance is shared
/// read-only by every agent update in a step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InteractionRule {
    /// E: see [`SimulationConfig::exposure_scale`].
    pub exposure_scale: f64,
    /// T: see [`SimulationConfig::tolerance_window`].
    pub tolerance_window: f64,
    /// R: see [`SimulationConfig::movement_coefficient`].
    pub movement_coefficient: f64,
    pub partner_selection: PartnerSelection,
}

impl InteractionRule {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            exposure_scale:       config.exposure_scale,
            tolerance_window:     config.tolerance_window,
            movement_coefficient: config.movement_coefficient,
            partner_selection:    config.partner_selection,
        }
    }

    /// `0.5^(distance / E)`: 1 at distance 0, halving every `E` of distance.
    #[inline]
    pub fn interaction_probability(&self, distance: f64) -> f64 {
        0.5_f64.powf(distance / self.exposure_scale)
    }

    /// `true` if an accepted encounter at `distance` attracts.
    #[inline]
    pub fn attracts(&self, distance: f64) -> bool {
        distance <= self.tolerance_window
    }

    /// Pick a partner for `agent` out of `population_size` agents.
    ///
    /// # Panics
    ///
    /// Panics if no partner is eligible (`population_size == 0`, or
    /// `ExcludeSelf` with a single agent).  Config validation rules both out.
    pub fn pick_partner(
        &self,
        agent:           AgentId,
        population_size: usize,
        rng:             &mut AgentRng,
    ) -> AgentId {
        let index = match self.partner_selection {
            PartnerSelection::IncludeSelf => rng.gen_range(0..population_size),
            PartnerSelection::ExcludeSelf => {
                // Draw from the n-1 others and skip over our own slot.
                let k = rng.gen_range(0..population_size - 1);
                if k >= agent.index() { k + 1 } else { k }
            }
        };
        AgentId(index as u32)
    }

    /// Opinion after an accepted encounter with `partner`.
    #[inline]
    pub fn respond(&self, own: Opinion, partner: Opinion) -> Opinion {
        if self.attracts(own.distance(partner)) {
            own.toward(partner, self.movement_coefficient)
        } else {
            own.away_from(partner, self.movement_coefficient)
        }
    }
}
