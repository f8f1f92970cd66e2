//! Per-step records and the full recorded series.

use polar_agent::Interaction;
use polar_core::Step;

use crate::{BIN_COUNT, OpinionStats};

/// How the pairwise rule resolved across one step's updates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InteractionTally {
    pub idle:      u64,
    pub attracted: u64,
    pub repelled:  u64,
}

impl InteractionTally {
    #[inline]
    pub fn record(&mut self, outcome: Interaction) {
        match outcome {
            Interaction::Idle      => self.idle += 1,
            Interaction::Attracted => self.attracted += 1,
            Interaction::Repelled  => self.repelled += 1,
        }
    }

    /// Number of updates counted.
    pub fn total(&self) -> u64 {
        self.idle + self.attracted + self.repelled
    }
}

impl FromIterator<Interaction> for InteractionTally {
    fn from_iter<I: IntoIterator<Item = Interaction>>(iter: I) -> Self {
        let mut tally = Self::default();
        for outcome in iter {
            tally.record(outcome);
        }
        tally
    }
}

/// Statistics recorded after one step.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepRecord {
    pub step:         Step,
    pub stats:        OpinionStats,
    pub interactions: InteractionTally,
}

impl StepRecord {
    #[inline]
    pub fn mean(&self) -> f64 {
        self.stats.mean
    }

    #[inline]
    pub fn stddev(&self) -> f64 {
        self.stats.stddev
    }

    #[inline]
    pub fn variance(&self) -> f64 {
        self.stats.variance
    }

    #[inline]
    pub fn histogram_counts(&self) -> &[u64; BIN_COUNT] {
        &self.stats.histogram.counts
    }

    #[inline]
    pub fn histogram_bin_edges(&self) -> &[f64; BIN_COUNT + 1] {
        &self.stats.histogram.edges
    }
}

/// The ordered series of [`StepRecord`]s produced by one run.
///
/// `records[i].step == Step(i)`.  A run cancelled by its observer holds fewer
/// than `requested_steps` records; see [`is_complete`](Self::is_complete).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationResult {
    /// The global seed the run actually used (configured or drawn).
    pub seed: u64,
    pub requested_steps: u64,
    pub records: Vec<StepRecord>,
}

impl SimulationResult {
    pub fn new(seed: u64, requested_steps: u64) -> Self {
        Self {
            seed,
            requested_steps,
            records: Vec::with_capacity(requested_steps.min(1 << 20) as usize),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `true` if every requested step was recorded.
    pub fn is_complete(&self) -> bool {
        self.records.len() as u64 == self.requested_steps
    }

    pub fn get(&self, step: Step) -> Option<&StepRecord> {
        self.records.get(step.index())
    }

    pub fn last(&self) -> Option<&StepRecord> {
        self.records.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StepRecord> {
        self.records.iter()
    }

    /// Variance per step (the total polarization curve).
    pub fn variance_series(&self) -> Vec<f64> {
        self.records.iter().map(StepRecord::variance).collect()
    }

    pub fn mean_series(&self) -> Vec<f64> {
        self.records.iter().map(StepRecord::mean).collect()
    }
}

impl<'a> IntoIterator for &'a SimulationResult {
    type Item = &'a StepRecord;
    type IntoIter = std::slice::Iter<'a, StepRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
