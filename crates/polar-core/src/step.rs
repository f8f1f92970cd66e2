//! Discrete simulation time.
//!
//! A `Step` is one unit of simulated time in which every agent performs
//! exactly one opinion update.  Steps are zero-based: the record produced
//! after the first round of updates belongs to `Step(0)`.

use std::fmt;

/// A zero-based step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Step(pub u64);

impl Step {
    pub const ZERO: Step = Step(0);

    /// The step immediately after `self`.
    #[inline]
    pub fn next(self) -> Step {
        Step(self.0 + 1)
    }

    /// Cast to `usize` for indexing into a recorded series.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}
