//! Strongly typed agent identifier.
//!
//! The inner integer is `pub` to allow direct indexing into population
//! `Vec`s via `id.0 as usize`, but callers should prefer [`AgentId::index`].

use std::fmt;

/// Index of an agent in the population.
///
/// [`SimulationConfig::validate`][crate::SimulationConfig::validate] caps the
/// population at [`MAX_POPULATION`][crate::MAX_POPULATION], so every
/// index fits.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentId(pub u32);

impl AgentId {
    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AgentId({})", self.0)
    }
}
