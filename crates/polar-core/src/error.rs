//! Configuration error type.
//!
//! Configuration problems are reported as [`ConfigError`] before any
//! simulation work begins.  Sub-crates wrap it in their own error enums via
//! `From` impls.

use thiserror::Error;

/// A `SimulationConfig` that cannot be run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("population size must be at least 1")]
    EmptyPopulation,

    #[error("population size {population_size} exceeds the maximum of {max}")]
    PopulationTooLarge { population_size: usize, max: usize },

    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{field} must be greater than zero, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} is a probability and must lie in [0, 1], got {value}")]
    ProbabilityOutOfRange { field: &'static str, value: f64 },

    #[error("excluding self-pairing needs at least 2 agents, got {population_size}")]
    NoEligiblePartner { population_size: usize },
}

/// Shorthand result type for configuration validation.
pub type ConfigResult<T> = Result<T, ConfigError>;
