use polar_core::{AgentId, ConfigError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{what} length {got} does not match population size {expected}")]
    PopulationMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("initial opinion of {agent} is not finite: {value}")]
    InvalidOpinion {
        agent: AgentId,
        value: f64,
    },
}

pub type SimResult<T> = Result<T, SimError>;
