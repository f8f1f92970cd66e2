//! `polar-sim` — step loop orchestrator for the polarsim framework.
//!
//! # Step loop
//!
//! ```text
//! setup:  validate config → resolve seed → Normal(0.5, 0.2) opinions
//! for step in 0..config.num_steps:
//!   ① should_stop — observer may cancel between steps
//!   ② Update      — every agent calls update_opinion exactly once
//!                   (parallel with the `parallel` feature, snapshot mode)
//!   ③ Record      — mean / stddev / variance / histogram → StepRecord
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs snapshot-mode updates on Rayon's thread pool.     |
//! | `serde`    | Serialize/deserialize configs and results.             |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use polar_core::SimulationConfig;
//!
//! let result = polar_sim::run(SimulationConfig::default())?;
//! println!("final variance {:.4}", result.last().unwrap().variance());
//! ```

pub mod builder;
pub mod engine;
pub mod error;
pub mod observer;

#[cfg(test)]
mod tests;

pub use builder::EngineBuilder;
pub use engine::{Engine, RunStatus};
pub use error::{SimError, SimResult};
pub use observer::{CancelFlag, NoopObserver, SimObserver};

use polar_core::SimulationConfig;
use polar_stats::SimulationResult;

/// Set up and run `config` to completion, returning every recorded step.
pub fn run(config: SimulationConfig) -> SimResult<SimulationResult> {
    run_with_observer(config, &mut NoopObserver)
}

/// Like [`run`], with observer callbacks.  A cancelled run returns the steps
/// recorded before cancellation.
pub fn run_with_observer<O: SimObserver>(
    config:   SimulationConfig,
    observer: &mut O,
) -> SimResult<SimulationResult> {
    let mut engine = Engine::setup(config)?;
    engine.run(observer);
    Ok(engine.into_result())
}
