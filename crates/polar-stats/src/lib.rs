//! `polar-stats` — aggregate statistics recorded once per step.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`histogram`] | `Histogram` — fixed 25 bins over [0, 1]                     |
//! | [`summary`]   | `OpinionStats::compute` — pure projection of an opinion slice |
//! | [`record`]    | `InteractionTally`, `StepRecord`, `SimulationResult`        |
//!
//! Everything here is a plain value computed from an opinion slice; nothing
//! holds a reference into the engine, so statistics can be computed and
//! tested without running a simulation.

pub mod histogram;
pub mod record;
pub mod summary;


pub use histogram::{BIN_COUNT, Histogram};
pub use record::{InteractionTally, SimulationResult, StepRecord};
pub use summary::OpinionStats;
