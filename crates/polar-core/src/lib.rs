//! `polar-core` — foundational types for the `polarsim` opinion-dynamics
//! framework.
//!
//! This crate is a dependency of every other `polar-*` crate.  It has no
//! `polar-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`ids`]      | `AgentId`                                                  |
//! | [`step`]     | `Step` counter                                             |
//! | [`rng`]      | `AgentRng` (per-agent), `SimRng` (setup / global)          |
//! | [`config`]   | `SimulationConfig`, `StageConfig`, selection / update modes|
//! | [`error`]    | `ConfigError`, `ConfigResult`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod step;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{MAX_POPULATION, PartnerSelection, SimulationConfig, StageConfig, UpdateMode};
pub use error::{ConfigError, ConfigResult};
pub use ids::AgentId;
pub use rng::{AgentRng, SimRng};
pub use step::Step;
