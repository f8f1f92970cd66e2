//! `polar-agent` — agent state and the opinion-update rule.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                   |
//! |------------------|------------------------------------------------------------|
//! | [`opinion`]      | `Opinion` (clamped to [0, 1]), `Group`                     |
//! | [`rule`]         | `InteractionRule` — partner choice, encounter probability  |
//! | [`agent`]        | `Agent`, `Interaction`, `Agent::update_opinion`            |
//! | [`stage`]        | `UpdateStage` trait, `SelfInterest`, `GroupAffinity`       |
//! | [`population`]   | `Population`, `AgentRngs`, `PopulationBuilder`             |
//!
//! # Update pipeline
//!
//! One call to [`Agent::update_opinion`]:
//!
//! ```text
//! partner  = rule.pick_partner(self)          // uniform, self included by default
//! distance = |opinion - partner.opinion|
//! if u <= 0.5^(distance / E):
//!     distance <= T  → attract: opinion += (partner - opinion) * R
//!     otherwise      → repel:   opinion += (opinion - partner) * R
//! clamp into [0, 1]
//! for stage in stages: stage.apply(self, partner)   // optional, off by default
//! ```
//!
//! Only the updating agent is mutated; the partner is read-only.

pub mod agent;
pub mod opinion;
pub mod population;
pub mod rule;
pub mod stage;


pub use agent::{Agent, Interaction};
pub use opinion::{Group, Opinion};
pub use population::{AgentRngs, Population, PopulationBuilder};
pub use rule::InteractionRule;
pub use stage::{GroupAffinity, SelfInterest, UpdateStage, stages_from_config};
