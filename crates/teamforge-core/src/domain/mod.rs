//! Entity model for team allocation
//!
//! - `Participant`: an individually profiled entity with immutable identity
//! - `Team`: a fixed-capacity roster with a cached skill average
//! - `Role` / `TraitType`: closed categorical attributes of a participant

mod participant;
mod role;
mod team;
mod trait_type;

pub use participant::{Participant, MAX_SKILL_LEVEL, MIN_SKILL_LEVEL};
pub use role::Role;
pub use team::{BalanceReport, Team, MIN_ROLE_DIVERSITY};
pub use trait_type::{TraitType, MAX_TRAIT_SCORE, MIN_TRAIT_SCORE};
