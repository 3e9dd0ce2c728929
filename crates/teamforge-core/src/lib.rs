//! TeamForge Core - Participant and team model for team allocation
//!
//! This crate provides the fundamental types for TeamForge:
//! - Domain types (`Participant`, `Team`, `Role`, `TraitType`)
//! - Balance predicates evaluated per team
//! - Validation helpers for allocation preconditions and participant input
//! - The error taxonomy shared by every TeamForge crate

pub mod domain;
pub mod error;
pub mod validation;

pub use domain::{
    BalanceReport, Participant, Role, Team, TraitType, MAX_SKILL_LEVEL, MAX_TRAIT_SCORE,
    MIN_ROLE_DIVERSITY, MIN_SKILL_LEVEL, MIN_TRAIT_SCORE,
};
pub use error::{Result, TeamForgeError};
pub use validation::{validate_capacity, MAX_CAPACITY, MIN_CAPACITY};
