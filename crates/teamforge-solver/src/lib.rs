//! TeamForge allocation engine
//!
//! This crate turns a pool of participants into fixed-capacity teams:
//! - Participant ordering (deterministic or seeded shuffle)
//! - Round-robin Leader and Thinker placement
//! - Concurrent best-fit phases over a shared roster
//! - Skill balancing and role-diversity repair swaps
//! - Run statistics and a progress event stream
//! - [`TeamManager`] for holding and exporting the latest teams

pub mod allocator;
pub mod balance;
pub mod event;
pub mod manager;
pub mod ordering;
pub mod phase;
pub mod repair;
pub mod roster;
pub mod scope;
pub mod scoring;
pub mod statistics;
pub mod swap;

pub use allocator::{Allocation, Allocator};
pub use balance::{balance_teams, global_team_average, total_deviation};
pub use event::AllocationEvent;
pub use manager::{ParticipantSource, TeamManager, TeamSink};
pub use ordering::order_participants;
pub use phase::PhaseKind;
pub use repair::repair_diversity;
pub use roster::Roster;
pub use scope::RunScope;
pub use scoring::{FitBreakdown, FitScorer, Selection, BASE_SCORE};
pub use statistics::{AllocationStatistics, PhaseStatistics};
pub use swap::SwapMove;
