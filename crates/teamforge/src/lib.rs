//! TeamForge - Balanced Team Allocation in Rust
//!
//! Feed in a participant pool and a team capacity, get back full teams that
//! each carry a leader, a thinker, a spread of roles and a skill average
//! close to the pool's.
//!
//! # Example
//!
//! ```rust
//! use teamforge::prelude::*;
//!
//! let roles = [Role::Strategist, Role::Attacker, Role::Defender, Role::Supporter];
//! let pool: Vec<Participant> = (0..12)
//!     .map(|i| {
//!         Participant::new(
//!             format!("P{:03}", i + 1),
//!             format!("Player {i}"),
//!             "player@uni.edu",
//!             "Valorant",
//!             (i % 10 + 1) as u8,
//!             roles[i % 4],
//!             50 + (i as u8 * 4),
//!         )
//!         .unwrap()
//!     })
//!     .collect();
//!
//! let allocation = teamforge::allocate(&pool, 4).unwrap();
//! assert_eq!(allocation.teams.len(), 3);
//! assert!(allocation.unassigned.is_empty());
//! ```

pub use teamforge_config::{
    AllocatorConfig, BalancingConfig, ConfigError, OrderingStrategy, RepairConfig, ScoringConfig,
    TerminationConfig,
};
pub use teamforge_core::{
    validate_capacity, BalanceReport, Participant, Role, Team, TeamForgeError, TraitType,
    MAX_CAPACITY, MIN_CAPACITY,
};
pub use teamforge_solver::{
    Allocation, AllocationEvent, AllocationStatistics, Allocator, ParticipantSource,
    PhaseKind, PhaseStatistics, TeamManager, TeamSink,
};

#[cfg(feature = "console")]
pub mod console;

/// Crate-wide result type.
pub type Result<T> = teamforge_core::Result<T>;

pub mod prelude {
    pub use crate::{
        AllocationEvent, Allocator, AllocatorConfig, OrderingStrategy, Participant, Role, Team,
        TeamForgeError, TeamManager, TraitType,
    };
}

/// Allocates `participants` into teams of `capacity` with the default
/// configuration.
///
/// With the `console` feature enabled this also installs the colored
/// console subscriber on first use.
pub fn allocate(participants: &[Participant], capacity: usize) -> Result<Allocation> {
    allocate_with(AllocatorConfig::default(), participants, capacity)
}

/// Like [`allocate`], with an explicit configuration.
///
/// An invalid configuration is rejected as `InvalidConfig` before any
/// participant is placed.
pub fn allocate_with(
    config: AllocatorConfig,
    participants: &[Participant],
    capacity: usize,
) -> Result<Allocation> {
    #[cfg(feature = "console")]
    console::init();

    Allocator::new(config).allocate(participants, capacity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use teamforge_test::pool::seeded_pool;

    #[test]
    fn test_allocate_with_defaults() {
        let pool = seeded_pool(18, 21);
        let allocation = allocate(&pool, 6).unwrap();
        assert_eq!(allocation.teams.len(), 3);
        assert!(allocation.teams.iter().all(Team::is_full));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let pool = seeded_pool(18, 21);
        let config = AllocatorConfig::new().with_worker_count(0);
        assert!(matches!(
            allocate_with(config, &pool, 6),
            Err(TeamForgeError::InvalidConfig(_))
        ));
    }
}
