//! The allocation pipeline: ordering, placement phases, balancing, repair.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;
use teamforge_config::AllocatorConfig;
use teamforge_core::{validate_capacity, Participant, Result, Team, TeamForgeError, TraitType};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use crate::balance::balance_teams;
use crate::event::{AllocationEvent, EventPublisher};
use crate::ordering::order_participants;
use crate::phase::{place_round_robin, run_parallel_phases, ParallelContext, PhaseKind};
use crate::repair::repair_diversity;
use crate::roster::{lock_roster, Roster};
use crate::scope::RunScope;
use crate::scoring::FitScorer;
use crate::statistics::{AllocationStatistics, PhaseStatistics};

/// Result of one successful allocation run.
#[derive(Debug, Clone)]
pub struct Allocation {
    /// Full teams in creation order.
    pub teams: Vec<Team>,
    /// Participants left out of this run, in input order.
    pub unassigned: Vec<Participant>,
    pub statistics: AllocationStatistics,
}

impl Allocation {
    pub fn placed_count(&self) -> usize {
        self.teams.iter().map(Team::len).sum()
    }
}

/// Assigns participants to fixed-capacity teams.
///
/// Each call to [`allocate`](Self::allocate) is an independent batch run
/// over an immutable snapshot of the input. A run either returns every team
/// or fails as a whole; no partial team list is ever returned.
///
/// # Examples
///
/// ```
/// use teamforge_config::AllocatorConfig;
/// use teamforge_core::{Participant, Role};
/// use teamforge_solver::Allocator;
///
/// let roles = [Role::Strategist, Role::Attacker, Role::Defender, Role::Supporter];
/// let pool: Vec<Participant> = (0..8)
///     .map(|i| {
///         Participant::new(
///             format!("P{:03}", i + 1),
///             format!("Player {i}"),
///             "player@uni.edu",
///             "FIFA",
///             (i % 10 + 1) as u8,
///             roles[i % 4],
///             50 + (i as u8 * 7),
///         )
///         .unwrap()
///     })
///     .collect();
///
/// let allocator = Allocator::new(AllocatorConfig::new().with_random_seed(1));
/// let allocation = allocator.allocate(&pool, 4).unwrap();
/// assert_eq!(allocation.teams.len(), 2);
/// assert!(allocation.teams.iter().all(|t| t.is_full()));
/// ```
#[derive(Debug, Clone)]
pub struct Allocator {
    config: AllocatorConfig,
    time_limit: Duration,
}

impl Allocator {
    pub fn new(config: AllocatorConfig) -> Self {
        let time_limit = config.time_limit();
        Self { config, time_limit }
    }

    /// Overrides the configured time limit, allowing sub-second bounds.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// Allocates `participants` into teams of `capacity`.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if the configuration fails
    ///   [`AllocatorConfig::validate`]
    /// - precondition errors from [`validate_capacity`], or
    ///   `InvalidParticipant` for a duplicated participant id
    /// - `PhaseFailed` if a parallel phase panicked or poisoned the roster
    /// - `Timeout` if the run exceeded its time limit
    pub fn allocate(&self, participants: &[Participant], capacity: usize) -> Result<Allocation> {
        self.run(participants, capacity, EventPublisher::default())
    }

    /// Like [`allocate`](Self::allocate), publishing progress events to
    /// `sender` as each stage completes.
    pub fn allocate_with_channel(
        &self,
        participants: &[Participant],
        capacity: usize,
        sender: UnboundedSender<AllocationEvent>,
    ) -> Result<Allocation> {
        self.run(participants, capacity, EventPublisher::new(Some(sender)))
    }

    fn run(
        &self,
        participants: &[Participant],
        capacity: usize,
        events: EventPublisher,
    ) -> Result<Allocation> {
        self.config
            .validate()
            .map_err(|e| TeamForgeError::InvalidConfig(e.to_string()))?;
        validate_capacity(capacity, participants.len())?;
        check_unique_ids(participants)?;

        let seed = self
            .config
            .random_seed
            .unwrap_or_else(|| rand::rng().random::<u64>());
        let scope = RunScope::new(self.time_limit, seed);
        let team_count = participants.len() / capacity;

        info!(
            event = "allocation_start",
            participants = participants.len(),
            capacity,
            team_count,
            seed = scope.seed(),
        );

        let mut rng = scope.phase_rng(0);
        let ordered = order_participants(participants, self.config.ordering, &mut rng);
        let offset = if self.config.randomize_leader_offset {
            rng.random_range(0..team_count)
        } else {
            0
        };

        let mut statistics = AllocationStatistics::default();
        let mut roster = Roster::new(team_count, capacity);

        for (kind, trait_type, tiers) in [
            (PhaseKind::LeaderPlacement, TraitType::Leader, &[1_usize][..]),
            (PhaseKind::ThinkerPlacement, TraitType::Thinker, &[1, 2][..]),
        ] {
            info!(event = "phase_start", phase = kind.name());
            let elapsed_before = scope.elapsed();
            let placed = place_round_robin(&mut roster, &ordered, trait_type, tiers, offset);
            let stats = PhaseStatistics::new(kind, placed, scope.elapsed() - elapsed_before);
            info!(event = "phase_end", phase = kind.name(), placed);
            events.publish(AllocationEvent::PhaseCompleted(stats.clone()));
            statistics.phases.push(stats);
        }
        ensure_within_limit(&scope)?;

        let ctx = ParallelContext {
            roster: Arc::new(Mutex::new(roster)),
            scorer: FitScorer::for_pool(self.config.scoring.clone(), participants),
            scope: scope.clone(),
            worker_count: self.config.worker_count,
            shutdown_grace: self.config.termination.shutdown_grace(),
        };
        for stats in run_parallel_phases(&ctx, &ordered)? {
            info!(
                event = "phase_end",
                phase = stats.phase.name(),
                placed = stats.placed,
            );
            events.publish(AllocationEvent::PhaseCompleted(stats.clone()));
            statistics.phases.push(stats);
        }
        let roster = lock_roster(&ctx.roster, PhaseKind::Remainder.name())?.clone();
        ensure_within_limit(&scope)?;

        let mut teams = roster.into_teams();

        if self.config.balancing.enabled {
            statistics.balancing_swaps =
                balance_teams(&mut teams, self.config.balancing.threshold).len();
            events.publish(AllocationEvent::BalancingCompleted {
                swaps: statistics.balancing_swaps,
            });
        }
        ensure_within_limit(&scope)?;

        if self.config.repair.enabled {
            statistics.repair_swaps =
                repair_diversity(&mut teams, self.config.repair.min_role_diversity).len();
            events.publish(AllocationEvent::RepairCompleted {
                swaps: statistics.repair_swaps,
            });
        }
        ensure_within_limit(&scope)?;

        let placed: HashSet<&str> = teams
            .iter()
            .flat_map(|t| t.members().iter().map(Participant::id))
            .collect();
        let unassigned: Vec<Participant> = participants
            .iter()
            .filter(|p| !placed.contains(p.id()))
            .cloned()
            .collect();
        statistics.duration = scope.elapsed();

        info!(
            event = "allocation_end",
            duration_ms = statistics.duration.as_millis() as u64,
            teams = teams.len(),
            unassigned = unassigned.len(),
            balancing_swaps = statistics.balancing_swaps,
            repair_swaps = statistics.repair_swaps,
        );
        events.publish(AllocationEvent::Finished {
            teams: teams.len(),
            unassigned: unassigned.len(),
            duration: statistics.duration,
        });

        Ok(Allocation {
            teams,
            unassigned,
            statistics,
        })
    }
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new(AllocatorConfig::default())
    }
}

fn check_unique_ids(participants: &[Participant]) -> Result<()> {
    let mut seen = HashSet::with_capacity(participants.len());
    for p in participants {
        if !seen.insert(p.id()) {
            return Err(TeamForgeError::InvalidParticipant(format!(
                "duplicate participant id {}",
                p.id()
            )));
        }
    }
    Ok(())
}

fn ensure_within_limit(scope: &RunScope) -> Result<()> {
    if scope.is_expired() {
        scope.terminate();
        warn!(
            event = "timeout",
            limit_ms = scope.time_limit().as_millis() as u64,
        );
        return Err(TeamForgeError::Timeout {
            limit: scope.time_limit(),
        });
    }
    Ok(())
}
