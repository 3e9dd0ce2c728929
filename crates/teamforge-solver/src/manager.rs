//! Team management over repeated allocation runs.
//!
//! [`TeamManager`] owns the latest team list and replaces it wholesale on
//! every successful [`generate_teams`](TeamManager::generate_teams) call.
//! Participant storage and team persistence sit behind the
//! [`ParticipantSource`] and [`TeamSink`] traits.

use std::collections::HashMap;

use teamforge_core::{Participant, Result, Team, TeamForgeError};
use tracing::info;

use crate::allocator::{Allocation, Allocator};
use crate::statistics::AllocationStatistics;

/// Supplies the candidate participants for a run.
pub trait ParticipantSource {
    fn participants(&self) -> Result<Vec<Participant>>;
}

impl ParticipantSource for Vec<Participant> {
    fn participants(&self) -> Result<Vec<Participant>> {
        Ok(self.clone())
    }
}

impl ParticipantSource for [Participant] {
    fn participants(&self) -> Result<Vec<Participant>> {
        Ok(self.to_vec())
    }
}

/// Receives a generated team list, typically to persist or export it.
pub trait TeamSink {
    fn accept(&mut self, teams: &[Team]) -> Result<()>;
}

/// Holds the teams of the most recent allocation run.
#[derive(Debug, Default)]
pub struct TeamManager {
    allocator: Allocator,
    teams: Vec<Team>,
    unassigned: Vec<Participant>,
    membership: HashMap<String, String>,
    statistics: Option<AllocationStatistics>,
}

impl TeamManager {
    pub fn new(allocator: Allocator) -> Self {
        Self {
            allocator,
            ..Self::default()
        }
    }

    pub fn allocator(&self) -> &Allocator {
        &self.allocator
    }

    /// Runs an allocation over `source` and replaces the current teams.
    ///
    /// On error the previous teams are kept unchanged.
    pub fn generate_teams<S>(&mut self, source: &S, capacity: usize) -> Result<&[Team]>
    where
        S: ParticipantSource + ?Sized,
    {
        let participants = source.participants()?;
        let Allocation {
            teams,
            unassigned,
            statistics,
        } = self.allocator.allocate(&participants, capacity)?;

        self.membership = teams
            .iter()
            .flat_map(|team| {
                team.members()
                    .iter()
                    .map(move |p| (p.id().to_string(), team.id().to_string()))
            })
            .collect();
        self.teams = teams;
        self.unassigned = unassigned;
        self.statistics = Some(statistics);

        info!(
            event = "teams_generated",
            teams = self.teams.len(),
            unassigned = self.unassigned.len(),
        );
        Ok(&self.teams)
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    /// Participants the last run left out.
    pub fn unassigned(&self) -> &[Participant] {
        &self.unassigned
    }

    pub fn statistics(&self) -> Option<&AllocationStatistics> {
        self.statistics.as_ref()
    }

    /// The team currently holding `participant_id`.
    pub fn team_for_participant(&self, participant_id: &str) -> Option<&Team> {
        let team_id = self.membership.get(participant_id)?;
        self.teams.iter().find(|t| t.id() == team_id)
    }

    pub fn clear(&mut self) {
        self.teams.clear();
        self.unassigned.clear();
        self.membership.clear();
        self.statistics = None;
    }

    /// Hands the current teams to `sink`.
    ///
    /// # Errors
    ///
    /// `NoTeams` if no teams have been generated, otherwise whatever the
    /// sink reports.
    pub fn export<K: TeamSink + ?Sized>(&self, sink: &mut K) -> Result<()> {
        if self.teams.is_empty() {
            return Err(TeamForgeError::NoTeams);
        }
        sink.accept(&self.teams)?;
        info!(event = "teams_exported", teams = self.teams.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teamforge_config::AllocatorConfig;
    use teamforge_test::pool::seeded_pool;

    #[derive(Default)]
    struct MemorySink {
        exported: Vec<Vec<String>>,
    }

    impl TeamSink for MemorySink {
        fn accept(&mut self, teams: &[Team]) -> Result<()> {
            self.exported = teams
                .iter()
                .map(|t| t.members().iter().map(|m| m.id().to_string()).collect())
                .collect();
            Ok(())
        }
    }

    struct FailingSource;

    impl ParticipantSource for FailingSource {
        fn participants(&self) -> Result<Vec<Participant>> {
            Err(TeamForgeError::Internal("source unavailable".to_string()))
        }
    }

    fn manager() -> TeamManager {
        TeamManager::new(Allocator::new(AllocatorConfig::new().with_random_seed(3)))
    }

    #[test]
    fn test_generate_and_lookup() {
        let pool = seeded_pool(21, 1);
        let mut manager = manager();
        let count = manager.generate_teams(&pool, 4).unwrap().len();

        assert_eq!(count, 5);
        assert_eq!(manager.team_count(), 5);
        assert_eq!(manager.unassigned().len(), 1);
        assert!(manager.statistics().is_some());

        for team in manager.teams() {
            for member in team.members() {
                let found = manager.team_for_participant(member.id()).unwrap();
                assert_eq!(found.id(), team.id());
            }
        }
        let left_out = manager.unassigned()[0].id().to_string();
        assert!(manager.team_for_participant(&left_out).is_none());
    }

    #[test]
    fn test_regeneration_replaces_teams() {
        let mut manager = manager();
        manager.generate_teams(&seeded_pool(20, 2), 4).unwrap();
        assert_eq!(manager.team_count(), 5);

        let smaller = seeded_pool(9, 3);
        manager.generate_teams(&smaller[..], 3).unwrap();
        assert_eq!(manager.team_count(), 3);
        assert!(manager.team_for_participant("P010").is_none());
    }

    #[test]
    fn test_failed_run_keeps_previous_teams() {
        let mut manager = manager();
        manager.generate_teams(&seeded_pool(20, 4), 4).unwrap();

        assert!(manager.generate_teams(&seeded_pool(7, 4), 4).is_err());
        assert!(manager.generate_teams(&FailingSource, 4).is_err());
        assert_eq!(manager.team_count(), 5);
    }

    #[test]
    fn test_export() {
        let mut manager = manager();
        let mut sink = MemorySink::default();
        assert!(matches!(
            manager.export(&mut sink),
            Err(TeamForgeError::NoTeams)
        ));

        manager.generate_teams(&seeded_pool(12, 5), 3).unwrap();
        manager.export(&mut sink).unwrap();
        assert_eq!(sink.exported.len(), 4);
        assert!(sink.exported.iter().all(|members| members.len() == 3));
    }

    #[test]
    fn test_clear() {
        let mut manager = manager();
        manager.generate_teams(&seeded_pool(12, 6), 3).unwrap();
        manager.clear();
        assert_eq!(manager.team_count(), 0);
        assert!(manager.statistics().is_none());
        assert!(manager.team_for_participant("P001").is_none());
    }
}
