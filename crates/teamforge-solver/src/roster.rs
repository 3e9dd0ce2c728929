//! Shared team roster with an assignment index.
//!
//! The roster is the single mutable resource of an allocation run. The
//! parallel phases hold it behind one `Mutex`, so the "already assigned"
//! lookup and the membership change it guards happen under the same lock.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use teamforge_core::{Participant, Result, Team, TeamForgeError};

/// Teams of one run plus a participant-id to team-index map kept in step
/// with every membership change.
#[derive(Debug, Clone)]
pub struct Roster {
    teams: Vec<Team>,
    assignments: HashMap<String, usize>,
}

impl Roster {
    /// Creates `team_count` empty teams named `TEAM_1`, `TEAM_2`, ...
    pub fn new(team_count: usize, capacity: usize) -> Self {
        let teams = (1..=team_count)
            .map(|n| Team::new(format!("TEAM_{n}"), capacity))
            .collect();
        Self {
            teams,
            assignments: HashMap::new(),
        }
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn is_assigned(&self, participant_id: &str) -> bool {
        self.assignments.contains_key(participant_id)
    }

    /// Index of the team holding `participant_id`.
    pub fn team_of(&self, participant_id: &str) -> Option<usize> {
        self.assignments.get(participant_id).copied()
    }

    pub fn assigned_count(&self) -> usize {
        self.assignments.len()
    }

    /// True while at least one team has an open seat.
    pub fn has_open_team(&self) -> bool {
        self.teams.iter().any(|t| !t.is_full())
    }

    pub fn open_seats(&self) -> usize {
        self.teams.iter().map(Team::remaining).sum()
    }

    /// Places `participant` on the team at `team_idx`.
    ///
    /// Returns false, leaving the roster unchanged, if the participant is
    /// already on any team, the index is out of range or the team is full.
    pub fn assign(&mut self, team_idx: usize, participant: Participant) -> bool {
        if self.is_assigned(participant.id()) {
            return false;
        }
        let Some(team) = self.teams.get_mut(team_idx) else {
            return false;
        };
        let id = participant.id().to_string();
        if !team.add_member(participant) {
            return false;
        }
        self.assignments.insert(id, team_idx);
        true
    }

    /// Participants of `pool` that no team holds, in pool order.
    pub fn unassigned<'a>(&self, pool: &'a [Participant]) -> Vec<&'a Participant> {
        pool.iter().filter(|p| !self.is_assigned(p.id())).collect()
    }

    pub fn into_teams(self) -> Vec<Team> {
        self.teams
    }
}

/// Failure reason reported by every phase that finds the roster poisoned.
pub(crate) const POISONED_REASON: &str = "roster lock poisoned by a failed worker";

/// Locks a shared roster on behalf of `phase`; a poisoned lock fails that
/// phase.
pub(crate) fn lock_roster<'a>(
    roster: &'a Mutex<Roster>,
    phase: &'static str,
) -> Result<MutexGuard<'a, Roster>> {
    roster.lock().map_err(|_| TeamForgeError::PhaseFailed {
        phase,
        reason: POISONED_REASON.to_string(),
    })
}
