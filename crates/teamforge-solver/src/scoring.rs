//! Fit scorer ranking open teams for one participant.
//!
//! The score is a sum of independent terms on top of a base of 100:
//!
//! | Term | Applies when | Effect |
//! |---|---|---|
//! | group | team already holds `group_cap` members of the same preference group | `-group_penalty` |
//! | role | team has no member with the participant's role | `+role_bonus` |
//! | trait | Leader joining a team without one | `+leader_bonus` |
//! | trait | Balanced/Thinker below a third of the team capacity | `+trait_bonus` |
//! | skill | always, 0 for an empty team | distance gained toward the global average × `skill_weight` |
//!
//! An optional jitter in `[-jitter, jitter]` is added only at selection time
//! to break ties between structurally equal teams.

use rand::Rng;
use teamforge_config::ScoringConfig;
use teamforge_core::{Participant, Team, TraitType};

/// Base score every candidate team starts from.
pub const BASE_SCORE: i64 = 100;

/// Per-term contributions to one fit score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitBreakdown {
    pub base: i64,
    pub group: i64,
    pub role: i64,
    pub trait_type: i64,
    pub skill: i64,
}

impl FitBreakdown {
    pub fn total(&self) -> i64 {
        self.base + self.group + self.role + self.trait_type + self.skill
    }
}

/// A team chosen for a participant, with its score including jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub team_idx: usize,
    pub score: i64,
}

/// Scores placements against a fixed global average skill.
#[derive(Debug, Clone)]
pub struct FitScorer {
    weights: ScoringConfig,
    global_average: f64,
}

impl FitScorer {
    pub fn new(weights: ScoringConfig, global_average: f64) -> Self {
        Self {
            weights,
            global_average,
        }
    }

    /// Builds a scorer whose global average is the mean skill of `pool`.
    pub fn for_pool(weights: ScoringConfig, pool: &[Participant]) -> Self {
        let average = if pool.is_empty() {
            0.0
        } else {
            pool.iter().map(|p| f64::from(p.skill_level())).sum::<f64>() / pool.len() as f64
        };
        Self::new(weights, average)
    }

    pub fn global_average(&self) -> f64 {
        self.global_average
    }

    pub fn breakdown(&self, team: &Team, participant: &Participant) -> FitBreakdown {
        let w = &self.weights;

        let group = if team.group_count(participant.preference_group()) >= w.group_cap {
            -w.group_penalty
        } else {
            0
        };

        let role = if team.role_count(participant.role()) == 0 {
            w.role_bonus
        } else {
            0
        };

        let trait_type = match participant.trait_type() {
            TraitType::Leader if team.trait_count(TraitType::Leader) == 0 => w.leader_bonus,
            TraitType::Leader => 0,
            other if team.trait_count(other) * 3 < team.capacity() => w.trait_bonus,
            _ => 0,
        };

        let skill = if team.is_empty() {
            0
        } else {
            let before = (team.average_skill() - self.global_average).abs();
            let after = (team.average_with(participant.skill_level()) - self.global_average).abs();
            ((before - after) * w.skill_weight).round() as i64
        };

        FitBreakdown {
            base: BASE_SCORE,
            group,
            role,
            trait_type,
            skill,
        }
    }

    /// Structural fit of `participant` on `team`, without jitter.
    pub fn score(&self, team: &Team, participant: &Participant) -> i64 {
        self.breakdown(team, participant).total()
    }

    /// Picks the best-scoring non-full team.
    ///
    /// Full teams are never scored. Ties keep the first team found; the
    /// RNG is consulted only when jitter is enabled.
    pub fn select<R: Rng + ?Sized>(
        &self,
        teams: &[Team],
        participant: &Participant,
        rng: &mut R,
    ) -> Option<Selection> {
        let jitter = i64::from(self.weights.effective_jitter());
        let mut best: Option<Selection> = None;

        for (team_idx, team) in teams.iter().enumerate() {
            if team.is_full() {
                continue;
            }
            let mut score = self.score(team, participant);
            if jitter > 0 {
                score += rng.random_range(-jitter..=jitter);
            }
            if best.map_or(true, |b| score > b.score) {
                best = Some(Selection { team_idx, score });
            }
        }
        best
    }
}
