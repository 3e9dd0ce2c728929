//! Team roster with a fixed capacity and a cached skill average.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use super::{Participant, Role, TraitType};

/// Role diversity a balanced team must reach, capped by its capacity.
pub const MIN_ROLE_DIVERSITY: usize = 3;

/// A fixed-capacity group of participants produced by one allocation run.
///
/// The average skill is recomputed on every membership change and is 0 for
/// an empty team.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Team {
    id: String,
    capacity: usize,
    members: Vec<Participant>,
    average_skill: f64,
}

impl Team {
    pub fn new(id: impl Into<String>, capacity: usize) -> Self {
        Self {
            id: id.into(),
            capacity,
            members: Vec::with_capacity(capacity),
            average_skill: 0.0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn members(&self) -> &[Participant] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity
    }

    /// Number of open seats.
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.members.len())
    }

    pub fn average_skill(&self) -> f64 {
        self.average_skill
    }

    pub fn contains(&self, participant_id: &str) -> bool {
        self.members.iter().any(|p| p.id() == participant_id)
    }

    /// Adds a member if there is room and the participant is not already on
    /// this team. Returns whether the member was added.
    pub fn add_member(&mut self, participant: Participant) -> bool {
        if self.is_full() || self.contains(participant.id()) {
            return false;
        }
        self.members.push(participant);
        self.recalculate_average();
        true
    }

    /// Removes a member by id, returning it if present.
    pub fn remove_member(&mut self, participant_id: &str) -> Option<Participant> {
        let idx = self.members.iter().position(|p| p.id() == participant_id)?;
        let removed = self.members.remove(idx);
        self.recalculate_average();
        Some(removed)
    }

    /// Replaces the member with `outgoing_id` by `incoming`, keeping its
    /// roster position. Returns the outgoing member.
    pub fn replace_member(
        &mut self,
        outgoing_id: &str,
        incoming: Participant,
    ) -> Option<Participant> {
        if incoming.id() != outgoing_id && self.contains(incoming.id()) {
            return None;
        }
        let idx = self.members.iter().position(|p| p.id() == outgoing_id)?;
        let outgoing = std::mem::replace(&mut self.members[idx], incoming);
        self.recalculate_average();
        Some(outgoing)
    }

    /// Removes every member.
    pub fn clear(&mut self) -> Vec<Participant> {
        self.average_skill = 0.0;
        std::mem::take(&mut self.members)
    }

    fn skill_total(&self) -> u32 {
        self.members.iter().map(|p| u32::from(p.skill_level())).sum()
    }

    fn recalculate_average(&mut self) {
        self.average_skill = if self.members.is_empty() {
            0.0
        } else {
            f64::from(self.skill_total()) / self.members.len() as f64
        };
    }

    /// Average skill the team would have with one more member of `skill_level`.
    pub fn average_with(&self, skill_level: u8) -> f64 {
        let total = self.skill_total() + u32::from(skill_level);
        f64::from(total) / (self.members.len() + 1) as f64
    }

    /// Average skill after exchanging a member of `outgoing` skill for one of
    /// `incoming` skill. Returns 0 for an empty team.
    pub fn average_after_exchange(&self, outgoing: u8, incoming: u8) -> f64 {
        if self.members.is_empty() {
            return 0.0;
        }
        let total = f64::from(self.skill_total()) - f64::from(outgoing) + f64::from(incoming);
        total / self.members.len() as f64
    }

    pub fn trait_count(&self, trait_type: TraitType) -> usize {
        self.members
            .iter()
            .filter(|p| p.trait_type() == trait_type)
            .count()
    }

    pub fn role_count(&self, role: Role) -> usize {
        self.members.iter().filter(|p| p.role() == role).count()
    }

    /// Counts members sharing a preference group, compared case-insensitively.
    pub fn group_count(&self, group: &str) -> usize {
        self.members
            .iter()
            .filter(|p| p.preference_group().eq_ignore_ascii_case(group))
            .count()
    }

    pub fn distinct_roles(&self) -> BTreeSet<Role> {
        self.members.iter().map(|p| p.role()).collect()
    }

    /// Target distinct-role count for this team.
    pub fn role_diversity_target(&self) -> usize {
        MIN_ROLE_DIVERSITY.min(self.capacity)
    }

    pub fn has_role_diversity(&self) -> bool {
        self.distinct_roles().len() >= self.role_diversity_target()
    }

    /// True if no preference group fills more than half the capacity.
    pub fn within_group_cap(&self) -> bool {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for p in &self.members {
            *counts
                .entry(p.preference_group().to_ascii_lowercase())
                .or_default() += 1;
        }
        counts.values().all(|&count| count <= self.capacity / 2)
    }

    /// True if at least two distinct trait types are present.
    pub fn has_trait_mix(&self) -> bool {
        let types: BTreeSet<TraitType> = self.members.iter().map(|p| p.trait_type()).collect();
        types.len() >= 2
    }

    /// True if the team holds at least one Leader and one Thinker.
    pub fn has_leader_and_thinker(&self) -> bool {
        self.trait_count(TraitType::Leader) >= 1 && self.trait_count(TraitType::Thinker) >= 1
    }

    /// Evaluates every balance criterion.
    pub fn balance_report(&self) -> BalanceReport {
        BalanceReport {
            full: self.is_full(),
            role_diversity: self.has_role_diversity(),
            group_cap: self.within_group_cap(),
            trait_mix: self.has_trait_mix(),
        }
    }

    /// A team is balanced iff it is full, role-diverse, within the group cap
    /// and mixes at least two trait types.
    pub fn is_balanced(&self) -> bool {
        self.balance_report().is_balanced()
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Team[id={}, size={}/{}, avgSkill={:.2}, balanced={}]",
            self.id,
            self.members.len(),
            self.capacity,
            self.average_skill,
            self.is_balanced()
        )
    }
}

/// Outcome of each balance criterion for one team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BalanceReport {
    pub full: bool,
    pub role_diversity: bool,
    pub group_cap: bool,
    pub trait_mix: bool,
}

impl BalanceReport {
    pub fn is_balanced(&self) -> bool {
        self.full && self.role_diversity && self.group_cap && self.trait_mix
    }

    /// Names of the criteria that fail.
    pub fn failures(&self) -> Vec<&'static str> {
        let mut failures = Vec::new();
        if !self.full {
            failures.push("capacity");
        }
        if !self.role_diversity {
            failures.push("role_diversity");
        }
        if !self.group_cap {
            failures.push("group_cap");
        }
        if !self.trait_mix {
            failures.push("trait_mix");
        }
        failures
    }
}
