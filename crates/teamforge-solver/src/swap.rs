//! SwapMove - exchanges one member between two teams.
//!
//! Both post-allocation passes express their changes as swap moves over a
//! team slice, so a swap never changes team sizes and never places a
//! participant on two teams.

use std::fmt;

use teamforge_core::{Team, TraitType};

/// Exchanges `left_member` of `teams[left_team]` with `right_member` of
/// `teams[right_team]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapMove {
    left_team: usize,
    left_member: String,
    right_team: usize,
    right_member: String,
}

impl SwapMove {
    pub fn new(
        left_team: usize,
        left_member: impl Into<String>,
        right_team: usize,
        right_member: impl Into<String>,
    ) -> Self {
        Self {
            left_team,
            left_member: left_member.into(),
            right_team,
            right_member: right_member.into(),
        }
    }

    pub fn left_team(&self) -> usize {
        self.left_team
    }

    pub fn right_team(&self) -> usize {
        self.right_team
    }

    pub fn left_member(&self) -> &str {
        &self.left_member
    }

    pub fn right_member(&self) -> &str {
        &self.right_member
    }

    /// A swap is doable when it spans two distinct existing teams and each
    /// member is on its stated team.
    pub fn is_doable(&self, teams: &[Team]) -> bool {
        if self.left_team == self.right_team {
            return false;
        }
        match (teams.get(self.left_team), teams.get(self.right_team)) {
            (Some(left), Some(right)) => {
                left.contains(&self.left_member) && right.contains(&self.right_member)
            }
            _ => false,
        }
    }

    /// Applies the swap. Returns false, leaving `teams` untouched, when the
    /// move is not doable.
    pub fn do_move(&self, teams: &mut [Team]) -> bool {
        if !self.is_doable(teams) {
            return false;
        }
        let left = teams[self.left_team]
            .members()
            .iter()
            .find(|p| p.id() == self.left_member)
            .cloned();
        let right = teams[self.right_team]
            .members()
            .iter()
            .find(|p| p.id() == self.right_member)
            .cloned();
        let (Some(left), Some(right)) = (left, right) else {
            return false;
        };

        teams[self.left_team].replace_member(&self.left_member, right);
        teams[self.right_team].replace_member(&self.right_member, left);
        true
    }
}

impl fmt::Display for SwapMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} <-> {}@{}",
            self.left_member, self.left_team, self.right_member, self.right_team
        )
    }
}

/// Smallest and largest Thinker count a team should hold.
const THINKER_BAND: (usize, usize) = (1, 2);

fn band_distance(count: usize) -> usize {
    let (low, high) = THINKER_BAND;
    if count < low {
        low - count
    } else {
        count.saturating_sub(high)
    }
}

/// True unless the swap moves either team's Thinker count further outside
/// the [1, 2] band than it already is.
pub(crate) fn keeps_thinker_band(
    left: &Team,
    left_out: TraitType,
    right: &Team,
    right_out: TraitType,
) -> bool {
    let shifted = |team: &Team, outgoing: TraitType, incoming: TraitType| {
        let count = team.trait_count(TraitType::Thinker);
        let after = match (outgoing == TraitType::Thinker, incoming == TraitType::Thinker) {
            (true, false) => count.saturating_sub(1),
            (false, true) => count + 1,
            _ => count,
        };
        band_distance(after) <= band_distance(count)
    };
    shifted(left, left_out, right_out) && shifted(right, right_out, left_out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use teamforge_core::Role;
    use teamforge_test::pool::participant;

    fn teams() -> Vec<Team> {
        let mut a = Team::new("TEAM_1", 2);
        a.add_member(participant("P001", "FIFA", 9, Role::Attacker, 95));
        a.add_member(participant("P002", "FIFA", 8, Role::Defender, 60));
        let mut b = Team::new("TEAM_2", 2);
        b.add_member(participant("P003", "CS:GO", 2, Role::Supporter, 80));
        b.add_member(participant("P004", "CS:GO", 1, Role::Attacker, 55));
        vec![a, b]
    }

    #[test]
    fn test_do_move_exchanges_members() {
        let mut teams = teams();
        let swap = SwapMove::new(0, "P002", 1, "P003");
        assert!(swap.do_move(&mut teams));

        assert!(teams[0].contains("P003"));
        assert!(teams[1].contains("P002"));
        assert!(!teams[0].contains("P002"));
        assert_eq!(teams[0].len(), 2);
        assert_eq!(teams[1].len(), 2);
        assert!((teams[0].average_skill() - 5.5).abs() < 1e-9);
        assert!((teams[1].average_skill() - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_not_doable() {
        let mut teams = teams();
        assert!(!SwapMove::new(0, "P001", 0, "P002").is_doable(&teams));
        assert!(!SwapMove::new(0, "P003", 1, "P001").is_doable(&teams));
        assert!(!SwapMove::new(0, "P001", 5, "P003").is_doable(&teams));
        assert!(!SwapMove::new(0, "P003", 1, "P001").do_move(&mut teams));
        assert!(teams[0].contains("P001"));
    }

    #[test]
    fn test_display() {
        assert_eq!(SwapMove::new(0, "P001", 1, "P004").to_string(), "P001@0 <-> P004@1");
    }

    #[test]
    fn test_thinker_band_guard() {
        let teams = teams();
        // Each team holds one Thinker; trading a Thinker for a non-Thinker
        // would leave one side with zero.
        assert!(!keeps_thinker_band(
            &teams[0],
            TraitType::Thinker,
            &teams[1],
            TraitType::Balanced
        ));
        assert!(keeps_thinker_band(
            &teams[0],
            TraitType::Thinker,
            &teams[1],
            TraitType::Thinker
        ));
        assert!(keeps_thinker_band(
            &teams[0],
            TraitType::Leader,
            &teams[1],
            TraitType::Balanced
        ));
    }
}
