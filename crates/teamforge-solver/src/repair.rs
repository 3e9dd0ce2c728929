//! Diversity repairer: one swap attempt per role-deficient team.

use std::collections::BTreeSet;

use teamforge_core::{Participant, Role, Team};
use tracing::{debug, warn};

use crate::swap::{keeps_thinker_band, SwapMove};

/// Runs the repair pass over `teams` and returns the swaps applied.
///
/// A team is deficient when it holds fewer distinct roles than
/// `min(min_role_diversity, capacity)`. Each deficient team tries a single
/// swap against the first other team: an incoming member whose role the
/// deficient team lacks, for an outgoing member whose role it holds twice.
/// Leaders stay put on both sides, the donor is not pushed below its own
/// target, and neither team's Thinker count leaves the [1, 2] band. A team
/// with no eligible swap is left as is.
pub fn repair_diversity(teams: &mut [Team], min_role_diversity: usize) -> Vec<SwapMove> {
    let mut applied = Vec::new();
    if teams.len() < 2 {
        return applied;
    }

    for idx in 0..teams.len() {
        let target = min_role_diversity.min(teams[idx].capacity());
        let distinct = teams[idx].distinct_roles().len();
        if distinct >= target {
            continue;
        }

        let donor = if idx == 0 { 1 } else { 0 };
        match find_repair_swap(teams, idx, donor, min_role_diversity) {
            Some(swap) if swap.do_move(teams) => {
                debug!(
                    event = "repair_swap",
                    team = teams[idx].id(),
                    donor = teams[donor].id(),
                    swap = %swap,
                );
                applied.push(swap);
            }
            _ => {
                warn!(
                    event = "repair_skipped",
                    team = teams[idx].id(),
                    distinct_roles = distinct,
                    target,
                    "no eligible diversity swap",
                );
            }
        }
    }
    applied
}

fn roles_after(team: &Team, outgoing: &Participant, incoming: &Participant) -> BTreeSet<Role> {
    team.members()
        .iter()
        .filter(|p| p.id() != outgoing.id())
        .map(Participant::role)
        .chain(std::iter::once(incoming.role()))
        .collect()
}

fn find_repair_swap(
    teams: &[Team],
    idx: usize,
    donor: usize,
    min_role_diversity: usize,
) -> Option<SwapMove> {
    let (deficient, other) = (&teams[idx], &teams[donor]);
    let present = deficient.distinct_roles();
    let donor_target = min_role_diversity.min(other.capacity());
    let donor_before = other.distinct_roles().len();

    for incoming in other
        .members()
        .iter()
        .filter(|p| !p.is_leader() && !present.contains(&p.role()))
    {
        for outgoing in deficient
            .members()
            .iter()
            .filter(|p| !p.is_leader() && deficient.role_count(p.role()) > 1)
        {
            let donor_after = roles_after(other, incoming, outgoing).len();
            if donor_after < donor_target && donor_after < donor_before {
                continue;
            }
            if !keeps_thinker_band(deficient, outgoing.trait_type(), other, incoming.trait_type())
            {
                continue;
            }
            return Some(SwapMove::new(idx, outgoing.id(), donor, incoming.id()));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use teamforge_test::pool::{homogeneous_pool, participant};

    fn team(id: &str, members: Vec<Participant>) -> Team {
        let mut t = Team::new(id, members.len());
        for m in members {
            t.add_member(m);
        }
        t
    }

    #[test]
    fn test_repairs_deficient_team() {
        let mut teams = vec![
            team(
                "TEAM_1",
                vec![
                    participant("P001", "FIFA", 5, Role::Attacker, 80),
                    participant("P002", "FIFA", 5, Role::Attacker, 80),
                    participant("P003", "FIFA", 5, Role::Defender, 60),
                ],
            ),
            team(
                "TEAM_2",
                vec![
                    participant("P004", "CS:GO", 5, Role::Strategist, 80),
                    participant("P005", "CS:GO", 5, Role::Supporter, 80),
                    participant("P006", "CS:GO", 5, Role::Coordinator, 60),
                    participant("P007", "CS:GO", 5, Role::Coordinator, 80),
                ],
            ),
        ];
        assert!(!teams[0].has_role_diversity());

        let swaps = repair_diversity(&mut teams, 3);

        assert_eq!(swaps.len(), 1);
        assert_eq!(swaps[0], SwapMove::new(0, "P001", 1, "P004"));
        assert!(teams[0].has_role_diversity());
        assert!(teams[1].has_role_diversity());
        assert_eq!(teams[0].len(), 3);
        assert_eq!(teams[1].len(), 4);
    }

    #[test]
    fn test_leaders_never_move() {
        let mut teams = vec![
            team(
                "TEAM_1",
                vec![
                    participant("P001", "FIFA", 5, Role::Attacker, 95),
                    participant("P002", "FIFA", 5, Role::Attacker, 95),
                    participant("P003", "FIFA", 5, Role::Attacker, 60),
                ],
            ),
            team(
                "TEAM_2",
                vec![
                    participant("P004", "CS:GO", 5, Role::Strategist, 95),
                    participant("P005", "CS:GO", 5, Role::Supporter, 60),
                    participant("P006", "CS:GO", 5, Role::Defender, 80),
                ],
            ),
        ];
        let swaps = repair_diversity(&mut teams, 3);
        // P003 is the only member of TEAM_1 allowed to leave.
        for swap in &swaps {
            assert_ne!(swap.left_member(), "P001");
            assert_ne!(swap.left_member(), "P002");
            assert_ne!(swap.right_member(), "P004");
        }
        assert!(teams[0].contains("P001"));
        assert!(teams[1].contains("P004"));
    }

    #[test]
    fn test_homogeneous_teams_left_alone() {
        let pool = homogeneous_pool(8);
        let mut teams = vec![
            team("TEAM_1", pool[..4].to_vec()),
            team("TEAM_2", pool[4..].to_vec()),
        ];
        let swaps = repair_diversity(&mut teams, 3);
        assert!(swaps.is_empty());
        assert_eq!(teams[0].len(), 4);
        assert_eq!(teams[1].len(), 4);
    }

    #[test]
    fn test_diverse_teams_untouched() {
        let mut teams = vec![
            team(
                "TEAM_1",
                vec![
                    participant("P001", "FIFA", 5, Role::Attacker, 80),
                    participant("P002", "FIFA", 5, Role::Defender, 80),
                    participant("P003", "FIFA", 5, Role::Supporter, 60),
                ],
            ),
            team(
                "TEAM_2",
                vec![
                    participant("P004", "FIFA", 5, Role::Attacker, 80),
                    participant("P005", "FIFA", 5, Role::Attacker, 80),
                    participant("P006", "FIFA", 5, Role::Attacker, 60),
                ],
            ),
        ];
        // TEAM_2 is deficient but its only donor would drop below target.
        let swaps = repair_diversity(&mut teams, 3);
        assert!(swaps.is_empty());
        assert!(teams[0].has_role_diversity());
    }
}
