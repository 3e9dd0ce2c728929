//! Round-robin placement for the Leader and Thinker phases.

use teamforge_core::{Participant, TraitType};
use tracing::trace;

use crate::roster::Roster;

/// Places each unassigned participant of `trait_type` from `ordered` by
/// round-robin over the roster's teams.
///
/// `tiers` lists per-team caps tried in turn: a participant goes to the next
/// non-full team holding fewer than `tiers[0]` members of the type, and only
/// if no team qualifies does the next tier apply. The cursor starts at
/// `offset` and advances past each team that receives someone. Participants
/// that fit no tier are left for the later phases.
///
/// Returns the number of participants placed.
pub fn place_round_robin(
    roster: &mut Roster,
    ordered: &[Participant],
    trait_type: TraitType,
    tiers: &[usize],
    offset: usize,
) -> usize {
    let team_count = roster.team_count();
    if team_count == 0 {
        return 0;
    }

    let mut cursor = offset % team_count;
    let mut placed = 0;

    for participant in ordered.iter().filter(|p| p.trait_type() == trait_type) {
        if roster.is_assigned(participant.id()) {
            continue;
        }
        let target = tiers.iter().find_map(|&cap| {
            (0..team_count)
                .map(|step| (cursor + step) % team_count)
                .find(|&idx| {
                    let team = &roster.teams()[idx];
                    !team.is_full() && team.trait_count(trait_type) < cap
                })
        });
        if let Some(idx) = target {
            if roster.assign(idx, participant.clone()) {
                trace!(
                    event = "placed",
                    participant = participant.id(),
                    team = roster.teams()[idx].id(),
                );
                placed += 1;
                cursor = (idx + 1) % team_count;
            }
        }
    }
    placed
}
