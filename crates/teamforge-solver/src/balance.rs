//! Skill balancer: one greedy swap pass between high and low teams.
//!
//! Teams whose average skill sits more than `threshold` above the mean of
//! all team averages are "high", those more than `threshold` below are
//! "low". Each (high, low) pair gets at most one swap, accepted only when
//! it strictly reduces the combined distance of both averages from that
//! mean. Leaders are never moved. The pass is not iterated, so residual
//! imbalance is expected.

use teamforge_core::Team;
use tracing::debug;

use crate::swap::{keeps_thinker_band, SwapMove};

const EPSILON: f64 = 1e-9;

/// Mean of the per-team average skills, 0 for no teams.
pub fn global_team_average(teams: &[Team]) -> f64 {
    if teams.is_empty() {
        return 0.0;
    }
    teams.iter().map(Team::average_skill).sum::<f64>() / teams.len() as f64
}

/// Sum of every team's distance from `center`.
pub fn total_deviation(teams: &[Team], center: f64) -> f64 {
    teams
        .iter()
        .map(|t| (t.average_skill() - center).abs())
        .sum()
}

/// Runs the balancing pass over `teams` and returns the swaps applied.
pub fn balance_teams(teams: &mut [Team], threshold: f64) -> Vec<SwapMove> {
    let mut applied = Vec::new();
    if teams.len() < 2 {
        return applied;
    }

    let center = global_team_average(teams);
    let high: Vec<usize> = (0..teams.len())
        .filter(|&i| teams[i].average_skill() > center + threshold)
        .collect();
    let low: Vec<usize> = (0..teams.len())
        .filter(|&i| teams[i].average_skill() < center - threshold)
        .collect();

    debug!(
        event = "balance_start",
        center,
        high_teams = high.len(),
        low_teams = low.len(),
    );

    for &h in &high {
        for &l in &low {
            if let Some(swap) = find_balancing_swap(teams, h, l, center) {
                if swap.do_move(teams) {
                    debug!(
                        event = "balance_swap",
                        high_team = teams[h].id(),
                        low_team = teams[l].id(),
                        swap = %swap,
                    );
                    applied.push(swap);
                }
            }
        }
    }
    applied
}

/// First non-leader pair whose exchange brings both teams closer to
/// `center` in total.
fn find_balancing_swap(teams: &[Team], h: usize, l: usize, center: f64) -> Option<SwapMove> {
    let (high, low) = (&teams[h], &teams[l]);
    let current = (high.average_skill() - center).abs() + (low.average_skill() - center).abs();

    for out in high.members().iter().filter(|p| !p.is_leader()) {
        for inc in low.members().iter().filter(|p| !p.is_leader()) {
            let new_high = high.average_after_exchange(out.skill_level(), inc.skill_level());
            let new_low = low.average_after_exchange(inc.skill_level(), out.skill_level());
            let after = (new_high - center).abs() + (new_low - center).abs();
            if after + EPSILON < current
                && keeps_thinker_band(high, out.trait_type(), low, inc.trait_type())
            {
                return Some(SwapMove::new(h, out.id(), l, inc.id()));
            }
        }
    }
    None
}
