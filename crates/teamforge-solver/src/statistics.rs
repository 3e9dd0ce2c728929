//! Allocation statistics collected over one run.

use std::time::Duration;

use crate::phase::PhaseKind;

/// Outcome of a single placement phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseStatistics {
    pub phase: PhaseKind,
    /// Participants this phase placed.
    pub placed: usize,
    pub duration: Duration,
}

impl PhaseStatistics {
    pub fn new(phase: PhaseKind, placed: usize, duration: Duration) -> Self {
        Self {
            phase,
            placed,
            duration,
        }
    }
}

/// Statistics for a whole allocation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationStatistics {
    /// Placement phases in phase order.
    pub phases: Vec<PhaseStatistics>,
    pub balancing_swaps: usize,
    pub repair_swaps: usize,
    pub duration: Duration,
}

impl AllocationStatistics {
    /// Total participants placed across all phases.
    pub fn placed(&self) -> usize {
        self.phases.iter().map(|p| p.placed).sum()
    }

    pub fn phase(&self, kind: PhaseKind) -> Option<&PhaseStatistics> {
        self.phases.iter().find(|p| p.phase == kind)
    }

    pub fn swaps(&self) -> usize {
        self.balancing_swaps + self.repair_swaps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        let stats = AllocationStatistics {
            phases: vec![
                PhaseStatistics::new(PhaseKind::LeaderPlacement, 4, Duration::ZERO),
                PhaseStatistics::new(PhaseKind::Remainder, 6, Duration::ZERO),
            ],
            balancing_swaps: 2,
            repair_swaps: 1,
            duration: Duration::from_millis(3),
        };
        assert_eq!(stats.placed(), 10);
        assert_eq!(stats.swaps(), 3);
        assert_eq!(stats.phase(PhaseKind::Remainder).map(|p| p.placed), Some(6));
        assert!(stats.phase(PhaseKind::BalancedFill).is_none());
    }
}
