//! Placement phases of the allocator.
//!
//! Phases run in a fixed order:
//!
//! 1. `LeaderPlacement`: round-robin, at most one Leader per team
//! 2. `ThinkerPlacement`: round-robin, one Thinker per team, then a second
//! 3. `RoleDiversity`: best-fit over unassigned participants grouped by role
//! 4. `BalancedFill`: best-fit over unassigned Balanced participants
//! 5. `Remainder`: best-fit over everyone still unassigned
//!
//! Phases 1 and 2 run sequentially on the caller's thread. Phases 3 to 5
//! snapshot their candidates once phase 2 completes and run concurrently
//! against the shared roster.

mod best_fit;
mod round_robin;

use std::fmt;

use teamforge_core::{Participant, Role, TraitType};

use crate::roster::Roster;

pub(crate) use best_fit::{run_parallel_phases, ParallelContext};
pub use round_robin::place_round_robin;

/// Identifies one placement phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PhaseKind {
    LeaderPlacement,
    ThinkerPlacement,
    RoleDiversity,
    BalancedFill,
    Remainder,
}

impl PhaseKind {
    pub const ALL: [PhaseKind; 5] = [
        PhaseKind::LeaderPlacement,
        PhaseKind::ThinkerPlacement,
        PhaseKind::RoleDiversity,
        PhaseKind::BalancedFill,
        PhaseKind::Remainder,
    ];

    /// Phases that run concurrently after the round-robin phases.
    pub const PARALLEL: [PhaseKind; 3] = [
        PhaseKind::RoleDiversity,
        PhaseKind::BalancedFill,
        PhaseKind::Remainder,
    ];

    /// 1-based position in the phase order.
    pub fn index(&self) -> usize {
        match self {
            PhaseKind::LeaderPlacement => 1,
            PhaseKind::ThinkerPlacement => 2,
            PhaseKind::RoleDiversity => 3,
            PhaseKind::BalancedFill => 4,
            PhaseKind::Remainder => 5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PhaseKind::LeaderPlacement => "LeaderPlacement",
            PhaseKind::ThinkerPlacement => "ThinkerPlacement",
            PhaseKind::RoleDiversity => "RoleDiversity",
            PhaseKind::BalancedFill => "BalancedFill",
            PhaseKind::Remainder => "Remainder",
        }
    }

    pub fn is_parallel(&self) -> bool {
        Self::PARALLEL.contains(self)
    }

    /// Snapshot of the participants a best-fit phase will try to place,
    /// taken from the unassigned members of `ordered`.
    ///
    /// Round-robin phases select their own candidates and get an empty list.
    pub fn candidates(&self, roster: &Roster, ordered: &[Participant]) -> Vec<Participant> {
        let unassigned = roster.unassigned(ordered);
        match self {
            PhaseKind::LeaderPlacement | PhaseKind::ThinkerPlacement => Vec::new(),
            PhaseKind::RoleDiversity => {
                let mut grouped = Vec::with_capacity(unassigned.len());
                for role in Role::ALL {
                    grouped.extend(
                        unassigned
                            .iter()
                            .filter(|p| p.role() == role)
                            .map(|p| (*p).clone()),
                    );
                }
                grouped
            }
            PhaseKind::BalancedFill => unassigned
                .into_iter()
                .filter(|p| p.trait_type() == TraitType::Balanced)
                .cloned()
                .collect(),
            PhaseKind::Remainder => unassigned.into_iter().cloned().collect(),
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
