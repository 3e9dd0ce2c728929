//! Allocation progress events.
//!
//! `Allocator::allocate_with_channel` publishes one event per completed
//! stage over a tokio unbounded channel, so a caller on an async runtime can
//! follow a run that executes on a blocking thread.
//!
//! ```
//! use teamforge_solver::event::AllocationEvent;
//! use tokio::sync::mpsc;
//!
//! let (tx, mut rx) = mpsc::unbounded_channel::<AllocationEvent>();
//! tx.send(AllocationEvent::BalancingCompleted { swaps: 2 }).unwrap();
//! assert!(matches!(
//!     rx.try_recv(),
//!     Ok(AllocationEvent::BalancingCompleted { swaps: 2 })
//! ));
//! ```

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;

use crate::statistics::PhaseStatistics;

#[derive(Debug, Clone, PartialEq)]
pub enum AllocationEvent {
    /// A placement phase finished.
    PhaseCompleted(PhaseStatistics),

    /// The skill balancer finished.
    BalancingCompleted { swaps: usize },

    /// The diversity repairer finished.
    RepairCompleted { swaps: usize },

    /// The run produced its teams.
    Finished {
        teams: usize,
        unassigned: usize,
        duration: Duration,
    },
}

/// Optional event publisher. A closed receiver is not an error.
#[derive(Debug, Clone, Default)]
pub(crate) struct EventPublisher {
    sender: Option<UnboundedSender<AllocationEvent>>,
}

impl EventPublisher {
    pub(crate) fn new(sender: Option<UnboundedSender<AllocationEvent>>) -> Self {
        Self { sender }
    }

    pub(crate) fn publish(&self, event: AllocationEvent) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(event);
        }
    }
}
