//! Error types for TeamForge

use std::time::Duration;

use thiserror::Error;

/// Main error type for TeamForge operations
#[derive(Debug, Error)]
pub enum TeamForgeError {
    /// The participant pool was empty
    #[error("No participants available")]
    EmptyPool,

    /// Requested team capacity is outside the supported range
    #[error("Invalid team capacity {capacity}: must be between 3 and 10")]
    InvalidCapacity { capacity: usize },

    /// Not enough participants to form at least two full teams
    #[error("Cannot form two teams of {capacity} from {participants} participants")]
    InsufficientParticipants { participants: usize, capacity: usize },

    /// The allocator configuration was rejected before the run started
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A participant attribute failed validation
    #[error("Invalid participant: {0}")]
    InvalidParticipant(String),

    /// A parallel allocation phase panicked or lost its roster lock
    #[error("Allocation phase '{phase}' failed: {reason}")]
    PhaseFailed { phase: &'static str, reason: String },

    /// The run exceeded its time limit
    #[error("Allocation timed out after {limit:?}")]
    Timeout { limit: Duration },

    /// Export was requested before any teams were generated
    #[error("No teams to export")]
    NoTeams,

    /// The run was cancelled before completion
    #[error("Allocation was cancelled")]
    Cancelled,

    /// Internal error (should not occur in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TeamForgeError {
    /// Returns true for errors raised before allocation starts.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::EmptyPool
                | Self::InvalidCapacity { .. }
                | Self::InsufficientParticipants { .. }
                | Self::InvalidConfig(_)
        )
    }

    /// Returns true if retrying with a smaller input may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Result type alias for TeamForge operations
pub type Result<T> = std::result::Result<T, TeamForgeError>;
