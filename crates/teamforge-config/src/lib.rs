//! Configuration system for TeamForge.
//!
//! Load allocator configuration from TOML or YAML files to control ordering,
//! fit-scoring weights, balancing thresholds and the run timeout without
//! code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use teamforge_config::{AllocatorConfig, OrderingStrategy};
//! use std::time::Duration;
//!
//! let config = AllocatorConfig::from_toml_str(r#"
//!     ordering = "shuffled"
//!     random_seed = 7
//!
//!     [termination]
//!     seconds_spent_limit = 10
//!
//!     [scoring]
//!     group_cap = 3
//!     jitter = 2
//! "#).unwrap();
//!
//! assert_eq!(config.ordering, OrderingStrategy::Shuffled);
//! assert_eq!(config.time_limit(), Duration::from_secs(10));
//! assert_eq!(config.scoring.group_cap, 3);
//! assert_eq!(config.worker_count, 3);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use teamforge_config::AllocatorConfig;
//!
//! let config = AllocatorConfig::load("teamforge.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use teamforge_core::MIN_ROLE_DIVERSITY;
use thiserror::Error;

/// Default overall run time limit in seconds.
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 30;

/// Default bound on waiting for workers after a timeout.
pub const DEFAULT_SHUTDOWN_GRACE_MILLIS: u64 = 5_000;

/// Default worker count, one per parallel placement phase.
pub const DEFAULT_WORKER_COUNT: usize = 3;

/// Upper bound on tie-break jitter.
pub const MAX_JITTER: u32 = 5;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main allocator configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AllocatorConfig {
    /// Pre-sort policy applied to the participant pool.
    pub ordering: OrderingStrategy,

    /// Random seed for reproducible runs.
    pub random_seed: Option<u64>,

    /// Number of workers running the parallel placement phases.
    pub worker_count: usize,

    /// Start the leader and thinker round-robin at a random team.
    pub randomize_leader_offset: bool,

    /// Run timeout configuration.
    pub termination: TerminationConfig,

    /// Fit-scoring weights.
    pub scoring: ScoringConfig,

    /// Skill balancer configuration.
    pub balancing: BalancingConfig,

    /// Diversity repairer configuration.
    pub repair: RepairConfig,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            ordering: OrderingStrategy::default(),
            random_seed: None,
            worker_count: DEFAULT_WORKER_COUNT,
            randomize_leader_offset: false,
            termination: TerminationConfig::default(),
            scoring: ScoringConfig::default(),
            balancing: BalancingConfig::default(),
            repair: RepairConfig::default(),
        }
    }
}

impl AllocatorConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that would make an allocation run impossible.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == 0 {
            return Err(ConfigError::Invalid(
                "worker_count must be at least 1".to_string(),
            ));
        }
        if self.termination.seconds_spent_limit == 0 {
            return Err(ConfigError::Invalid(
                "termination.seconds_spent_limit must be at least 1".to_string(),
            ));
        }
        if self.scoring.group_cap == 0 {
            return Err(ConfigError::Invalid(
                "scoring.group_cap must be at least 1".to_string(),
            ));
        }
        if !self.scoring.skill_weight.is_finite() || self.scoring.skill_weight < 0.0 {
            return Err(ConfigError::Invalid(
                "scoring.skill_weight must be a non-negative number".to_string(),
            ));
        }
        if self.repair.min_role_diversity == 0 {
            return Err(ConfigError::Invalid(
                "repair.min_role_diversity must be at least 1".to_string(),
            ));
        }
        if !self.balancing.threshold.is_finite() || self.balancing.threshold < 0.0 {
            return Err(ConfigError::Invalid(
                "balancing.threshold must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }

    /// Sets the ordering strategy.
    pub fn with_ordering(mut self, ordering: OrderingStrategy) -> Self {
        self.ordering = ordering;
        self
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Sets the worker count.
    pub fn with_worker_count(mut self, workers: usize) -> Self {
        self.worker_count = workers;
        self
    }

    /// Sets the run time limit.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination.seconds_spent_limit = seconds;
        self
    }

    /// Enables a random round-robin start for leader and thinker placement.
    pub fn with_randomized_leader_offset(mut self, randomize: bool) -> Self {
        self.randomize_leader_offset = randomize;
        self
    }

    /// Replaces the scoring weights.
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    /// Returns the overall run time limit.
    pub fn time_limit(&self) -> Duration {
        self.termination.time_limit()
    }
}

/// Pre-sort policy for the participant pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingStrategy {
    /// Stable sort by trait type ascending, then skill descending.
    #[default]
    Deterministic,

    /// Random shuffle followed by a stable skill-descending sort.
    Shuffled,
}

/// Run timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds a run may take.
    pub seconds_spent_limit: u64,

    /// Maximum milliseconds to wait for workers once a run is abandoned.
    pub shutdown_grace_millis: u64,
}

impl Default for TerminationConfig {
    fn default() -> Self {
        Self {
            seconds_spent_limit: DEFAULT_TIME_LIMIT_SECS,
            shutdown_grace_millis: DEFAULT_SHUTDOWN_GRACE_MILLIS,
        }
    }
}

impl TerminationConfig {
    /// Returns the time limit as a Duration.
    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(self.seconds_spent_limit)
    }

    /// Returns the shutdown grace period as a Duration.
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_millis)
    }
}

/// Fit-scoring weights.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ScoringConfig {
    /// Same-group members a team may hold before the penalty applies.
    pub group_cap: usize,

    /// Penalty once the group cap is reached.
    pub group_penalty: i64,

    /// Bonus when the team lacks the participant's role.
    pub role_bonus: i64,

    /// Bonus for a Leader joining a team without one.
    pub leader_bonus: i64,

    /// Bonus for an under-represented Balanced or Thinker participant.
    pub trait_bonus: i64,

    /// Points per skill unit the team average moves toward the global average.
    pub skill_weight: f64,

    /// Maximum absolute random tie-break offset; clamped to 5.
    pub jitter: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            group_cap: 2,
            group_penalty: 50,
            role_bonus: 30,
            leader_bonus: 40,
            trait_bonus: 20,
            skill_weight: 10.0,
            jitter: 0,
        }
    }
}

impl ScoringConfig {
    /// Returns the jitter bound clamped to [`MAX_JITTER`].
    pub fn effective_jitter(&self) -> u32 {
        self.jitter.min(MAX_JITTER)
    }
}

/// Skill balancer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct BalancingConfig {
    /// Whether to run the balancer.
    pub enabled: bool,

    /// Deviation from the global average marking a team high or low.
    pub threshold: f64,
}

impl Default for BalancingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 1.5,
        }
    }
}

/// Diversity repairer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RepairConfig {
    /// Whether to run the repairer.
    pub enabled: bool,

    /// Distinct roles a team should hold, capped by its capacity.
    pub min_role_diversity: usize,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_role_diversity: MIN_ROLE_DIVERSITY,
        }
    }
}

#[cfg(test)]
mod tests;
