//! Trait-type classification derived from a participant's trait score.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::{Result, TeamForgeError};

/// Lowest accepted trait score.
pub const MIN_TRAIT_SCORE: u8 = 50;

/// Highest accepted trait score.
pub const MAX_TRAIT_SCORE: u8 = 100;

/// Three-way classification of a trait score.
///
/// Variants are ordered `Leader < Balanced < Thinker`; the deterministic
/// ordering stage sorts ascending on this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TraitType {
    /// Scores 90..=100 (TypeA).
    Leader,
    /// Scores 70..=89 (TypeB).
    Balanced,
    /// Scores 50..=69 (TypeC).
    Thinker,
}

impl TraitType {
    pub const ALL: [TraitType; 3] = [TraitType::Leader, TraitType::Balanced, TraitType::Thinker];

    /// Classifies a trait score.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParticipant` if the score is outside 50..=100.
    ///
    /// # Examples
    ///
    /// ```
    /// use teamforge_core::TraitType;
    ///
    /// assert_eq!(TraitType::classify(90).unwrap(), TraitType::Leader);
    /// assert_eq!(TraitType::classify(89).unwrap(), TraitType::Balanced);
    /// assert_eq!(TraitType::classify(69).unwrap(), TraitType::Thinker);
    /// assert!(TraitType::classify(49).is_err());
    /// ```
    pub fn classify(score: u8) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.score_range().contains(&score))
            .ok_or_else(|| {
                TeamForgeError::InvalidParticipant(format!(
                    "trait score {score} must be between {MIN_TRAIT_SCORE} and {MAX_TRAIT_SCORE}"
                ))
            })
    }

    /// Returns the contiguous score range mapping to this type.
    pub fn score_range(&self) -> RangeInclusive<u8> {
        match self {
            TraitType::Leader => 90..=100,
            TraitType::Balanced => 70..=89,
            TraitType::Thinker => 50..=69,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TraitType::Leader => "Leader",
            TraitType::Balanced => "Balanced",
            TraitType::Thinker => "Thinker",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TraitType::Leader => "Confident, decision-maker, naturally takes charge",
            TraitType::Balanced => "Adaptive, communicative, team-oriented",
            TraitType::Thinker => "Observant, analytical, prefers planning before action",
        }
    }
}

impl fmt::Display for TraitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for TraitType {
    type Err = TeamForgeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.display_name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| TeamForgeError::InvalidParticipant(format!("unknown trait type: {s}")))
    }
}
